//! Binary decision variables carried by hypotheses.

use std::fmt;

/// Index of a variable inside a built [`OptimizationModel`](crate::engine::program::OptimizationModel).
///
/// Also indexes the entries of a [`Solution`](crate::engine::solution::Solution).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableIndex(pub usize);

impl fmt::Display for VariableIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// The physical event a variable stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariableKind {
    Link,
    Detection,
    Division,
    Appearance,
    Disappearance,
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VariableKind::Link => "link",
            VariableKind::Detection => "detection",
            VariableKind::Division => "division",
            VariableKind::Appearance => "appearance",
            VariableKind::Disappearance => "disappearance",
        };
        f.write_str(name)
    }
}

/// A single binary decision with its feature vector.
///
/// `optimizer_id` stays `None` until the owning graph is registered with a
/// [`ModelBuilder`](crate::engine::builder::ModelBuilder), which assigns it
/// exactly once.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    features: Vec<f64>,
    optimizer_id: Option<VariableIndex>,
}

impl Variable {
    pub fn new(features: Vec<f64>) -> Self {
        Self {
            features,
            optimizer_id: None,
        }
    }

    /// Builds an optional event variable; an empty feature list means the
    /// event cannot happen.
    pub fn optional(features: Option<Vec<f64>>) -> Option<Self> {
        features.filter(|f| !f.is_empty()).map(Self::new)
    }

    pub fn features(&self) -> &[f64] {
        &self.features
    }

    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    pub fn optimizer_id(&self) -> Option<VariableIndex> {
        self.optimizer_id
    }

    pub(crate) fn assign(&mut self, id: VariableIndex) {
        debug_assert!(self.optimizer_id.is_none(), "variable registered twice");
        self.optimizer_id = Some(id);
    }
}
