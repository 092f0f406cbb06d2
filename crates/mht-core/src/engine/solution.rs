//! Solutions and their export to link results.

use std::fmt;

use crate::engine::errors::TrackingError;
use crate::model::graph::HypothesisGraph;
use crate::model::variable::VariableIndex;
use crate::records::{LinkResult, LinkResults};

/// A labeling with one {0, 1} entry per model variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Solution {
    labels: Vec<u8>,
}

impl Solution {
    pub fn zeros(num_variables: usize) -> Self {
        Self {
            labels: vec![0; num_variables],
        }
    }

    /// Wraps raw labels; any non-zero entry counts as active.
    pub fn from_labels(labels: Vec<u8>) -> Self {
        Self {
            labels: labels.into_iter().map(|l| u8::from(l > 0)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label of `var`; out-of-range ids read as 0.
    pub fn value(&self, var: VariableIndex) -> u8 {
        self.labels.get(var.0).copied().unwrap_or(0)
    }

    /// Whether `var` is present and active. Absent variables are never active.
    pub fn is_active(&self, var: Option<VariableIndex>) -> bool {
        var.is_some_and(|v| self.value(v) > 0)
    }

    /// Sets the label of `var`.
    ///
    /// # Errors
    ///
    /// `TrackingError::Reference` if `var` lies outside the solution.
    pub fn set(&mut self, var: VariableIndex, active: bool) -> Result<(), TrackingError> {
        let len = self.labels.len();
        let label = self.labels.get_mut(var.0).ok_or_else(|| {
            TrackingError::Reference(format!(
                "variable {} is outside a solution of {} variables",
                var, len
            ))
        })?;
        *label = u8::from(active);
        Ok(())
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn num_active(&self) -> usize {
        self.labels.iter().filter(|&&l| l > 0).count()
    }

    pub(crate) fn ensure_len(&self, expected: usize) -> Result<(), TrackingError> {
        if self.labels.len() != expected {
            return Err(TrackingError::SolutionLength {
                expected,
                actual: self.labels.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.labels {
            write!(f, "{}", label)?;
        }
        Ok(())
    }
}

/// One entry per linking hypothesis with its activation in `solution`, in link key order.
///
/// # Errors
///
/// * `TrackingError::Reference` - the graph has not been registered with a model
/// * `TrackingError::SolutionLength` - `solution` does not fit that model
pub fn export_link_results(graph: &HypothesisGraph, solution: &Solution) -> Result<LinkResults, TrackingError> {
    solution.ensure_len(graph.registered_variables()?)?;
    let mut results = Vec::with_capacity(graph.num_links());
    for link in graph.links() {
        let id = link.optimizer_id().ok_or_else(|| {
            TrackingError::Reference(format!("link {} is not registered with a model", link.key()))
        })?;
        results.push(LinkResult::new(
            link.source().0,
            link.dest().0,
            solution.value(id) > 0,
        ));
    }
    Ok(LinkResults::new(results))
}
