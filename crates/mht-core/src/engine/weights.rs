//! Weight layout: shared weight indices per feature category.
//!
//! Every variable of a category shares one block of weights. The blocks are
//! concatenated in the fixed order link, detection, division, appearance,
//! disappearance, and each block holds an "off" half followed by an "on"
//! half:
//!
//! ```text
//! | link off | link on | det off | det on | div off | div on | app off | app on | dis off | dis on |
//! ```
//!
//! Weight descriptions and weight values are consumed positionally by
//! optimizers and learners, so this order must not change.

use std::fmt;
use std::ops::Range;

use crate::engine::errors::TrackingError;
use crate::model::graph::HypothesisGraph;
use crate::model::variable::{Variable, VariableKind};

/// A group of variables sharing one weight block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeatureCategory {
    Link,
    Detection,
    Division,
    Appearance,
    Disappearance,
}

impl FeatureCategory {
    /// Categories in weight-vector order.
    pub const ALL: [FeatureCategory; 5] = [
        FeatureCategory::Link,
        FeatureCategory::Detection,
        FeatureCategory::Division,
        FeatureCategory::Appearance,
        FeatureCategory::Disappearance,
    ];

    fn position(self) -> usize {
        match self {
            FeatureCategory::Link => 0,
            FeatureCategory::Detection => 1,
            FeatureCategory::Division => 2,
            FeatureCategory::Appearance => 3,
            FeatureCategory::Disappearance => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FeatureCategory::Link => "Link",
            FeatureCategory::Detection => "Detection",
            FeatureCategory::Division => "Division",
            FeatureCategory::Appearance => "Appearance",
            FeatureCategory::Disappearance => "Disappearance",
        }
    }
}

impl From<VariableKind> for FeatureCategory {
    fn from(kind: VariableKind) -> Self {
        match kind {
            VariableKind::Link => FeatureCategory::Link,
            VariableKind::Detection => FeatureCategory::Detection,
            VariableKind::Division => FeatureCategory::Division,
            VariableKind::Appearance => FeatureCategory::Appearance,
            VariableKind::Disappearance => FeatureCategory::Disappearance,
        }
    }
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Contiguous weight block of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightRange {
    pub start: usize,
    pub num_features: usize,
}

impl WeightRange {
    /// Weight ids for state 0.
    pub fn off(&self) -> Range<usize> {
        self.start..self.start + self.num_features
    }

    /// Weight ids for state 1.
    pub fn on(&self) -> Range<usize> {
        self.start + self.num_features..self.start + 2 * self.num_features
    }

    /// All weight ids of the block, off half first.
    pub fn ids(&self) -> Vec<usize> {
        (self.start..self.start + self.len()).collect()
    }

    pub fn len(&self) -> usize {
        2 * self.num_features
    }

    pub fn is_empty(&self) -> bool {
        self.num_features == 0
    }
}

/// Per-category feature counts of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeightLayout {
    counts: [usize; 5],
}

struct CountCheck {
    category: FeatureCategory,
    count: Option<usize>,
}

impl CountCheck {
    fn new(category: FeatureCategory) -> Self {
        Self {
            category,
            count: None,
        }
    }

    fn observe(&mut self, variable: Option<&Variable>, owner: &dyn fmt::Display) -> Result<(), TrackingError> {
        let Some(variable) = variable else {
            return Ok(());
        };
        let found = variable.num_features();
        match self.count {
            None => self.count = Some(found),
            Some(expected) if expected != found => {
                return Err(TrackingError::Consistency {
                    category: self.category,
                    hypothesis: owner.to_string(),
                    expected,
                    found,
                });
            }
            Some(_) => {}
        }
        Ok(())
    }
}

impl WeightLayout {
    /// Scans the graph and determines the feature count of every category.
    ///
    /// Only reads the graph; calling it repeatedly yields the same layout.
    ///
    /// # Errors
    ///
    /// `TrackingError::Consistency` if two present variables of one category
    /// have different feature counts.
    pub fn compute(graph: &HypothesisGraph) -> Result<Self, TrackingError> {
        let mut checks = FeatureCategory::ALL.map(CountCheck::new);

        for link in graph.links() {
            checks[FeatureCategory::Link.position()].observe(Some(link.variable()), &link.key())?;
        }

        for hyp in graph.segmentations() {
            let id = hyp.id();
            for kind in [
                VariableKind::Detection,
                VariableKind::Division,
                VariableKind::Appearance,
                VariableKind::Disappearance,
            ] {
                let category = FeatureCategory::from(kind);
                checks[category.position()].observe(hyp.variable(kind), &id)?;
            }
        }

        Ok(Self {
            counts: checks.map(|check| check.count.unwrap_or(0)),
        })
    }

    /// Layout with explicit counts, in [`FeatureCategory::ALL`] order.
    pub fn from_counts(counts: [usize; 5]) -> Self {
        Self { counts }
    }

    pub fn feature_count(&self, category: FeatureCategory) -> usize {
        self.counts[category.position()]
    }

    /// Total number of weights: two per feature of every category.
    pub fn num_weights(&self) -> usize {
        2 * self.counts.iter().sum::<usize>()
    }

    pub fn range(&self, category: FeatureCategory) -> WeightRange {
        let start = self.counts[..category.position()]
            .iter()
            .map(|count| 2 * count)
            .sum();
        WeightRange {
            start,
            num_features: self.feature_count(category),
        }
    }

    /// One `"<Category> = <state> - feature <index>"` line per weight, in weight order.
    pub fn descriptions(&self) -> Vec<String> {
        let mut descriptions = Vec::with_capacity(self.num_weights());
        for category in FeatureCategory::ALL {
            let num_features = self.feature_count(category);
            for state in 0..2 {
                for feature in 0..num_features {
                    descriptions.push(format!("{} = {} - feature {}", category, state, feature));
                }
            }
        }
        descriptions
    }
}
