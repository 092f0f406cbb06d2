//! Linking hypotheses: candidate transitions between two segmentations.

use std::fmt;

use crate::model::graph::HypothesisId;
use crate::model::variable::{Variable, VariableIndex};
use crate::records::LinkingRecord;

/// Key of a link in the graph: `(source, dest)`.
///
/// Orders by source, then destination, which fixes export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkKey {
    pub source: HypothesisId,
    pub dest: HypothesisId,
}

impl LinkKey {
    pub fn new(source: HypothesisId, dest: HypothesisId) -> Self {
        Self { source, dest }
    }
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.dest)
    }
}

/// One candidate transition between two segmentation hypotheses.
///
/// Endpoints are stored as ids only and resolved through
/// [`HypothesisGraph::source_of`](crate::model::graph::HypothesisGraph::source_of)
/// and [`HypothesisGraph::dest_of`](crate::model::graph::HypothesisGraph::dest_of).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkingHypothesis {
    key: LinkKey,
    link: Variable,
}

impl LinkingHypothesis {
    pub fn new(source: HypothesisId, dest: HypothesisId, features: Vec<f64>) -> Self {
        Self {
            key: LinkKey::new(source, dest),
            link: Variable::new(features),
        }
    }

    pub fn from_record(record: &LinkingRecord) -> Self {
        Self::new(
            HypothesisId(record.src),
            HypothesisId(record.dest),
            record.features.clone(),
        )
    }

    pub fn key(&self) -> LinkKey {
        self.key
    }

    pub fn source(&self) -> HypothesisId {
        self.key.source
    }

    pub fn dest(&self) -> HypothesisId {
        self.key.dest
    }

    pub fn variable(&self) -> &Variable {
        &self.link
    }

    pub(crate) fn variable_mut(&mut self) -> &mut Variable {
        &mut self.link
    }

    pub fn optimizer_id(&self) -> Option<VariableIndex> {
        self.link.optimizer_id()
    }
}
