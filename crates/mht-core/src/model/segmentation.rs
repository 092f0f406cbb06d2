//! Segmentation hypotheses: one candidate object and its event variables.

use crate::model::graph::HypothesisId;
use crate::model::variable::{Variable, VariableIndex, VariableKind};
use crate::records::SegmentationRecord;

/// One trackable object candidate.
///
/// The detection variable always exists. Division, appearance and
/// disappearance exist only when features were supplied for them; a missing
/// variable means the event is impossible for this hypothesis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentationHypothesis {
    id: HypothesisId,
    detection: Variable,
    division: Option<Variable>,
    appearance: Option<Variable>,
    disappearance: Option<Variable>,
}

impl SegmentationHypothesis {
    pub fn new(id: HypothesisId, detection_features: Vec<f64>) -> Self {
        Self {
            id,
            detection: Variable::new(detection_features),
            division: None,
            appearance: None,
            disappearance: None,
        }
    }

    pub fn with_division(mut self, features: Vec<f64>) -> Self {
        self.division = Variable::optional(Some(features));
        self
    }

    pub fn with_appearance(mut self, features: Vec<f64>) -> Self {
        self.appearance = Variable::optional(Some(features));
        self
    }

    pub fn with_disappearance(mut self, features: Vec<f64>) -> Self {
        self.disappearance = Variable::optional(Some(features));
        self
    }

    pub fn from_record(record: &SegmentationRecord) -> Self {
        Self {
            id: HypothesisId(record.id),
            detection: Variable::new(record.features.clone()),
            division: Variable::optional(record.division_features.clone()),
            appearance: Variable::optional(record.appearance_features.clone()),
            disappearance: Variable::optional(record.disappearance_features.clone()),
        }
    }

    pub fn id(&self) -> HypothesisId {
        self.id
    }

    pub fn detection(&self) -> &Variable {
        &self.detection
    }

    pub fn division(&self) -> Option<&Variable> {
        self.division.as_ref()
    }

    pub fn appearance(&self) -> Option<&Variable> {
        self.appearance.as_ref()
    }

    pub fn disappearance(&self) -> Option<&Variable> {
        self.disappearance.as_ref()
    }

    /// Returns the variable for `kind`, `None` if absent or if `kind` is a link.
    pub fn variable(&self, kind: VariableKind) -> Option<&Variable> {
        match kind {
            VariableKind::Detection => Some(&self.detection),
            VariableKind::Division => self.division.as_ref(),
            VariableKind::Appearance => self.appearance.as_ref(),
            VariableKind::Disappearance => self.disappearance.as_ref(),
            VariableKind::Link => None,
        }
    }

    pub(crate) fn variable_mut(&mut self, kind: VariableKind) -> Option<&mut Variable> {
        match kind {
            VariableKind::Detection => Some(&mut self.detection),
            VariableKind::Division => self.division.as_mut(),
            VariableKind::Appearance => self.appearance.as_mut(),
            VariableKind::Disappearance => self.disappearance.as_mut(),
            VariableKind::Link => None,
        }
    }

    /// Optimizer id of the variable for `kind`, if present and registered.
    pub fn optimizer_id(&self, kind: VariableKind) -> Option<VariableIndex> {
        self.variable(kind).and_then(Variable::optimizer_id)
    }

    pub fn can_divide(&self) -> bool {
        self.division.is_some()
    }

    pub fn can_appear(&self) -> bool {
        self.appearance.is_some()
    }

    pub fn can_disappear(&self) -> bool {
        self.disappearance.is_some()
    }
}
