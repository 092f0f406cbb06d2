//! Mutual exclusion between segmentation hypotheses.

use smallvec::SmallVec;

use crate::engine::errors::TrackingError;
use crate::engine::program::{ConstraintOrigin, LinearConstraint, OptimizationModel, Relation};
use crate::engine::solution::Solution;
use crate::model::graph::{HypothesisGraph, HypothesisId};
use crate::model::variable::VariableKind;

/// At most one member's detection may be active.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExclusionConstraint {
    members: Vec<HypothesisId>,
}

impl ExclusionConstraint {
    /// Members are sorted and deduplicated.
    pub fn new<I>(members: I) -> Self
    where
        I: IntoIterator<Item = HypothesisId>,
    {
        let mut members: Vec<_> = members.into_iter().collect();
        members.sort_unstable();
        members.dedup();
        Self { members }
    }

    pub fn members(&self) -> &[HypothesisId] {
        &self.members
    }

    /// Emits `sum(member detections) <= 1` into `model`.
    ///
    /// Members must already be registered.
    pub fn add_to_model(
        &self,
        index: usize,
        model: &mut OptimizationModel,
        graph: &HypothesisGraph,
    ) -> Result<(), TrackingError> {
        let mut terms = SmallVec::new();
        for &id in &self.members {
            let detection = graph
                .require_segmentation(id)?
                .optimizer_id(VariableKind::Detection)
                .ok_or_else(|| {
                    TrackingError::Reference(format!(
                        "exclusion member {} has no registered detection variable",
                        id
                    ))
                })?;
            terms.push((detection, 1));
        }
        model.add_constraint(LinearConstraint::new(
            terms,
            Relation::LessEqual,
            1,
            ConstraintOrigin::Exclusion(index),
        ));
        Ok(())
    }

    /// Members whose detection is active in `solution`.
    pub fn active_members(
        &self,
        graph: &HypothesisGraph,
        solution: &Solution,
    ) -> Result<Vec<HypothesisId>, TrackingError> {
        let mut active = Vec::new();
        for &id in &self.members {
            let hyp = graph.require_segmentation(id)?;
            if solution.is_active(hyp.optimizer_id(VariableKind::Detection)) {
                active.push(id);
            }
        }
        Ok(active)
    }

    /// Recomputes the member sum against `solution`.
    pub fn verify_solution(&self, graph: &HypothesisGraph, solution: &Solution) -> Result<bool, TrackingError> {
        Ok(self.active_members(graph, solution)?.len() <= 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_are_sorted_and_unique() {
        let c = ExclusionConstraint::new([3, 1, 3, 2].map(HypothesisId));
        assert_eq!(c.members(), &[HypothesisId(1), HypothesisId(2), HypothesisId(3)]);
    }

    #[test]
    fn unknown_member_is_reference_error() {
        let graph = HypothesisGraph::new();
        let c = ExclusionConstraint::new([HypothesisId(5)]);
        let err = c.verify_solution(&graph, &Solution::zeros(0)).unwrap_err();
        assert!(matches!(err, TrackingError::Reference(_)));
    }
}
