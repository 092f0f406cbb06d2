//! Ground truth reconstruction from sparse link annotations.
//!
//! Annotations only state which links are active. The full labeling is
//! derived in three passes over a registered graph:
//!
//! 1. every active link is switched on together with its source detection;
//!    a source that is already active is dividing, so its division variable
//!    is switched on instead,
//! 2. every destination detection is switched on, which also covers the last
//!    node of each track,
//! 3. every active node without active incoming links appears, every active
//!    node without active outgoing links disappears.
//!
//! Pass 2 relies on all activations of pass 1, so the passes never interleave.

use crate::engine::errors::TrackingError;
use crate::engine::solution::Solution;
use crate::model::graph::{HypothesisGraph, HypothesisId};
use crate::model::linking::LinkKey;
use crate::model::segmentation::SegmentationHypothesis;
use crate::model::variable::{VariableIndex, VariableKind};
use crate::records::LinkResults;

/// Expands link annotations into a labeling of every model variable.
///
/// The labeling covers every variable of the model the graph was registered
/// with. Annotations with `value == false` are ignored.
///
/// # Errors
///
/// * `TrackingError::Reference` - an annotation names a link that does not exist,
///   or the graph is not registered
/// * `TrackingError::InconsistentAnnotation` - a link is annotated twice or a
///   source has more than two active outgoing links
/// * `TrackingError::InvariantViolation` - the labeling needs a division,
///   appearance or disappearance variable the hypothesis does not have
pub fn reconstruct_ground_truth(
    graph: &HypothesisGraph,
    annotations: &LinkResults,
) -> Result<Solution, TrackingError> {
    let num_variables = graph.registered_variables()?;

    #[cfg(feature = "tracing")]
    tracing::info!(
        "ground truth contains {} linking annotations",
        annotations.link_results.len()
    );

    let mut solution = Solution::zeros(num_variables);

    for annotation in annotations.active() {
        let key = LinkKey::new(HypothesisId(annotation.src), HypothesisId(annotation.dest));
        let link = graph.link(key).ok_or_else(|| {
            TrackingError::Reference(format!("cannot find link to annotate: {}", key))
        })?;
        let link_id = registered(link.optimizer_id(), key.source, VariableKind::Link)?;
        if solution.value(link_id) > 0 {
            return Err(TrackingError::InconsistentAnnotation(format!(
                "link {} is annotated more than once",
                key
            )));
        }
        solution.set(link_id, true)?;

        let source = graph.require_segmentation(key.source)?;
        activate_source(&mut solution, source)?;
    }

    for annotation in annotations.active() {
        let dest = graph.require_segmentation(HypothesisId(annotation.dest))?;
        let detection = registered(
            dest.optimizer_id(VariableKind::Detection),
            dest.id(),
            VariableKind::Detection,
        )?;
        solution.set(detection, true)?;
    }

    for hyp in graph.segmentations() {
        if !solution.is_active(hyp.optimizer_id(VariableKind::Detection)) {
            continue;
        }

        if graph.count_active_incoming(hyp.id(), &solution) == 0 {
            let appearance = hyp.optimizer_id(VariableKind::Appearance).ok_or_else(|| {
                TrackingError::InvariantViolation {
                    id: hyp.id(),
                    message: "ground truth contains an appearing node that has no appearance features"
                        .into(),
                }
            })?;
            solution.set(appearance, true)?;
        }

        if graph.count_active_outgoing(hyp.id(), &solution) == 0 {
            let disappearance = hyp.optimizer_id(VariableKind::Disappearance).ok_or_else(|| {
                TrackingError::InvariantViolation {
                    id: hyp.id(),
                    message:
                        "ground truth contains a disappearing node that has no disappearance features"
                            .into(),
                }
            })?;
            solution.set(disappearance, true)?;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!("found ground truth solution: {}", solution);

    Ok(solution)
}

/// Switches on the source detection, or its division if the detection is already on.
fn activate_source(solution: &mut Solution, source: &SegmentationHypothesis) -> Result<(), TrackingError> {
    let id = source.id();
    let detection = registered(
        source.optimizer_id(VariableKind::Detection),
        id,
        VariableKind::Detection,
    )?;
    if solution.value(detection) == 0 {
        solution.set(detection, true)?;
        return Ok(());
    }

    let division = source
        .optimizer_id(VariableKind::Division)
        .ok_or_else(|| TrackingError::InvariantViolation {
            id,
            message: "ground truth contains a division but the node has no division features".into(),
        })?;
    if solution.value(division) > 0 {
        return Err(TrackingError::InconsistentAnnotation(format!(
            "source node {} has been used by more than two active links",
            id
        )));
    }
    solution.set(division, true)?;
    Ok(())
}

fn registered(
    id: Option<VariableIndex>,
    owner: HypothesisId,
    kind: VariableKind,
) -> Result<VariableIndex, TrackingError> {
    id.ok_or_else(|| {
        TrackingError::Reference(format!("{} variable of {} is not registered", kind, owner))
    })
}
