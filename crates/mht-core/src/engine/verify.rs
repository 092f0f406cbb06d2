//! Solution verification.
//!
//! Checks exclusion constraints and per-node flow conservation. Unlike every
//! other operation of the crate, a violated invariant here is a finding, not
//! an error: all violations are collected in a [`VerificationReport`] and
//! logged.
//!
//! Per node, with absent variables reading as 0:
//!
//! ```text
//! incoming active links + appearance          = detection
//! outgoing active links + disappearance       = detection + division
//! division                                   <= detection
//! ```

use std::fmt;

use crate::engine::errors::TrackingError;
use crate::engine::solution::Solution;
use crate::model::graph::{HypothesisGraph, HypothesisId};
use crate::model::segmentation::SegmentationHypothesis;
use crate::model::variable::VariableKind;

/// Which per-node rule was broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConservationRule {
    Incoming,
    Outgoing,
    Division,
}

/// One violated invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// More than one member of an exclusion constraint is active.
    Exclusion {
        index: usize,
        active: Vec<HypothesisId>,
    },
    /// A node's activation does not match its incident links and events.
    FlowConservation {
        id: HypothesisId,
        rule: ConservationRule,
        lhs: usize,
        rhs: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Exclusion { index, active } => {
                let ids: Vec<String> = active.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "exclusion constraint #{} has {} active members: {}",
                    index,
                    active.len(),
                    ids.join(", ")
                )
            }
            Violation::FlowConservation { id, rule, lhs, rhs } => match rule {
                ConservationRule::Incoming => write!(
                    f,
                    "node {}: incoming links + appearance = {}, detection = {}",
                    id, lhs, rhs
                ),
                ConservationRule::Outgoing => write!(
                    f,
                    "node {}: outgoing links + disappearance = {}, detection + division = {}",
                    id, lhs, rhs
                ),
                ConservationRule::Division => {
                    write!(f, "node {}: division = {} exceeds detection = {}", id, lhs, rhs)
                }
            },
        }
    }
}

/// Outcome of verifying one solution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    violations: Vec<Violation>,
}

impl VerificationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn exclusion_violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| matches!(v, Violation::Exclusion { .. }))
    }

    pub fn conservation_violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| matches!(v, Violation::FlowConservation { .. }))
    }

    fn push(&mut self, violation: Violation) {
        #[cfg(feature = "tracing")]
        tracing::warn!("found violated constraint: {}", violation);
        self.violations.push(violation);
    }
}

/// Checks all exclusion and flow conservation invariants of `solution`.
///
/// # Errors
///
/// * `TrackingError::SolutionLength` - `solution` does not fit the model
/// * `TrackingError::Reference` - the graph is not registered
pub fn verify_solution(
    graph: &HypothesisGraph,
    solution: &Solution,
) -> Result<VerificationReport, TrackingError> {
    solution.ensure_len(graph.registered_variables()?)?;

    #[cfg(feature = "tracing")]
    tracing::info!("checking solution...");

    let mut report = VerificationReport::default();

    for (index, exclusion) in graph.exclusions().iter().enumerate() {
        let active = exclusion.active_members(graph, solution)?;
        if active.len() > 1 {
            report.push(Violation::Exclusion { index, active });
        }
    }

    for hyp in graph.segmentations() {
        check_conservation(graph, hyp, solution, &mut report);
    }

    Ok(report)
}

fn check_conservation(
    graph: &HypothesisGraph,
    hyp: &SegmentationHypothesis,
    solution: &Solution,
    report: &mut VerificationReport,
) {
    let id = hyp.id();
    let state = |kind| usize::from(solution.is_active(hyp.optimizer_id(kind)));
    let detection = state(VariableKind::Detection);
    let division = state(VariableKind::Division);
    let appearance = state(VariableKind::Appearance);
    let disappearance = state(VariableKind::Disappearance);

    let incoming = graph.count_active_incoming(id, solution) + appearance;
    if incoming != detection {
        report.push(Violation::FlowConservation {
            id,
            rule: ConservationRule::Incoming,
            lhs: incoming,
            rhs: detection,
        });
    }

    let outgoing = graph.count_active_outgoing(id, solution) + disappearance;
    if outgoing != detection + division {
        report.push(Violation::FlowConservation {
            id,
            rule: ConservationRule::Outgoing,
            lhs: outgoing,
            rhs: detection + division,
        });
    }

    if division > detection {
        report.push(Violation::FlowConservation {
            id,
            rule: ConservationRule::Division,
            lhs: division,
            rhs: detection,
        });
    }
}
