//! Integration tests for solution verification.

use mht_core::engine::verify::{ConservationRule, Violation};
use mht_core::model::VariableKind;
use mht_core::{HypothesisId, Solution, TrackingError, TrackingModel};
use mht_tests::{annotations, dividing_record};

fn built() -> TrackingModel {
    let mut tm = TrackingModel::from_record(&dividing_record(true)).unwrap();
    let n = tm.num_weights();
    tm.build(vec![0.0; n]).unwrap();
    tm
}

fn num_variables(tm: &TrackingModel) -> usize {
    tm.model().unwrap().num_variables()
}

#[test]
fn test_empty_solution_is_valid() {
    let tm = built();
    let report = tm.verify(&Solution::zeros(num_variables(&tm))).unwrap();
    assert!(report.is_valid());
    assert!(report.violations().is_empty());
}

#[test]
fn test_division_into_excluded_children_violates_exclusion_only() {
    let tm = built();
    let s = tm
        .reconstruct_ground_truth(&annotations(&[(1, 2), (1, 3)]))
        .unwrap();
    let report = tm.verify(&s).unwrap();

    assert!(!report.is_valid());
    assert_eq!(report.conservation_violations().count(), 0);
    assert_eq!(
        report.exclusion_violations().cloned().collect::<Vec<_>>(),
        vec![Violation::Exclusion {
            index: 0,
            active: vec![HypothesisId(2), HypothesisId(3)],
        }]
    );
}

#[test]
fn test_single_child_track_is_valid() {
    let tm = built();
    let s = tm.reconstruct_ground_truth(&annotations(&[(1, 3)])).unwrap();
    assert!(tm.verify(&s).unwrap().is_valid());
}

#[test]
fn test_division_without_detection_is_reported() {
    let tm = built();
    let mut s = Solution::zeros(num_variables(&tm));
    let parent = tm.graph().segmentation(HypothesisId(1)).unwrap();
    s.set(parent.optimizer_id(VariableKind::Division).unwrap(), true)
        .unwrap();

    let report = tm.verify(&s).unwrap();
    let rules: Vec<_> = report
        .conservation_violations()
        .filter_map(|v| match v {
            Violation::FlowConservation { id, rule, .. } => Some((*id, *rule)),
            _ => None,
        })
        .collect();
    assert_eq!(
        rules,
        vec![
            (HypothesisId(1), ConservationRule::Outgoing),
            (HypothesisId(1), ConservationRule::Division),
        ]
    );
}

#[test]
fn test_solution_of_wrong_length_is_an_error() {
    let tm = built();
    let err = tm.verify(&Solution::zeros(1)).unwrap_err();
    assert!(matches!(err, TrackingError::SolutionLength { .. }));
}
