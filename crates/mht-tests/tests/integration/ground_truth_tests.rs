//! Integration tests for ground truth reconstruction and export.

use mht_core::model::{LinkKey, VariableKind};
use mht_core::{GraphRecord, HypothesisId, LinkResult, Solution, TrackingError, TrackingModel};
use mht_tests::{annotations, dividing_record, two_node_record};

fn built(record: &GraphRecord) -> TrackingModel {
    let mut tm = TrackingModel::from_record(record).unwrap();
    let n = tm.num_weights();
    tm.build(vec![0.0; n]).unwrap();
    tm
}

fn is_on(tm: &TrackingModel, s: &Solution, id: i64, kind: VariableKind) -> bool {
    let hyp = tm.graph().segmentation(HypothesisId(id)).unwrap();
    s.is_active(hyp.optimizer_id(kind))
}

fn link_on(tm: &TrackingModel, s: &Solution, src: i64, dest: i64) -> bool {
    let link = tm
        .graph()
        .link(LinkKey::new(HypothesisId(src), HypothesisId(dest)))
        .unwrap();
    s.is_active(link.optimizer_id())
}

#[test]
fn test_first_node_without_appearance_fails() {
    let tm = built(&two_node_record(None, None));
    let err = tm.reconstruct_ground_truth(&annotations(&[(1, 2)])).unwrap_err();

    match err {
        TrackingError::InvariantViolation { id, message } => {
            assert_eq!(id, HypothesisId(1));
            assert!(message.contains("appear"));
        }
        other => panic!("expected invariant violation, got {:?}", other),
    }
}

#[test]
fn test_last_node_without_disappearance_fails() {
    let tm = built(&two_node_record(Some(vec![0.4]), None));
    let err = tm.reconstruct_ground_truth(&annotations(&[(1, 2)])).unwrap_err();
    assert!(matches!(
        err,
        TrackingError::InvariantViolation { id: HypothesisId(2), .. }
    ));
}

#[test]
fn test_single_track_reconstructs_and_exports() {
    let tm = built(&two_node_record(Some(vec![0.4]), Some(vec![0.7])));
    let gt = annotations(&[(1, 2)]);
    let s = tm.reconstruct_ground_truth(&gt).unwrap();

    assert!(link_on(&tm, &s, 1, 2));
    assert!(is_on(&tm, &s, 1, VariableKind::Detection));
    assert!(is_on(&tm, &s, 1, VariableKind::Appearance));
    assert!(is_on(&tm, &s, 2, VariableKind::Detection));
    assert!(is_on(&tm, &s, 2, VariableKind::Disappearance));
    assert!(!is_on(&tm, &s, 2, VariableKind::Appearance));
    assert_eq!(s.num_active(), 5);

    let exported = tm.export(&s).unwrap();
    assert_eq!(exported, gt);
    assert!(tm.verify(&s).unwrap().is_valid());
}

#[test]
fn test_division_activates_division_variable() {
    let tm = built(&dividing_record(true));
    let s = tm
        .reconstruct_ground_truth(&annotations(&[(1, 2), (1, 3)]))
        .unwrap();

    assert!(is_on(&tm, &s, 1, VariableKind::Detection));
    assert!(is_on(&tm, &s, 1, VariableKind::Division));
    assert!(is_on(&tm, &s, 2, VariableKind::Detection));
    assert!(is_on(&tm, &s, 3, VariableKind::Detection));

    let exported = tm.export(&s).unwrap();
    assert_eq!(
        exported.link_results,
        vec![LinkResult::new(1, 2, true), LinkResult::new(1, 3, true)]
    );
}

#[test]
fn test_division_without_division_variable_fails() {
    let tm = built(&dividing_record(false));
    let err = tm
        .reconstruct_ground_truth(&annotations(&[(1, 2), (1, 3)]))
        .unwrap_err();
    assert!(matches!(
        err,
        TrackingError::InvariantViolation { id: HypothesisId(1), .. }
    ));
}

#[test]
fn test_unknown_link_annotation_is_reference_error() {
    let tm = built(&dividing_record(true));
    let err = tm.reconstruct_ground_truth(&annotations(&[(3, 1)])).unwrap_err();
    assert!(matches!(err, TrackingError::Reference(_)));
}

#[test]
fn test_reconstruction_is_deterministic() {
    let tm = built(&dividing_record(true));
    let gt = annotations(&[(1, 3), (1, 2)]);
    let first = tm.reconstruct_ground_truth(&gt).unwrap();
    let second = tm.reconstruct_ground_truth(&gt).unwrap();
    assert_eq!(first, second);

    let other = built(&dividing_record(true));
    assert_eq!(other.reconstruct_ground_truth(&gt).unwrap(), first);
}

#[test]
fn test_export_of_empty_solution_lists_every_link_inactive() {
    let tm = built(&dividing_record(true));
    let n = tm.model().unwrap().num_variables();
    let exported = tm.export(&Solution::zeros(n)).unwrap();
    assert_eq!(exported.link_results.len(), 2);
    assert!(exported.link_results.iter().all(|r| !r.value));

    let err = tm.export(&Solution::zeros(n + 2)).unwrap_err();
    assert!(matches!(err, TrackingError::SolutionLength { .. }));
}
