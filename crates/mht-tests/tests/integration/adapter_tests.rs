//! Integration tests for the JSON adapter.

use mht_core::adapter::{JsonAdapter, SpecAdapter};
use mht_core::{ExhaustiveOptimizer, LinkResult, TrackingError, TrackingModel};
use mht_tests::{two_node_record, TWO_NODE_JSON};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("mht-tests-{}-{}", std::process::id(), name))
}

#[test]
fn test_graph_document_matches_record() {
    let record = JsonAdapter::new().read_graph(TWO_NODE_JSON).unwrap();
    assert_eq!(record, two_node_record(Some(vec![0.4]), Some(vec![0.7])));
}

#[test]
fn test_empty_optional_features_disable_events() {
    let document = r#"{
        "segmentationHypotheses": [
            {"id": 5, "features": [1.0], "appearanceFeatures": [], "divisionFeatures": [0.5]}
        ]
    }"#;
    let record = JsonAdapter::new().read_graph(document).unwrap();
    let tm = TrackingModel::from_record(&record).unwrap();
    let hyp = tm.graph().segmentations().next().unwrap();

    assert!(!hyp.can_appear());
    assert!(!hyp.can_disappear());
    assert!(hyp.can_divide());
    // detection 1 + division 1 feature, off and on halves
    assert_eq!(tm.num_weights(), 4);
}

#[test]
fn test_solve_and_save_results() {
    let adapter = JsonAdapter::new();
    let mut tm = TrackingModel::from_record(&adapter.read_graph(TWO_NODE_JSON).unwrap()).unwrap();
    let weights = vec![0.0, -1.0, 0.0, -1.0, 0.0, -1.0, 0.0, -1.0];
    let solution = tm
        .infer(&ExhaustiveOptimizer::default(), weights)
        .unwrap()
        .clone();
    let results = tm.export(&solution).unwrap();

    let path = temp_path("results.json");
    adapter.save_results(&path, &results).unwrap();
    let loaded = adapter.load_ground_truth(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.link_results, vec![LinkResult::new(1, 2, true)]);
}

#[test]
fn test_graph_file_round_trip() {
    let path = temp_path("graph.json");
    std::fs::write(&path, TWO_NODE_JSON).unwrap();
    let record = JsonAdapter::new().load_graph(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(record.segmentation_hypotheses.len(), 2);
}

#[test]
fn test_invalid_documents_are_parse_errors() {
    let adapter = JsonAdapter::new();
    assert!(matches!(
        adapter.read_ground_truth("[1, 2]").unwrap_err(),
        TrackingError::Parse(_)
    ));
    assert!(matches!(
        adapter
            .read_graph(r#"{"segmentationHypotheses": [{"id": "one", "features": []}]}"#)
            .unwrap_err(),
        TrackingError::Parse(_)
    ));
}
