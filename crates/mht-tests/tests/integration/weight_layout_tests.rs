//! Integration tests for weight layout and graph loading.

use mht_core::engine::weights::FeatureCategory;
use mht_core::{GraphRecord, TrackingError, TrackingModel, WeightLayout};
use mht_tests::{dividing_record, link, segmentation, two_node_record};

#[test]
fn test_weight_layout_of_dividing_graph() {
    let tm = TrackingModel::from_record(&dividing_record(true)).unwrap();
    let layout = tm.layout();

    for category in FeatureCategory::ALL {
        assert_eq!(layout.feature_count(category), 1);
    }
    assert_eq!(tm.num_weights(), 10);
    assert_eq!(layout.range(FeatureCategory::Link).on(), 1..2);
    assert_eq!(layout.range(FeatureCategory::Disappearance).off(), 8..9);
}

#[test]
fn test_weight_descriptions_follow_weight_order() {
    let tm = TrackingModel::from_record(&two_node_record(Some(vec![0.4]), None)).unwrap();
    let descriptions = tm.weight_descriptions();

    assert_eq!(descriptions.len(), tm.num_weights());
    assert_eq!(
        descriptions,
        vec![
            "Link = 0 - feature 0",
            "Link = 1 - feature 0",
            "Detection = 0 - feature 0",
            "Detection = 1 - feature 0",
            "Appearance = 0 - feature 0",
            "Appearance = 1 - feature 0",
        ]
    );
}

#[test]
fn test_mismatched_feature_lengths_are_rejected() {
    let mut record = dividing_record(true);
    record.segmentation_hypotheses[2].features = vec![0.1, 0.2];

    let err = TrackingModel::from_record(&record).unwrap_err();
    match err {
        TrackingError::Consistency {
            category,
            expected,
            found,
            ..
        } => {
            assert_eq!(category, FeatureCategory::Detection);
            assert_eq!(expected, 1);
            assert_eq!(found, 2);
        }
        other => panic!("expected consistency error, got {:?}", other),
    }
}

#[test]
fn test_empty_graph_has_no_weights() {
    let tm = TrackingModel::from_record(&GraphRecord::default()).unwrap();
    assert_eq!(tm.num_weights(), 0);
    assert!(tm.weight_descriptions().is_empty());
}

#[test]
fn test_layout_is_idempotent() {
    let tm = TrackingModel::from_record(&dividing_record(true)).unwrap();
    let first = WeightLayout::compute(tm.graph()).unwrap();
    let second = WeightLayout::compute(tm.graph()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.num_weights(), tm.num_weights());
}

#[test]
fn test_malformed_records_are_rejected() {
    let mut record = GraphRecord::default();
    record.segmentation_hypotheses.push(segmentation(1, vec![0.5]));
    record.linking_hypotheses.push(link(1, 9, vec![0.5]));
    assert!(matches!(
        TrackingModel::from_record(&record).unwrap_err(),
        TrackingError::Reference(_)
    ));

    record.linking_hypotheses.clear();
    record.segmentation_hypotheses.push(segmentation(1, vec![0.5]));
    assert!(matches!(
        TrackingModel::from_record(&record).unwrap_err(),
        TrackingError::Duplicate(_)
    ));
}
