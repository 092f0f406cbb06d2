//! Shared fixtures for the mht-core integration and property tests.

use mht_core::records::{LinkingRecord, SegmentationRecord};
use mht_core::{GraphRecord, LinkResult, LinkResults};

/// Segmentation record with detection features only.
pub fn segmentation(id: i64, features: Vec<f64>) -> SegmentationRecord {
    SegmentationRecord {
        id,
        features,
        ..Default::default()
    }
}

pub fn link(src: i64, dest: i64, features: Vec<f64>) -> LinkingRecord {
    LinkingRecord { src, dest, features }
}

/// Active annotations for every `(src, dest)` pair.
pub fn annotations(links: &[(i64, i64)]) -> LinkResults {
    LinkResults::new(
        links
            .iter()
            .map(|&(src, dest)| LinkResult::new(src, dest, true))
            .collect(),
    )
}

/// Two hypotheses joined by one link `1 -> 2`.
///
/// Hypothesis 2 can always appear; the optional event features of the other
/// ends are supplied by the caller.
pub fn two_node_record(
    appearance_1: Option<Vec<f64>>,
    disappearance_2: Option<Vec<f64>>,
) -> GraphRecord {
    let mut first = segmentation(1, vec![0.1]);
    first.appearance_features = appearance_1;
    let mut second = segmentation(2, vec![0.2]);
    second.appearance_features = Some(vec![0.5]);
    second.disappearance_features = disappearance_2;

    GraphRecord {
        segmentation_hypotheses: vec![first, second],
        linking_hypotheses: vec![link(1, 2, vec![0.3])],
        exclusions: vec![],
    }
}

/// Hypothesis 1 with candidate children 2 and 3, which exclude each other.
pub fn dividing_record(with_division: bool) -> GraphRecord {
    let mut parent = segmentation(1, vec![0.1]);
    parent.appearance_features = Some(vec![0.4]);
    if with_division {
        parent.division_features = Some(vec![0.9]);
    }

    let mut record = GraphRecord {
        segmentation_hypotheses: vec![parent],
        linking_hypotheses: vec![],
        exclusions: vec![vec![2, 3]],
    };
    for id in [2, 3] {
        let mut child = segmentation(id, vec![0.2]);
        child.disappearance_features = Some(vec![0.6]);
        record.segmentation_hypotheses.push(child);
        record.linking_hypotheses.push(link(1, id, vec![0.3]));
    }
    record
}

/// Graph document matching [`two_node_record`] with every event allowed.
pub const TWO_NODE_JSON: &str = r#"{
    "segmentationHypotheses": [
        {"id": 1, "features": [0.1], "appearanceFeatures": [0.4]},
        {"id": 2, "features": [0.2], "appearanceFeatures": [0.5], "disappearanceFeatures": [0.7]}
    ],
    "linkingHypotheses": [
        {"src": 1, "dest": 2, "features": [0.3]}
    ],
    "exclusions": []
}"#;
