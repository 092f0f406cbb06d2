//! External record shapes for graphs, ground truth and results.
//!
//! These mirror the JSON documents exchanged with the outside world. The
//! core only depends on these shapes; reading and writing them is the job of
//! an [`adapter`](crate::adapter).

/// One segmentation entry: `{id, features, divisionFeatures?, appearanceFeatures?, disappearanceFeatures?}`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SegmentationRecord {
    pub id: i64,
    pub features: Vec<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub division_features: Option<Vec<f64>>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub appearance_features: Option<Vec<f64>>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub disappearance_features: Option<Vec<f64>>,
}

/// One linking entry: `{src, dest, features}`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkingRecord {
    pub src: i64,
    pub dest: i64,
    pub features: Vec<f64>,
}

/// A complete graph document.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GraphRecord {
    #[cfg_attr(feature = "serde", serde(default))]
    pub segmentation_hypotheses: Vec<SegmentationRecord>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub linking_hypotheses: Vec<LinkingRecord>,
    /// Each inner list is a set of ids of which at most one may be active.
    #[cfg_attr(feature = "serde", serde(default))]
    pub exclusions: Vec<Vec<i64>>,
}

/// Activation state of one link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkResult {
    pub src: i64,
    pub dest: i64,
    pub value: bool,
}

impl LinkResult {
    pub fn new(src: i64, dest: i64, value: bool) -> Self {
        Self { src, dest, value }
    }
}

/// `{linkResults: [...]}`: ground truth annotations on input, solver output on export.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LinkResults {
    #[cfg_attr(feature = "serde", serde(default, alias = "linkingResults"))]
    pub link_results: Vec<LinkResult>,
}

impl LinkResults {
    pub fn new(link_results: Vec<LinkResult>) -> Self {
        Self { link_results }
    }

    /// Entries with `value == true`, in document order.
    pub fn active(&self) -> impl Iterator<Item = &LinkResult> {
        self.link_results.iter().filter(|r| r.value)
    }
}
