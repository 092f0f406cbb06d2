//! JSON documents.
//!
//! Graph documents look like
//!
//! ```json
//! {
//!   "segmentationHypotheses": [{"id": 1, "features": [0.5], "appearanceFeatures": [0.1]}],
//!   "linkingHypotheses": [{"src": 1, "dest": 2, "features": [0.3]}],
//!   "exclusions": [[2, 3]]
//! }
//! ```
//!
//! and ground truth / result documents like `{"linkResults": [{"src": 1, "dest": 2, "value": true}]}`.

use serde::de::DeserializeOwned;

use crate::adapter::SpecAdapter;
use crate::engine::errors::TrackingError;
use crate::records::{GraphRecord, LinkResults};

/// [`SpecAdapter`] for JSON documents.
#[derive(Debug, Clone, Copy)]
pub struct JsonAdapter {
    /// Indent written documents.
    pub pretty: bool,
}

impl Default for JsonAdapter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn decode<T: DeserializeOwned>(document: &str, what: &str) -> Result<T, TrackingError> {
        serde_json::from_str(document)
            .map_err(|e| TrackingError::Parse(format!("failed to read {} document: {}", what, e)))
    }
}

impl SpecAdapter for JsonAdapter {
    fn read_graph(&self, document: &str) -> Result<GraphRecord, TrackingError> {
        Self::decode(document, "graph")
    }

    fn read_ground_truth(&self, document: &str) -> Result<LinkResults, TrackingError> {
        let results: LinkResults = Self::decode(document, "ground truth")?;

        #[cfg(feature = "tracing")]
        tracing::debug!("read {} link annotations", results.link_results.len());

        Ok(results)
    }

    fn write_results(&self, results: &LinkResults) -> Result<String, TrackingError> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(results)
        } else {
            serde_json::to_string(results)
        };
        Ok(encoded?)
    }
}
