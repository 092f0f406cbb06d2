//! Adapters between external documents and the record types of
//! [`records`](crate::records).
//!
//! The engine only consumes and produces records. An adapter decides how
//! they are encoded; the file helpers of [`SpecAdapter`] add the I/O around
//! any encoding.

use std::fs;
use std::path::Path;

use crate::engine::errors::TrackingError;
use crate::records::{GraphRecord, LinkResults};

#[cfg(feature = "serde")]
pub mod json;

#[cfg(feature = "serde")]
pub use json::JsonAdapter;

/// Decodes graph and ground truth documents and encodes result documents.
pub trait SpecAdapter {
    fn read_graph(&self, document: &str) -> Result<GraphRecord, TrackingError>;

    fn read_ground_truth(&self, document: &str) -> Result<LinkResults, TrackingError>;

    fn write_results(&self, results: &LinkResults) -> Result<String, TrackingError>;

    fn load_graph(&self, path: &Path) -> Result<GraphRecord, TrackingError> {
        let document = fs::read_to_string(path)?;
        self.read_graph(&document)
    }

    fn load_ground_truth(&self, path: &Path) -> Result<LinkResults, TrackingError> {
        let document = fs::read_to_string(path)?;
        self.read_ground_truth(&document)
    }

    fn save_results(&self, path: &Path, results: &LinkResults) -> Result<(), TrackingError> {
        let document = self.write_results(results)?;
        fs::write(path, document)?;

        #[cfg(feature = "tracing")]
        tracing::info!("saved {} link results to {}", results.link_results.len(), path.display());

        Ok(())
    }
}
