//! # MHT Core
//!
//! Multi-hypothesis tracking as binary optimization: a hypothesis graph of
//! segmentation and linking candidates, its encoding as an optimization
//! model with shared feature weights, ground truth reconstruction from link
//! annotations, and solution verification.

pub mod adapter;
pub mod engine;
pub mod model;
pub mod records;

// Re-export commonly used types
pub use engine::errors::TrackingError;
pub use engine::solution::Solution;
pub use engine::solver::{
    ExhaustiveConfig, ExhaustiveOptimizer, Learner, Optimizer, PerceptronConfig, PerceptronLearner,
};
pub use engine::tracker::{ModelState, TrackingModel};
pub use engine::verify::VerificationReport;
pub use engine::weights::{FeatureCategory, WeightLayout};
pub use model::{HypothesisGraph, HypothesisId};
pub use records::{GraphRecord, LinkResult, LinkResults};

/// Loads a graph document and wraps it in a [`TrackingModel`].
///
/// This is a convenience function that combines decoding and graph
/// construction.
#[cfg(feature = "serde")]
pub fn load_model(document: &str) -> Result<TrackingModel, TrackingError> {
    use adapter::SpecAdapter;

    let record = adapter::JsonAdapter::new().read_graph(document)?;
    TrackingModel::from_record(&record)
}
