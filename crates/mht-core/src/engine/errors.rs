//! Error types for model construction, reconstruction and solving.

use thiserror::Error;

use crate::engine::tracker::ModelState;
use crate::engine::weights::FeatureCategory;
use crate::model::graph::HypothesisId;

/// Errors that can occur while loading, building, reconstructing or solving a model.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in the future without breaking changes.
///
/// Every variant is fatal at the point of detection. Verification findings are
/// not errors; they are collected in a
/// [`VerificationReport`](crate::engine::verify::VerificationReport).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TrackingError {
    /// A source or sink could not be read or written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An external document could not be decoded or encoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Variables of one feature category disagree on their feature count.
    #[error(
        "consistency error: {category} features of hypothesis {hypothesis} have length {found}, expected {expected}"
    )]
    Consistency {
        category: FeatureCategory,
        hypothesis: String,
        expected: usize,
        found: usize,
    },

    /// An annotation or constraint refers to an unknown hypothesis or link.
    #[error("reference error: {0}")]
    Reference(String),

    /// The same hypothesis id or link key was supplied twice.
    #[error("duplicate entry: {0}")]
    Duplicate(String),

    /// Ground truth needs an event variable the hypothesis does not have.
    #[error("invariant violation: segmentation hypothesis {id}: {message}")]
    InvariantViolation { id: HypothesisId, message: String },

    /// Link annotations use a hypothesis in a way no labeling can satisfy.
    #[error("inconsistent annotation: {0}")]
    InconsistentAnnotation(String),

    /// Failure reported by an optimizer or learner backend.
    #[error("optimizer error: {0}")]
    ExternalOptimizer(String),

    /// Weight vector does not match the weight layout.
    #[error("weight vector has {actual} entries, the layout needs {expected}")]
    WeightCount { expected: usize, actual: usize },

    /// Solution vector does not match the number of model variables.
    #[error("solution has {actual} entries, the model has {expected} variables")]
    SolutionLength { expected: usize, actual: usize },

    /// Operation not allowed in the current lifecycle state.
    #[error("cannot {operation} while the model is {state}")]
    IllegalTransition {
        operation: &'static str,
        state: ModelState,
    },
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for TrackingError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            TrackingError::Io(err.into())
        } else {
            TrackingError::Parse(err.to_string())
        }
    }
}
