//! The hypothesis data model.
//!
//! This module provides:
//! - **variable**: binary decisions with feature vectors and optimizer ids
//! - **segmentation**: object candidates with detection/division/appearance/disappearance variables
//! - **linking**: candidate transitions between two segmentations
//! - **exclusion**: mutual exclusion between segmentations
//! - **graph**: the owning container and its adjacency index

pub mod exclusion;
pub mod graph;
pub mod linking;
pub mod segmentation;
pub mod variable;

pub use exclusion::ExclusionConstraint;
pub use graph::{HypothesisGraph, HypothesisId};
pub use linking::{LinkKey, LinkingHypothesis};
pub use segmentation::SegmentationHypothesis;
pub use variable::{Variable, VariableIndex, VariableKind};
