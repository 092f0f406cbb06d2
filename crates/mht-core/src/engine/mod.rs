//! The optimization engine for hypothesis graphs.
//!
//! This module provides:
//! - **errors**: Error types for loading, building and solving
//! - **weights**: Weight layout shared by all variables of one feature category
//! - **program**: Optimization model (variables, weighted factors, constraints)
//! - **builder**: Registration of a hypothesis graph into an optimization model
//! - **solution**: Variable labelings and link result export
//! - **ground_truth**: Expansion of link annotations into full labelings
//! - **verify**: Exclusion and flow conservation checks
//! - **solver**: Optimizer and learner seams with reference backends
//! - **tracker**: Lifecycle facade over one tracking problem
//! - **dot**: Graphviz export

pub mod builder;
pub mod dot;
pub mod errors;
pub mod ground_truth;
pub mod program;
pub mod solution;
pub mod solver;
pub mod tracker;
pub mod verify;
pub mod weights;
