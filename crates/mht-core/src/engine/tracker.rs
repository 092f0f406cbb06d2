//! # Tracking Model
//!
//! Facade over one tracking problem: owns the hypothesis graph, builds its
//! optimization model once, and drives inference, learning, ground truth
//! reconstruction, verification and export.
//!
//! ## Lifecycle
//!
//! ```text
//! Empty --build--> Built --infer--> Solved
//!   |                |
//!   |                +---learn----> LearningComplete
//!   +--infer/learn (build implicitly)
//! ```
//!
//! Reconstruction, verification and export need a built model and never
//! rebuild it. Every other transition fails with
//! `TrackingError::IllegalTransition`.

use std::fmt;

use crate::engine::builder::ModelBuilder;
use crate::engine::dot;
use crate::engine::errors::TrackingError;
use crate::engine::ground_truth;
use crate::engine::program::OptimizationModel;
use crate::engine::solution::{export_link_results, Solution};
use crate::engine::solver::{Learner, Optimizer};
use crate::engine::verify::{verify_solution, VerificationReport};
use crate::engine::weights::WeightLayout;
use crate::model::graph::HypothesisGraph;
use crate::records::{GraphRecord, LinkResults};

/// Lifecycle state of a [`TrackingModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelState {
    /// Graph loaded, no optimizer ids assigned.
    Empty,
    /// Optimization model built.
    Built,
    /// An optimizer produced a solution.
    Solved,
    /// A learner produced a weight vector.
    LearningComplete,
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelState::Empty => "empty",
            ModelState::Built => "built",
            ModelState::Solved => "solved",
            ModelState::LearningComplete => "learning complete",
        };
        f.write_str(name)
    }
}

/// One tracking problem and its optimization model.
#[derive(Debug, Clone)]
pub struct TrackingModel {
    graph: HypothesisGraph,
    layout: WeightLayout,
    state: ModelState,
    model: Option<OptimizationModel>,
    solution: Option<Solution>,
    learned_weights: Option<Vec<f64>>,
}

impl TrackingModel {
    /// Wraps a populated, unregistered graph.
    ///
    /// # Errors
    ///
    /// * `TrackingError::Consistency` - feature lengths disagree within a category
    /// * `TrackingError::IllegalTransition` - the graph is already registered
    pub fn new(graph: HypothesisGraph) -> Result<Self, TrackingError> {
        if graph.is_registered() {
            return Err(TrackingError::IllegalTransition {
                operation: "wrap a registered graph",
                state: ModelState::Built,
            });
        }
        let layout = WeightLayout::compute(&graph)?;
        Ok(Self {
            graph,
            layout,
            state: ModelState::Empty,
            model: None,
            solution: None,
            learned_weights: None,
        })
    }

    /// Loads a graph record.
    ///
    /// # Errors
    ///
    /// * `TrackingError::Duplicate` / `TrackingError::Reference` - malformed record
    /// * `TrackingError::Consistency` - feature lengths disagree within a category
    pub fn from_record(record: &GraphRecord) -> Result<Self, TrackingError> {
        Self::new(HypothesisGraph::from_record(record)?)
    }

    pub fn graph(&self) -> &HypothesisGraph {
        &self.graph
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    pub fn layout(&self) -> &WeightLayout {
        &self.layout
    }

    /// Length of the weight vector this problem expects.
    pub fn num_weights(&self) -> usize {
        self.layout.num_weights()
    }

    /// One human readable label per weight, in weight order.
    pub fn weight_descriptions(&self) -> Vec<String> {
        self.layout.descriptions()
    }

    /// The built optimization model, if any.
    pub fn model(&self) -> Option<&OptimizationModel> {
        self.model.as_ref()
    }

    /// Solution of the last successful [`infer`](Self::infer).
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Weights of the last successful [`learn`](Self::learn).
    pub fn learned_weights(&self) -> Option<&[f64]> {
        self.learned_weights.as_deref()
    }

    /// Registers the graph and builds its optimization model.
    ///
    /// # Errors
    ///
    /// * `TrackingError::IllegalTransition` - the model was built before
    /// * `TrackingError::WeightCount` - `weights` does not match the layout
    pub fn build(&mut self, weights: Vec<f64>) -> Result<&OptimizationModel, TrackingError> {
        self.require(ModelState::Empty, "build")?;
        let model = ModelBuilder::new(&self.graph, weights)?.build(&mut self.graph)?;
        self.state = ModelState::Built;
        Ok(self.model.insert(model))
    }

    /// Solves the problem with `weights`, building the model first if needed.
    ///
    /// # Errors
    ///
    /// * `TrackingError::IllegalTransition` - already solved or learned
    /// * `TrackingError::WeightCount` - `weights` does not match the layout
    /// * `TrackingError::SolutionLength` - the optimizer returned a malformed solution
    /// * any error of the optimizer
    pub fn infer<O>(&mut self, optimizer: &O, weights: Vec<f64>) -> Result<&Solution, TrackingError>
    where
        O: Optimizer + ?Sized,
    {
        let model = match self.state {
            ModelState::Empty => self.build(weights.clone())?,
            ModelState::Built => self.built_model("infer")?,
            state => {
                return Err(TrackingError::IllegalTransition {
                    operation: "infer",
                    state,
                })
            }
        };
        if weights.len() != model.num_weights() {
            return Err(TrackingError::WeightCount {
                expected: model.num_weights(),
                actual: weights.len(),
            });
        }

        let solution = optimizer.optimize(model, &weights)?;
        solution.ensure_len(model.num_variables())?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            "found solution with {} of {} variables active",
            solution.num_active(),
            solution.len()
        );

        self.state = ModelState::Solved;
        Ok(self.solution.insert(solution))
    }

    /// Learns a weight vector from link annotations.
    ///
    /// An unbuilt model is built with zero weights first.
    ///
    /// # Errors
    ///
    /// * `TrackingError::IllegalTransition` - already solved or learned
    /// * any ground truth reconstruction error
    /// * `TrackingError::WeightCount` - the learner returned a malformed weight vector
    /// * any error of the learner
    pub fn learn<L>(&mut self, learner: &L, annotations: &LinkResults) -> Result<&[f64], TrackingError>
    where
        L: Learner + ?Sized,
    {
        match self.state {
            ModelState::Empty => {
                self.build(vec![0.0; self.layout.num_weights()])?;
            }
            ModelState::Built => {}
            state => {
                return Err(TrackingError::IllegalTransition {
                    operation: "learn",
                    state,
                })
            }
        }

        let ground_truth = self.reconstruct_ground_truth(annotations)?;
        let model = self.built_model("learn")?;
        let weights = learner.learn(model, &ground_truth)?;
        if weights.len() != model.num_weights() {
            return Err(TrackingError::WeightCount {
                expected: model.num_weights(),
                actual: weights.len(),
            });
        }

        #[cfg(feature = "tracing")]
        tracing::info!("learned {} weights", weights.len());

        self.state = ModelState::LearningComplete;
        Ok(self.learned_weights.insert(weights))
    }

    /// Expands link annotations into a labeling of every model variable.
    ///
    /// # Errors
    ///
    /// * `TrackingError::IllegalTransition` - the model is not built
    /// * see [`ground_truth::reconstruct_ground_truth`]
    pub fn reconstruct_ground_truth(&self, annotations: &LinkResults) -> Result<Solution, TrackingError> {
        self.built_model("reconstruct ground truth")?;
        ground_truth::reconstruct_ground_truth(&self.graph, annotations)
    }

    /// Checks exclusion and flow conservation invariants of `solution`.
    ///
    /// # Errors
    ///
    /// * `TrackingError::IllegalTransition` - the model is not built
    /// * `TrackingError::SolutionLength` - `solution` does not fit the model
    pub fn verify(&self, solution: &Solution) -> Result<VerificationReport, TrackingError> {
        self.built_model("verify")?;
        verify_solution(&self.graph, solution)
    }

    /// Activation of every linking hypothesis in `solution`, in link key order.
    ///
    /// # Errors
    ///
    /// * `TrackingError::IllegalTransition` - the model is not built
    /// * `TrackingError::SolutionLength` - `solution` does not fit the model
    pub fn export(&self, solution: &Solution) -> Result<LinkResults, TrackingError> {
        self.built_model("export")?;
        export_link_results(&self.graph, solution)
    }

    /// Graphviz rendering of the graph, highlighting `solution` if given.
    pub fn to_dot(&self, solution: Option<&Solution>) -> String {
        dot::to_dot(&self.graph, solution)
    }

    fn require(&self, expected: ModelState, operation: &'static str) -> Result<(), TrackingError> {
        if self.state != expected {
            return Err(TrackingError::IllegalTransition {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    fn built_model(&self, operation: &'static str) -> Result<&OptimizationModel, TrackingError> {
        self.model.as_ref().ok_or(TrackingError::IllegalTransition {
            operation,
            state: self.state,
        })
    }
}
