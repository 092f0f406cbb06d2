//! Optimizer and learner backends.
//!
//! Production models are solved by an external integer program solver and
//! trained by an external structured learner; both plug in through the
//! [`Optimizer`] and [`Learner`] traits. The two reference backends here
//! are meant for small instances and tests:
//!
//! - [`ExhaustiveOptimizer`] enumerates every binary labeling
//! - [`PerceptronLearner`] runs a structured perceptron on top of any optimizer

use crate::engine::errors::TrackingError;
use crate::engine::program::OptimizationModel;
use crate::engine::solution::Solution;

/// Finds a minimum-energy feasible labeling of a model.
pub trait Optimizer {
    /// Solves `model` under `weights` (which may differ from the model's own).
    fn optimize(&self, model: &OptimizationModel, weights: &[f64]) -> Result<Solution, TrackingError>;
}

impl<F> Optimizer for F
where
    F: Fn(&OptimizationModel, &[f64]) -> Result<Solution, TrackingError>,
{
    fn optimize(&self, model: &OptimizationModel, weights: &[f64]) -> Result<Solution, TrackingError> {
        self(model, weights)
    }
}

/// Learns a weight vector under which `ground_truth` is the preferred labeling.
pub trait Learner {
    fn learn(&self, model: &OptimizationModel, ground_truth: &Solution) -> Result<Vec<f64>, TrackingError>;
}

/// Configuration for [`ExhaustiveOptimizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExhaustiveConfig {
    /// Largest model (in variables) the optimizer accepts. At most 30.
    pub max_variables: usize,
}

impl Default for ExhaustiveConfig {
    fn default() -> Self {
        Self { max_variables: 20 }
    }
}

impl ExhaustiveConfig {
    const HARD_LIMIT: usize = 30;

    fn validate(self) -> Result<Self, TrackingError> {
        if self.max_variables > Self::HARD_LIMIT {
            return Err(TrackingError::ExternalOptimizer(format!(
                "exhaustive search: max_variables must be <= {}",
                Self::HARD_LIMIT
            )));
        }
        Ok(self)
    }
}

/// Brute-force optimizer over all `2^n` labelings.
///
/// Ties are broken towards the labeling enumerated first, so results are
/// deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveOptimizer {
    config: ExhaustiveConfig,
}

impl ExhaustiveOptimizer {
    pub fn new(config: ExhaustiveConfig) -> Self {
        Self { config }
    }
}

impl Optimizer for ExhaustiveOptimizer {
    fn optimize(&self, model: &OptimizationModel, weights: &[f64]) -> Result<Solution, TrackingError> {
        let config = self.config.validate()?;
        let n = model.num_variables();
        if n > config.max_variables {
            return Err(TrackingError::ExternalOptimizer(format!(
                "exhaustive search: model has {} variables, limit is {}",
                n, config.max_variables
            )));
        }
        if weights.len() != model.num_weights() {
            return Err(TrackingError::WeightCount {
                expected: model.num_weights(),
                actual: weights.len(),
            });
        }

        let mut best: Option<(f64, Solution)> = None;
        for mask in 0u64..(1u64 << n) {
            let labels = (0..n).map(|i| ((mask >> i) & 1) as u8).collect();
            let candidate = Solution::from_labels(labels);
            if !model.is_feasible(&candidate) {
                continue;
            }
            let energy = model.energy_with(&candidate, weights)?;
            if best.as_ref().map_or(true, |(e, _)| energy < *e) {
                best = Some((energy, candidate));
            }
        }

        let (energy, solution) = best.ok_or_else(|| {
            TrackingError::ExternalOptimizer("exhaustive search: model has no feasible labeling".into())
        })?;

        #[cfg(feature = "tracing")]
        tracing::info!("solution has energy: {}", energy);
        #[cfg(not(feature = "tracing"))]
        let _ = energy;

        Ok(solution)
    }
}

/// Configuration for [`PerceptronLearner`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceptronConfig {
    /// Maximum number of oracle calls.
    pub max_iterations: usize,
    /// Step size of every weight update.
    pub learning_rate: f64,
}

impl Default for PerceptronConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            learning_rate: 1.0,
        }
    }
}

impl PerceptronConfig {
    fn validate(self) -> Result<Self, TrackingError> {
        if self.max_iterations == 0 {
            return Err(TrackingError::ExternalOptimizer(
                "perceptron: max_iterations must be > 0".into(),
            ));
        }
        if self.learning_rate <= 0.0 || !self.learning_rate.is_finite() {
            return Err(TrackingError::ExternalOptimizer(
                "perceptron: learning_rate must be finite and > 0".into(),
            ));
        }
        Ok(self)
    }
}

/// Runtime diagnostics of one learning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LearningDiagnostics {
    pub iterations_run: usize,
    /// Whether the oracle reproduced the ground truth before the iteration limit.
    pub converged: bool,
}

/// Structured perceptron.
///
/// Each iteration asks the optimizer for the best labeling under the current
/// weights and moves the weights by the difference of joint feature maps
/// until the ground truth is reproduced.
#[derive(Debug, Clone, Default)]
pub struct PerceptronLearner<O> {
    optimizer: O,
    config: PerceptronConfig,
}

impl<O: Optimizer> PerceptronLearner<O> {
    pub fn new(optimizer: O, config: PerceptronConfig) -> Self {
        Self { optimizer, config }
    }

    pub fn learn_with_diagnostics(
        &self,
        model: &OptimizationModel,
        ground_truth: &Solution,
    ) -> Result<(Vec<f64>, LearningDiagnostics), TrackingError> {
        let config = self.config.validate()?;
        ground_truth.ensure_len(model.num_variables())?;

        let target = model.joint_features(ground_truth)?;
        let mut weights = model.weights().to_vec();
        let mut diagnostics = LearningDiagnostics {
            iterations_run: 0,
            converged: false,
        };

        for iteration in 0..config.max_iterations {
            diagnostics.iterations_run = iteration + 1;
            let predicted = self.optimizer.optimize(model, &weights)?;
            if predicted == *ground_truth {
                diagnostics.converged = true;
                break;
            }

            let phi = model.joint_features(&predicted)?;
            let mut moved = false;
            for ((w, p), t) in weights.iter_mut().zip(&phi).zip(&target) {
                let step = config.learning_rate * (p - t);
                if step != 0.0 {
                    *w += step;
                    moved = true;
                }
            }
            if !moved {
                // Prediction and ground truth share a feature map; no update can separate them.
                break;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            "perceptron finished after {} iterations (converged = {})",
            diagnostics.iterations_run,
            diagnostics.converged
        );

        Ok((weights, diagnostics))
    }
}

impl<O: Optimizer> Learner for PerceptronLearner<O> {
    fn learn(&self, model: &OptimizationModel, ground_truth: &Solution) -> Result<Vec<f64>, TrackingError> {
        self.learn_with_diagnostics(model, ground_truth)
            .map(|(weights, _)| weights)
    }
}
