//! Optimization model handed to optimizer and learner backends.
//!
//! A model is a list of binary variables, one weighted unary factor per
//! variable, and linear constraints over the variables. Energies are
//! minimized.

use std::fmt;

use smallvec::SmallVec;

use crate::engine::errors::TrackingError;
use crate::engine::solution::Solution;
use crate::model::graph::HypothesisId;
use crate::model::linking::LinkKey;
use crate::model::variable::{VariableIndex, VariableKind};

/// The hypothesis a model variable belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariableOwner {
    Segmentation(HypothesisId),
    Link(LinkKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelVariable {
    pub kind: VariableKind,
    pub owner: VariableOwner,
}

/// Unary energy term of one variable.
///
/// `weight_ids` holds the off half followed by the on half, each as long as
/// `features`. The energy of state `s` is
/// `sum_f features[f] * weights[weight_ids[s * n + f]]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedFactor {
    pub variable: VariableIndex,
    pub features: Vec<f64>,
    pub weight_ids: Vec<usize>,
}

impl WeightedFactor {
    /// `weights` must cover every id in `weight_ids`.
    pub(crate) fn energy(&self, state: u8, weights: &[f64]) -> f64 {
        let n = self.features.len();
        let offset = usize::from(state > 0) * n;
        self.features
            .iter()
            .zip(&self.weight_ids[offset..offset + n])
            .map(|(f, &w)| f * weights[w])
            .sum()
    }

    /// Adds this factor's feature contribution for `state` to `phi`.
    fn accumulate(&self, state: u8, phi: &mut [f64]) {
        let n = self.features.len();
        let offset = usize::from(state > 0) * n;
        for (f, &w) in self.features.iter().zip(&self.weight_ids[offset..offset + n]) {
            phi[w] += f;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    Equal,
    LessEqual,
}

/// Why a constraint exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintOrigin {
    /// `incoming links + appearance = detection`
    Incoming(HypothesisId),
    /// `outgoing links + disappearance = detection + division`
    Outgoing(HypothesisId),
    /// `division <= detection`
    Division(HypothesisId),
    /// `sum(member detections) <= 1`, by exclusion index
    Exclusion(usize),
}

impl fmt::Display for ConstraintOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintOrigin::Incoming(id) => write!(f, "incoming flow of {}", id),
            ConstraintOrigin::Outgoing(id) => write!(f, "outgoing flow of {}", id),
            ConstraintOrigin::Division(id) => write!(f, "division of {}", id),
            ConstraintOrigin::Exclusion(i) => write!(f, "exclusion #{}", i),
        }
    }
}

pub type Terms = SmallVec<[(VariableIndex, i32); 8]>;

/// `sum(coefficient * x) <relation> rhs`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearConstraint {
    pub terms: Terms,
    pub relation: Relation,
    pub rhs: i32,
    pub origin: ConstraintOrigin,
}

impl LinearConstraint {
    pub fn new(terms: Terms, relation: Relation, rhs: i32, origin: ConstraintOrigin) -> Self {
        Self {
            terms,
            relation,
            rhs,
            origin,
        }
    }

    pub fn lhs(&self, solution: &Solution) -> i64 {
        self.terms
            .iter()
            .map(|&(var, coeff)| i64::from(coeff) * i64::from(solution.value(var)))
            .sum()
    }

    pub fn is_satisfied(&self, solution: &Solution) -> bool {
        let lhs = self.lhs(solution);
        let rhs = i64::from(self.rhs);
        match self.relation {
            Relation::Equal => lhs == rhs,
            Relation::LessEqual => lhs <= rhs,
        }
    }
}

/// Variables, weighted factors and constraints of one built graph.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationModel {
    variables: Vec<ModelVariable>,
    factors: Vec<WeightedFactor>,
    constraints: Vec<LinearConstraint>,
    weights: Vec<f64>,
}

impl OptimizationModel {
    /// Empty model bound to `weights`.
    pub fn with_weights(weights: Vec<f64>) -> Self {
        Self {
            weights,
            ..Self::default()
        }
    }

    pub(crate) fn add_variable(&mut self, kind: VariableKind, owner: VariableOwner) -> VariableIndex {
        let id = VariableIndex(self.variables.len());
        self.variables.push(ModelVariable { kind, owner });
        id
    }

    pub(crate) fn add_factor(&mut self, factor: WeightedFactor) {
        debug_assert_eq!(factor.weight_ids.len(), 2 * factor.features.len());
        self.factors.push(factor);
    }

    pub(crate) fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_weights(&self) -> usize {
        self.weights.len()
    }

    /// Weights the model was built with.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn variables(&self) -> &[ModelVariable] {
        &self.variables
    }

    pub fn variable(&self, id: VariableIndex) -> Option<&ModelVariable> {
        self.variables.get(id.0)
    }

    pub fn factors(&self) -> &[WeightedFactor] {
        &self.factors
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Energy of `solution` under the model's own weights.
    ///
    /// # Errors
    ///
    /// `TrackingError::SolutionLength` if `solution` does not fit the model.
    pub fn energy(&self, solution: &Solution) -> Result<f64, TrackingError> {
        self.energy_with(solution, &self.weights)
    }

    /// Total energy of `solution` under `weights`.
    ///
    /// # Errors
    ///
    /// * `TrackingError::WeightCount` - `weights` is not as long as the model's weight vector
    /// * `TrackingError::SolutionLength` - `solution` does not fit the model
    pub fn energy_with(&self, solution: &Solution, weights: &[f64]) -> Result<f64, TrackingError> {
        self.ensure_weight_count(weights)?;
        solution.ensure_len(self.num_variables())?;
        Ok(self
            .factors
            .iter()
            .map(|factor| factor.energy(solution.value(factor.variable), weights))
            .sum())
    }

    /// Joint feature map: `energy(solution, w) == dot(w, joint_features(solution))`.
    ///
    /// # Errors
    ///
    /// `TrackingError::SolutionLength` if `solution` does not fit the model.
    pub fn joint_features(&self, solution: &Solution) -> Result<Vec<f64>, TrackingError> {
        solution.ensure_len(self.num_variables())?;
        let mut phi = vec![0.0; self.weights.len()];
        for factor in &self.factors {
            factor.accumulate(solution.value(factor.variable), &mut phi);
        }
        Ok(phi)
    }

    fn ensure_weight_count(&self, weights: &[f64]) -> Result<(), TrackingError> {
        if weights.len() != self.weights.len() {
            return Err(TrackingError::WeightCount {
                expected: self.weights.len(),
                actual: weights.len(),
            });
        }
        Ok(())
    }

    pub fn is_feasible(&self, solution: &Solution) -> bool {
        solution.len() == self.num_variables()
            && self.constraints.iter().all(|c| c.is_satisfied(solution))
    }

    pub fn violated_constraints<'a>(
        &'a self,
        solution: &'a Solution,
    ) -> impl Iterator<Item = &'a LinearConstraint> + 'a {
        self.constraints.iter().filter(move |c| !c.is_satisfied(solution))
    }
}
