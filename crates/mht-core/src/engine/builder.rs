//! Registers a hypothesis graph into an [`OptimizationModel`].
//!
//! Links are registered first so that segmentations can refer to the link
//! variables when their flow constraints are emitted. Exclusions come last.
//! Registration assigns optimizer ids to every present variable and freezes
//! the graph; a graph can be registered once.

use smallvec::SmallVec;

use crate::engine::errors::TrackingError;
use crate::engine::program::{
    ConstraintOrigin, LinearConstraint, OptimizationModel, Relation, Terms, VariableOwner,
    WeightedFactor,
};
use crate::engine::weights::{FeatureCategory, WeightLayout, WeightRange};
use crate::model::graph::HypothesisGraph;
use crate::model::segmentation::SegmentationHypothesis;
use crate::model::variable::{Variable, VariableIndex, VariableKind};

const SEGMENTATION_KINDS: [VariableKind; 4] = [
    VariableKind::Detection,
    VariableKind::Division,
    VariableKind::Appearance,
    VariableKind::Disappearance,
];

/// Builds the optimization model of one graph with a given weight vector.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    layout: WeightLayout,
    weights: Vec<f64>,
}

impl ModelBuilder {
    /// Checks `weights` against the layout of `graph`.
    ///
    /// # Errors
    ///
    /// * `TrackingError::Consistency` - the graph has inconsistent feature counts
    /// * `TrackingError::WeightCount` - `weights` does not match the layout
    pub fn new(graph: &HypothesisGraph, weights: Vec<f64>) -> Result<Self, TrackingError> {
        let layout = WeightLayout::compute(graph)?;
        if weights.len() != layout.num_weights() {
            return Err(TrackingError::WeightCount {
                expected: layout.num_weights(),
                actual: weights.len(),
            });
        }
        Ok(Self { layout, weights })
    }

    pub fn layout(&self) -> &WeightLayout {
        &self.layout
    }

    /// Assigns optimizer ids to every variable of `graph` and emits factors and constraints.
    ///
    /// # Errors
    ///
    /// * `TrackingError::IllegalTransition` - the graph was registered before
    /// * `TrackingError::WeightCount` - `graph` has a different layout than the one checked in [`new`](Self::new)
    pub fn build(self, graph: &mut HypothesisGraph) -> Result<OptimizationModel, TrackingError> {
        let layout = WeightLayout::compute(graph)?;
        if layout != self.layout {
            return Err(TrackingError::WeightCount {
                expected: layout.num_weights(),
                actual: self.weights.len(),
            });
        }
        graph.mark_registered()?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            "initializing optimization model with {} weights",
            self.layout.num_weights()
        );

        let mut model = OptimizationModel::with_weights(self.weights);

        let link_range = self.layout.range(FeatureCategory::Link);
        for link in graph.links_mut() {
            let key = link.key();
            let id = register(
                &mut model,
                link.variable_mut(),
                VariableKind::Link,
                VariableOwner::Link(key),
                link_range,
            );
            debug_assert_eq!(link.optimizer_id(), Some(id));
        }

        for hyp in graph.segmentations_mut() {
            let owner = VariableOwner::Segmentation(hyp.id());
            for kind in SEGMENTATION_KINDS {
                let range = self.layout.range(FeatureCategory::from(kind));
                if let Some(var) = hyp.variable_mut(kind) {
                    register(&mut model, var, kind, owner, range);
                }
            }
        }

        for hyp in graph.segmentations() {
            add_flow_constraints(&mut model, graph, hyp)?;
        }

        for (index, exclusion) in graph.exclusions().iter().enumerate() {
            exclusion.add_to_model(index, &mut model, graph)?;
        }
        graph.complete_registration(model.num_variables());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "model has {} variables, {} factors, {} constraints",
            model.num_variables(),
            model.factors().len(),
            model.constraints().len()
        );

        Ok(model)
    }
}

fn register(
    model: &mut OptimizationModel,
    var: &mut Variable,
    kind: VariableKind,
    owner: VariableOwner,
    range: WeightRange,
) -> VariableIndex {
    let id = model.add_variable(kind, owner);
    var.assign(id);
    model.add_factor(WeightedFactor {
        variable: id,
        features: var.features().to_vec(),
        weight_ids: range.ids(),
    });
    id
}

fn add_flow_constraints(
    model: &mut OptimizationModel,
    graph: &HypothesisGraph,
    hyp: &SegmentationHypothesis,
) -> Result<(), TrackingError> {
    let id = hyp.id();
    let detection = hyp.optimizer_id(VariableKind::Detection).ok_or_else(|| {
        TrackingError::Reference(format!("detection of {} is not registered", id))
    })?;
    let division = hyp.optimizer_id(VariableKind::Division);
    let appearance = hyp.optimizer_id(VariableKind::Appearance);
    let disappearance = hyp.optimizer_id(VariableKind::Disappearance);

    let mut incoming: Terms = graph
        .incoming_links(id)
        .filter_map(|l| l.optimizer_id())
        .map(|v| (v, 1))
        .collect();
    incoming.extend(appearance.map(|v| (v, 1)));
    incoming.push((detection, -1));
    model.add_constraint(LinearConstraint::new(
        incoming,
        Relation::Equal,
        0,
        ConstraintOrigin::Incoming(id),
    ));

    let mut outgoing: Terms = graph
        .outgoing_links(id)
        .filter_map(|l| l.optimizer_id())
        .map(|v| (v, 1))
        .collect();
    outgoing.extend(disappearance.map(|v| (v, 1)));
    outgoing.push((detection, -1));
    outgoing.extend(division.map(|v| (v, -1)));
    model.add_constraint(LinearConstraint::new(
        outgoing,
        Relation::Equal,
        0,
        ConstraintOrigin::Outgoing(id),
    ));

    if let Some(division) = division {
        let terms: Terms = SmallVec::from_slice(&[(division, 1), (detection, -1)]);
        model.add_constraint(LinearConstraint::new(
            terms,
            Relation::LessEqual,
            0,
            ConstraintOrigin::Division(id),
        ));
    }

    Ok(())
}
