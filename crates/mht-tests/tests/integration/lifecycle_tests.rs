//! Integration tests for the model lifecycle with the reference backends.

use mht_core::engine::program::OptimizationModel;
use mht_core::{
    load_model, ExhaustiveConfig, ExhaustiveOptimizer, LinkResult, ModelState, PerceptronConfig,
    PerceptronLearner, Solution, TrackingError, TrackingModel,
};
use mht_tests::{annotations, dividing_record, two_node_record, TWO_NODE_JSON};

// link, detection, appearance and disappearance; every "on" weight rewards activation
const FAVOR_ACTIVE: [f64; 8] = [0.0, -1.0, 0.0, -1.0, 0.0, -1.0, 0.0, -1.0];

#[test]
fn test_infer_finds_the_track() {
    let mut tm = load_model(TWO_NODE_JSON).unwrap();
    assert_eq!(tm.num_weights(), FAVOR_ACTIVE.len());

    let solution = tm
        .infer(&ExhaustiveOptimizer::default(), FAVOR_ACTIVE.to_vec())
        .unwrap()
        .clone();

    assert_eq!(tm.state(), ModelState::Solved);
    assert_eq!(tm.solution(), Some(&solution));
    assert!(tm.verify(&solution).unwrap().is_valid());
    assert_eq!(
        tm.export(&solution).unwrap().link_results,
        vec![LinkResult::new(1, 2, true)]
    );
}

#[test]
fn test_infer_with_positive_weights_keeps_everything_off() {
    let mut tm = load_model(TWO_NODE_JSON).unwrap();
    let weights = FAVOR_ACTIVE.iter().map(|w| -w).collect();
    let solution = tm.infer(&ExhaustiveOptimizer::default(), weights).unwrap();
    assert_eq!(solution.num_active(), 0);
}

#[test]
fn test_infer_after_explicit_build() {
    let mut tm = load_model(TWO_NODE_JSON).unwrap();
    tm.build(vec![0.0; 8]).unwrap();

    // inference may use weights other than the ones the model was built with
    let solution = tm
        .infer(&ExhaustiveOptimizer::default(), FAVOR_ACTIVE.to_vec())
        .unwrap();
    assert_eq!(solution.num_active(), 5);
}

#[test]
fn test_infer_with_wrong_weight_count_fails() {
    let mut tm = load_model(TWO_NODE_JSON).unwrap();
    let err = tm
        .infer(&ExhaustiveOptimizer::default(), vec![0.0; 3])
        .unwrap_err();
    assert!(matches!(err, TrackingError::WeightCount { expected: 8, actual: 3 }));
    assert_eq!(tm.state(), ModelState::Empty);
}

#[test]
fn test_optimizer_limits_are_reported() {
    let mut tm = TrackingModel::from_record(&dividing_record(true)).unwrap();
    let n = tm.num_weights();
    let optimizer = ExhaustiveOptimizer::new(ExhaustiveConfig { max_variables: 3 });
    let err = tm.infer(&optimizer, vec![0.0; n]).unwrap_err();
    assert!(matches!(err, TrackingError::ExternalOptimizer(_)));
}

#[test]
fn test_learn_prefers_ground_truth() {
    let mut tm = load_model(TWO_NODE_JSON).unwrap();
    let gt = annotations(&[(1, 2)]);
    let learner = PerceptronLearner::new(ExhaustiveOptimizer::default(), PerceptronConfig::default());

    let weights = tm.learn(&learner, &gt).unwrap().to_vec();

    assert_eq!(tm.state(), ModelState::LearningComplete);
    assert_eq!(weights.len(), tm.num_weights());
    assert_eq!(tm.learned_weights(), Some(weights.as_slice()));

    let model = tm.model().unwrap();
    let truth = tm.reconstruct_ground_truth(&gt).unwrap();
    let empty = Solution::zeros(model.num_variables());
    assert!(model.energy_with(&truth, &weights).unwrap() < model.energy_with(&empty, &weights).unwrap());
    assert!(matches!(
        model.energy_with(&truth, &[]),
        Err(TrackingError::WeightCount { expected: 8, actual: 0 })
    ));

    let err = tm
        .infer(&ExhaustiveOptimizer::default(), weights)
        .unwrap_err();
    assert!(matches!(
        err,
        TrackingError::IllegalTransition {
            state: ModelState::LearningComplete,
            ..
        }
    ));
}

#[test]
fn test_learn_propagates_reconstruction_errors() {
    let mut tm = TrackingModel::from_record(&two_node_record(None, None)).unwrap();
    let learner = PerceptronLearner::new(ExhaustiveOptimizer::default(), PerceptronConfig::default());
    let err = tm.learn(&learner, &annotations(&[(1, 2)])).unwrap_err();
    assert!(matches!(err, TrackingError::InvariantViolation { .. }));
    assert_eq!(tm.state(), ModelState::Built);
}

#[test]
fn test_custom_optimizer_plugs_in() {
    let mut tm = load_model(TWO_NODE_JSON).unwrap();
    let all_off = |model: &OptimizationModel, _: &[f64]| -> Result<Solution, TrackingError> {
        Ok(Solution::zeros(model.num_variables()))
    };
    let solution = tm.infer(&all_off, vec![0.0; 8]).unwrap().clone();
    assert!(tm.export(&solution).unwrap().link_results.iter().all(|r| !r.value));
}

#[test]
fn test_dot_highlights_solution() {
    let mut tm = load_model(TWO_NODE_JSON).unwrap();
    let plain = tm.to_dot(None);
    assert!(plain.contains("1 -> 2;"));

    let solution = tm
        .infer(&ExhaustiveOptimizer::default(), FAVOR_ACTIVE.to_vec())
        .unwrap()
        .clone();
    let dot = tm.to_dot(Some(&solution));
    assert!(dot.contains("1 -> 2 [color=\"blue\", penwidth=2];"));
    assert!(dot.contains("label=\"1, app\""));
    assert!(dot.contains("label=\"2, dis\""));
}
