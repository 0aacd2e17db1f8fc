//! Integration test: Candidate training, evaluation and selection

use churnpipe::error::ChurnError;
use churnpipe::training::{
    roc_auc, select_best, stratified_train_test_split, CandidateConfig, ClassificationReport, Estimator,
    EstimatorConfig, MaxFeatures, TrainEngine, TrainedModel,
};
use ndarray::{Array1, Array2, Axis};

fn classification_data() -> (Array2<f64>, Array1<f64>) {
    let x = Array2::from_shape_vec(
        (20, 3),
        vec![
            1.0, 10.0, 0.1, 2.0, 9.0, 0.2, 3.0, 8.0, 0.3, 4.0, 7.0, 0.4, 5.0, 6.0, 0.5,
            6.0, 5.0, 0.6, 7.0, 4.0, 0.7, 8.0, 3.0, 0.8, 9.0, 2.0, 0.9, 10.0, 1.0, 1.0,
            1.5, 9.5, 0.15, 2.5, 8.5, 0.25, 3.5, 7.5, 0.35, 4.5, 6.5, 0.45, 5.5, 5.5, 0.55,
            6.5, 4.5, 0.65, 7.5, 3.5, 0.75, 8.5, 2.5, 0.85, 9.5, 1.5, 0.95, 10.5, 0.5, 1.05,
        ],
    )
    .unwrap()
    .mapv(|v| v / 10.0);
    let y = Array1::from_vec(vec![
        0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    ]);
    (x, y)
}

fn split_data() -> (Array2<f64>, Array1<f64>, Array2<f64>, Array1<f64>) {
    let (x, y) = classification_data();
    let split = stratified_train_test_split(&y, 0.3, 42).unwrap();
    (
        x.select(Axis(0), &split.train_indices),
        y.select(Axis(0), &split.train_indices),
        x.select(Axis(0), &split.test_indices),
        y.select(Axis(0), &split.test_indices),
    )
}

#[test]
fn test_every_family_separates_the_classes() {
    let (x, y) = classification_data();
    let configs = vec![
        EstimatorConfig::logistic_regression(),
        EstimatorConfig::random_forest(),
        EstimatorConfig::DecisionTree {
            max_depth: Some(4),
            min_samples_split: 2,
            min_samples_leaf: 1,
        },
    ];

    for config in configs {
        let mut model = config.build(42);
        model.fit(&x, &y).unwrap();
        let proba = model.predict_proba(&x).unwrap();
        assert_eq!(proba.len(), 20);
        let auc = roc_auc(&y, &proba).unwrap();
        assert!(auc > 0.9, "{} auc = {}", model.family(), auc);
    }
}

#[test]
fn test_engine_scores_every_candidate() {
    let (x_train, y_train, x_test, y_test) = split_data();
    let engine = TrainEngine::new(CandidateConfig::defaults());
    let runs = engine.evaluate(&x_train, &y_train, &x_test, &y_test);

    assert_eq!(runs.len(), 2);
    for run in &runs {
        let scores = run.result.scores().unwrap();
        assert!((0.0..=1.0).contains(&scores.roc_auc));
        assert!((0.0..=1.0).contains(&scores.pr_auc));
        let cm = &scores.report.confusion;
        let total = cm.true_negative + cm.false_positive + cm.false_negative + cm.true_positive;
        assert_eq!(total, y_test.len());
        assert!(run.model.is_some());
    }
}

#[test]
fn test_failed_candidate_is_skipped() {
    let (x_train, y_train, x_test, y_test) = split_data();
    let bad = CandidateConfig::new(
        "empty_forest",
        EstimatorConfig::RandomForest {
            n_estimators: 0,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
        },
    );
    let good = CandidateConfig::new("logit", EstimatorConfig::logistic_regression());

    let runs = TrainEngine::new(vec![bad, good]).evaluate(&x_train, &y_train, &x_test, &y_test);
    assert!(runs[0].result.is_failed());
    assert!(runs[0].model.is_none());

    let (selected, results) = select_best(runs).unwrap();
    assert_eq!(selected.name, "logit");
    assert_eq!(results.len(), 2);
}

#[test]
fn test_all_candidates_failing_is_no_viable_model() {
    let (x_train, y_train, x_test, y_test) = split_data();
    let bad = CandidateConfig::new(
        "empty_forest",
        EstimatorConfig::RandomForest {
            n_estimators: 0,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::All,
        },
    );

    let runs = TrainEngine::new(vec![bad]).evaluate(&x_train, &y_train, &x_test, &y_test);
    let result = select_best(runs);
    assert!(matches!(result, Err(ChurnError::NoViableModel { attempted: 1 })));
}

#[test]
fn test_same_seed_same_forest() {
    let (x, y) = classification_data();
    let config = EstimatorConfig::random_forest();

    let mut a = config.build(11);
    let mut b = config.build(11);
    a.fit(&x, &y).unwrap();
    b.fit(&x, &y).unwrap();
    assert_eq!(a.predict_proba(&x).unwrap(), b.predict_proba(&x).unwrap());
}

#[test]
fn test_report_from_model_output() {
    let (x, y) = classification_data();
    let mut model: TrainedModel = EstimatorConfig::logistic_regression().build(0);
    model.fit(&x, &y).unwrap();
    let proba = model.predict_proba(&x).unwrap();

    let report = ClassificationReport::from_probabilities(&y, &proba, 0.5).unwrap();
    assert_eq!(report.negative.support + report.positive.support, 20);
    assert!(report.accuracy > 0.8);
    let text = report.to_string();
    assert!(text.contains("precision"));
}
