use churnpipe::inference::Scorer;
use churnpipe::pipeline::{ChurnPipeline, PipelineConfig};
use churnpipe::preprocessing::{ColumnClassifier, FeatureTransform, TransformConfig};
use churnpipe::training::{CandidateConfig, EstimatorConfig, MaxFeatures};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use polars::prelude::*;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

fn create_churn_data(n_rows: usize) -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let contracts = ["Month-to-month", "One year", "Two year"];

    let tenure: Vec<f64> = (0..n_rows).map(|_| rng.gen_range(0..72) as f64).collect();
    let monthly: Vec<f64> = (0..n_rows).map(|_| rng.gen_range(18.0..120.0)).collect();
    let contract: Vec<&str> = (0..n_rows).map(|_| contracts[rng.gen_range(0..3)]).collect();
    let churn: Vec<&str> = tenure
        .iter()
        .zip(&contract)
        .map(|(&t, &c)| {
            let base = if c == "Month-to-month" { 0.5 } else { 0.1 };
            let risk = base - t / 200.0;
            if rng.gen::<f64>() < risk { "Yes" } else { "No" }
        })
        .collect();

    df!(
        "tenure" => &tenure,
        "MonthlyCharges" => &monthly,
        "Contract" => &contract,
        "Churn" => &churn
    )
    .unwrap()
}

fn bench_candidates() -> Vec<CandidateConfig> {
    vec![
        CandidateConfig::new("logit", EstimatorConfig::logistic_regression()),
        CandidateConfig::new(
            "rf",
            EstimatorConfig::RandomForest {
                n_estimators: 50,
                max_depth: Some(8),
                min_samples_split: 2,
                min_samples_leaf: 1,
                max_features: MaxFeatures::Sqrt,
            },
        ),
    ]
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");

    for n_rows in [10_000, 50_000].iter() {
        let df = create_churn_data(*n_rows);
        let roles = ColumnClassifier::new("Churn").classify(&df).unwrap();
        let config = TransformConfig::default();

        group.bench_with_input(BenchmarkId::new("fit", n_rows), &df, |b, df| {
            b.iter(|| FeatureTransform::fit(black_box(df), &roles, &config).unwrap())
        });

        let transform = FeatureTransform::fit(&df, &roles, &config).unwrap();
        group.bench_with_input(BenchmarkId::new("apply", n_rows), &df, |b, df| {
            b.iter(|| transform.apply(black_box(df)).unwrap())
        });
    }

    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    for n_rows in [1000, 5000].iter() {
        let df = create_churn_data(*n_rows);
        let pipeline = ChurnPipeline::new(PipelineConfig::default().with_candidates(bench_candidates()));

        group.bench_with_input(BenchmarkId::new("run", n_rows), &df, |b, df| {
            b.iter(|| pipeline.run(black_box(df)).unwrap())
        });
    }

    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");

    let train = create_churn_data(2000);
    let outcome = ChurnPipeline::new(PipelineConfig::default().with_candidates(bench_candidates()))
        .run(&train)
        .unwrap();
    let scorer = Scorer::default();

    for n_rows in [10_000, 50_000].iter() {
        let df = create_churn_data(*n_rows);
        group.bench_with_input(BenchmarkId::new("score", n_rows), &df, |b, df| {
            b.iter(|| scorer.score(&outcome.pipeline, black_box(df)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_transform, bench_run, bench_scoring);
criterion_main!(benches);
