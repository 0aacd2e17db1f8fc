//! churnpipe CLI Module
//!
//! Command-line interface for preparing data, training, scoring and inspection.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::feature_engineering::FeatureEngineer;
use crate::inference::{Scorer, ScoringConfig, TrainedPipeline};
use crate::pipeline::{ChurnPipeline, PipelineConfig};
use crate::preprocessing::{ColumnRole, ExclusionReason};
use crate::training::EvaluationOutcome;
use crate::utils::{DataLoader, DataSaver};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn kv(key: &str, val: &str) {
    println!("  {:<18} {}", muted(key), val.white());
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "churnpipe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Leakage-safe churn model training, selection and scoring")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a raw export and derive engagement features
    Prepare {
        /// Raw input file (CSV or TSV)
        #[arg(short, long)]
        data: PathBuf,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Pipeline configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target column name
        #[arg(short, long)]
        target: Option<String>,
    },

    /// Train candidates, select the best and score the dataset
    Train {
        /// Prepared input file (CSV or TSV)
        #[arg(short, long)]
        data: PathBuf,

        /// Pipeline configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target column name
        #[arg(short, long)]
        target: Option<String>,

        /// Share of rows held out for evaluation
        #[arg(long)]
        test_fraction: Option<f64>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Probability threshold for the predicted label
        #[arg(long)]
        threshold: Option<f64>,

        /// Identifier column never used as a feature (repeatable)
        #[arg(long = "id-column")]
        id_columns: Vec<String>,

        /// Directory for best_model.json and churn_scored.csv
        #[arg(short, long, default_value = "outputs")]
        output_dir: PathBuf,
    },

    /// Re-score a dataset with a saved pipeline
    Score {
        /// Saved pipeline (best_model.json)
        #[arg(short, long)]
        model: PathBuf,

        /// Input data file
        #[arg(short, long)]
        data: PathBuf,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show dataset shape and column roles
    Info {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,

        /// Pipeline configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target column name
        #[arg(short, long)]
        target: Option<String>,

        /// Identifier column never used as a feature (repeatable)
        #[arg(long = "id-column")]
        id_columns: Vec<String>,
    },
}

/// Dispatch a parsed command line
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Prepare { data, output, config, target } => {
            cmd_prepare(&data, &output, config.as_deref(), target)
        }
        Commands::Train {
            data,
            config,
            target,
            test_fraction,
            seed,
            threshold,
            id_columns,
            output_dir,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(target) = target {
                config = config.with_target(target);
            }
            if let Some(fraction) = test_fraction {
                config = config.with_test_fraction(fraction);
            }
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if let Some(threshold) = threshold {
                config = config.with_threshold(threshold);
            }
            if !id_columns.is_empty() {
                config = config.with_identifier_columns(id_columns);
            }
            cmd_train(&data, config, &output_dir)
        }
        Commands::Score { model, data, output } => cmd_score(&model, &data, &output),
        Commands::Info { data, config, target, id_columns } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(target) = target {
                config = config.with_target(target);
            }
            if !id_columns.is_empty() {
                config = config.with_identifier_columns(id_columns);
            }
            cmd_info(&data, config)
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    Ok(match path {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    })
}

fn load_data(path: &Path) -> anyhow::Result<polars::prelude::DataFrame> {
    step_run("Loading data");
    let start = Instant::now();
    let df = DataLoader::new().load_auto(path)?;
    step_done(&format!("{} rows × {} cols in {:?}", df.height(), df.width(), start.elapsed()));
    Ok(df)
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_prepare(
    data_path: &Path,
    output_path: &Path,
    config_path: Option<&Path>,
    target: Option<String>,
) -> anyhow::Result<()> {
    section("Prepare");

    let mut config = load_config(config_path)?;
    if let Some(target) = target {
        config = config.with_target(target);
    }
    let df = load_data(data_path)?;

    step_run("Deriving features");
    let engineer = FeatureEngineer::new(config.feature_engineering.clone(), config.target.clone());
    let mut prepared = engineer.prepare(df)?;
    step_done(&format!("{} new columns", prepared.added_columns.len()));

    if prepared.proxy_label_applied {
        println!("  {} {}", accent("›"), muted(&format!("'{}' derived from the proxy rule", config.target)));
    }

    step_run(&format!("Saving → {}", output_path.display()));
    DataSaver::save_csv(&mut prepared.frame, output_path)?;
    step_done(&format!("{} rows × {} cols", prepared.frame.height(), prepared.frame.width()));

    println!();
    Ok(())
}

pub fn cmd_train(data_path: &Path, config: PipelineConfig, output_dir: &Path) -> anyhow::Result<()> {
    section("Train");

    let df = load_data(data_path)?;

    step_run(&format!("Training {} candidates", config.candidates.len()));
    let pipeline = ChurnPipeline::new(config);
    let outcome = pipeline.run(&df)?;
    step_done(&format!("{:.2}s", outcome.elapsed_secs));

    println!();
    println!(
        "  {:<16} {:>9} {:>9} {:>9}",
        muted("Candidate"),
        muted("ROC-AUC"),
        muted("PR-AUC"),
        muted("Time")
    );
    println!("  {}", dim(&"─".repeat(46)));
    for result in &outcome.results {
        match &result.outcome {
            EvaluationOutcome::Evaluated(scores) => println!(
                "  {:<16} {:>9.4} {:>9.4} {:>8.2}s",
                result.name, scores.roc_auc, scores.pr_auc, scores.training_time_secs
            ),
            EvaluationOutcome::Failed { reason } => {
                println!("  {:<16} {}", result.name, format!("failed: {}", reason).red())
            }
        }
    }
    println!("  {}", dim(&"─".repeat(46)));
    println!();
    println!("  {} {}", ok("best"), outcome.selected_name().white().bold());

    let written = ChurnPipeline::write_outputs(&outcome, output_dir)?;
    println!();
    kv("Model", &written.model_path.display().to_string());
    kv("Scores", &written.scored_path.display().to_string());
    kv(
        "Predicted churn",
        &format!("{} of {}", outcome.scored.positive_predictions(), outcome.scored.height()),
    );
    println!();

    Ok(())
}

pub fn cmd_score(model_path: &Path, data_path: &Path, output_path: &Path) -> anyhow::Result<()> {
    section("Score");

    step_run("Loading pipeline");
    let pipeline = TrainedPipeline::load(model_path)?;
    step_done(&format!(
        "{} ({}, churnpipe {})",
        pipeline.candidate_name(),
        pipeline.model().family(),
        pipeline.version()
    ));

    let df = load_data(data_path)?;

    step_run("Scoring");
    let start = Instant::now();
    let scored = Scorer::new(ScoringConfig::default()).score(&pipeline, &df)?;
    step_done(&format!("{:?}", start.elapsed()));

    step_run(&format!("Saving → {}", output_path.display()));
    let positives = scored.positive_predictions();
    let mut frame = scored.into_frame();
    DataSaver::save_csv(&mut frame, output_path)?;
    step_done(&format!("{} rows", frame.height()));

    println!();
    kv("Threshold", &format!("{}", pipeline.threshold()));
    kv("Predicted churn", &format!("{} of {}", positives, frame.height()));
    println!();

    Ok(())
}

pub fn cmd_info(data_path: &Path, config: PipelineConfig) -> anyhow::Result<()> {
    section("Dataset Info");

    let df = load_data(data_path)?;
    let roles = ChurnPipeline::new(config).classify(&df)?;

    println!();
    println!("  {:<28} {:<14} {}", muted("Column"), muted("Type"), muted("Role"));
    println!("  {}", dim(&"─".repeat(56)));
    for (name, role) in roles.iter() {
        let dtype = df
            .column(name)
            .map(|c| format!("{}", c.dtype()))
            .unwrap_or_default();
        let role = match role {
            ColumnRole::Target => accent("target"),
            ColumnRole::Numeric => ok("numeric"),
            ColumnRole::Categorical => ok("categorical"),
            ColumnRole::Excluded(ExclusionReason::TargetLeak) => "excluded (target leak)".yellow(),
            ColumnRole::Excluded(ExclusionReason::Identifier) => "excluded (identifier)".yellow(),
        };
        println!("  {:<28} {:<14} {}", name, dim(&dtype), role);
    }
    println!();
    kv("Rows", &df.height().to_string());
    kv("Features", &roles.feature_count().to_string());
    println!();

    Ok(())
}
