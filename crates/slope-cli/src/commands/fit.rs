//! Fit command implementation.
//!
//! Fits a linear model to numeric CSV data by minibatch SGD.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use slope_optim::prelude::*;

use crate::cli::{Display, OutputFormat};
use crate::commands::{CheckerOptions, SchedulerOptions};
use crate::error::{CliError, CliResult};
use crate::output::{format_point, print_header, print_json_report, print_output, print_warning, KeyValue};

/// Parameter penalty choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RegularizerChoice {
    /// No penalty
    None,
    /// λ·Σ|w|
    L1,
    /// λ·Σw²/2
    L2,
    /// λ·Σ(w² + |w|)/2
    Elastic,
}

/// Batch aggregation choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReductionChoice {
    Sum,
    Mean,
}

impl From<ReductionChoice> for BatchReduction {
    fn from(choice: ReductionChoice) -> Self {
        match choice {
            ReductionChoice::Sum => BatchReduction::Sum,
            ReductionChoice::Mean => BatchReduction::Mean,
        }
    }
}

/// Arguments for the fit command.
#[derive(Args, Debug)]
pub struct FitArgs {
    /// CSV file of numeric columns; the last column is the target
    #[arg(short, long)]
    pub data: PathBuf,

    /// The file has no header row
    #[arg(long)]
    pub no_header: bool,

    /// Samples per batch. Defaults to the whole dataset.
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Batch aggregation
    #[arg(long, value_enum, default_value = "mean")]
    pub reduction: ReductionChoice,

    /// Parameter penalty (the bias is never penalized)
    #[arg(long, value_enum, default_value = "none")]
    pub regularizer: RegularizerChoice,

    /// Penalty strength
    #[arg(long, default_value = "0.1")]
    pub lambda: f64,

    /// Seed for batch sampling. Random when omitted.
    #[arg(long, env = "SLOPE_SEED")]
    pub seed: Option<u64>,

    /// Forward-difference step for per-sample gradients
    #[arg(long, default_value = "1e-8")]
    pub fd_epsilon: f64,

    #[command(flatten)]
    pub scheduler: SchedulerOptions,

    #[command(flatten)]
    pub checker: CheckerOptions,
}

/// JSON report of a fit.
#[derive(Debug, Serialize)]
struct FitReport<'a> {
    samples: usize,
    batch_size: usize,
    weights: &'a [f64],
    mse: f64,
    objective_calls: usize,
    result: &'a OptimizationResult,
}

/// Reads numeric rows; the last field of each is the target.
pub fn read_dataset(path: &Path, has_headers: bool) -> CliResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut pairs = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let line = i + 1 + usize::from(has_headers);
        let values = record
            .iter()
            .map(|field| {
                field.parse::<f64>().map_err(|e| CliError::InvalidData {
                    line,
                    reason: format!("'{field}': {e}"),
                })
            })
            .collect::<CliResult<Vec<f64>>>()?;

        let Some((&target, features)) = values.split_last() else {
            return Err(CliError::InvalidData {
                line,
                reason: "empty row".to_string(),
            });
        };
        pairs.push((features.to_vec(), target));
    }

    Ok(Dataset::from_pairs(pairs)?)
}

/// Execute the fit command.
pub fn execute(args: FitArgs, display: Display) -> Result<()> {
    let dataset = read_dataset(&args.data, !args.no_header)?;
    let model = LinearModel::new(dataset.feature_count());
    let params = model.param_count();
    let batch_size = args.batch_size.unwrap_or(dataset.len());

    let regularizer: Box<dyn DifferentiableObjective> = match args.regularizer {
        RegularizerChoice::None => Box::new(NoRegularization::new(params)),
        RegularizerChoice::L1 => Box::new(L1::new(params, args.lambda)?),
        RegularizerChoice::L2 => Box::new(L2::new(params, args.lambda)?),
        RegularizerChoice::Elastic => Box::new(Elastic::new(params, args.lambda)?),
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let sgd = StochasticGradientOptimizer::new(
        args.scheduler.build()?,
        args.checker.build()?,
        model.squared_error(),
        args.checker.limit,
    )
    .with_reduction(args.reduction.into())
    .with_epsilon(args.fd_epsilon)?;

    tracing::debug!(samples = dataset.len(), features = dataset.feature_count(), batch_size, "fitting");
    let outcome = sgd.optimize(&dataset, vec![0.0; params], batch_size, regularizer, rng)?;

    let weights = outcome.result.final_point();
    let mut squared = 0.0;
    for sample in dataset.samples() {
        squared += (sample.target - model.predict(&sample.features, weights)?).powi(2);
    }
    let mse = squared / dataset.len() as f64;

    match display.format {
        OutputFormat::Json => print_json_report(&FitReport {
            samples: dataset.len(),
            batch_size,
            weights,
            mse,
            objective_calls: outcome.objective_calls,
            result: &outcome.result,
        })?,
        OutputFormat::Minimal => println!("{}", format_point(weights)),
        OutputFormat::Csv => print_output(&weight_rows(weights), OutputFormat::Csv)?,
        OutputFormat::Table => {
            if outcome.result.aborted() {
                print_warning(&format!("iteration limit {} reached before convergence", args.checker.limit));
            }

            print_header("Fit Result");
            let summary = vec![
                KeyValue::new("Samples", dataset.len().to_string()),
                KeyValue::new("Features", dataset.feature_count().to_string()),
                KeyValue::new("Batch Size", batch_size.to_string()),
                KeyValue::new("Scheduler", outcome.result.scheduler().to_string()),
                KeyValue::new("Status", outcome.result.status().to_string()),
                KeyValue::new("Iterations", outcome.result.iterations().to_string()),
                KeyValue::new("Objective Calls", outcome.objective_calls.to_string()),
                KeyValue::from_f64("Training MSE", mse, 8),
            ];
            print_output(&summary, OutputFormat::Table)?;

            print_header("Weights");
            print_output(&weight_rows(weights), OutputFormat::Table)?;
        }
    }

    Ok(())
}

fn weight_rows(weights: &[f64]) -> Vec<KeyValue> {
    weights
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let name = if i == 0 { "bias".to_string() } else { format!("w{i}") };
            KeyValue::from_f64(name, *w, 8)
        })
        .collect()
}
