//! Minimize command implementation.
//!
//! Runs the gradient descent loop on a built-in test function.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use slope_optim::prelude::*;

use crate::cli::{Display, OutputFormat};
use crate::commands::{parse_vector, CheckerOptions, SchedulerOptions};
use crate::functions::BuiltinFunction;
use crate::output::{format_point, print_header, print_json_report, print_output, print_warning, thin, KeyValue, TrajectoryRow};

/// Arguments for the minimize command.
#[derive(Args, Debug)]
pub struct MinimizeArgs {
    /// Function to optimize
    #[arg(long, value_enum, default_value = "sphere")]
    pub function: BuiltinFunction,

    /// Starting point (comma-separated, e.g. "-1.2,1"). Defaults to the origin.
    #[arg(long, allow_hyphen_values = true)]
    pub start: Option<String>,

    /// Component-wise lower bound
    #[arg(long, allow_hyphen_values = true)]
    pub lower: Option<String>,

    /// Component-wise upper bound
    #[arg(long, allow_hyphen_values = true)]
    pub upper: Option<String>,

    /// Maximize instead of minimize
    #[arg(long)]
    pub maximize: bool,

    /// Replace the analytic gradient with forward differences of this step
    #[arg(long)]
    pub fd_epsilon: Option<f64>,

    #[command(flatten)]
    pub scheduler: SchedulerOptions,

    #[command(flatten)]
    pub checker: CheckerOptions,
}

/// JSON report of a run.
#[derive(Debug, Serialize)]
struct MinimizeReport<'a> {
    function: &'static str,
    checker: &'static str,
    final_value: f64,
    #[serde(flatten)]
    result: &'a OptimizationResult,
}

/// Execute the minimize command.
pub fn execute(args: MinimizeArgs, display: Display) -> Result<()> {
    let mut run = RunConfig {
        maximize: args.maximize,
        ..RunConfig::default()
    };
    if let Some(start) = &args.start {
        run = run.with_start(parse_vector(start)?);
    }
    if let Some(lower) = &args.lower {
        run = run.with_lower_bound(parse_vector(lower)?);
    }
    if let Some(upper) = &args.upper {
        run = run.with_upper_bound(parse_vector(upper)?);
    }

    let scheduler = args.scheduler.build()?;
    let checker = args.checker.build()?;
    let checker_name = checker.name();
    let optimizer = GradientOptimizer::new(scheduler, checker, args.checker.limit);

    let mut objective: Box<dyn DifferentiableObjective> = match args.fd_epsilon {
        Some(epsilon) => Box::new(FiniteDifference::new(args.function.objective(), epsilon)?),
        None => Box::new(args.function.objective()),
    };

    tracing::debug!(function = args.function.name(), ?run, "starting run");
    let result = optimizer.optimize(objective.as_mut(), &run)?;

    let values = result
        .trajectory()
        .points()
        .iter()
        .map(|p| objective.evaluate(p))
        .collect::<OptimResult<Vec<f64>>>()?;
    let final_value = values.last().copied().unwrap_or(f64::NAN);

    match display.format {
        OutputFormat::Json => print_json_report(&MinimizeReport {
            function: args.function.name(),
            checker: checker_name,
            final_value,
            result: &result,
        })?,
        OutputFormat::Minimal => println!("{}", format_point(result.final_point())),
        OutputFormat::Csv => print_output(&trajectory_rows(&result, &values, display.rows), OutputFormat::Csv)?,
        OutputFormat::Table => {
            if result.aborted() {
                print_warning(&format!("iteration limit {} reached before convergence", args.checker.limit));
            }

            print_header("Optimization Result");
            let summary = vec![
                KeyValue::new("Function", args.function.name()),
                KeyValue::new("Direction", if run.maximize { "maximize" } else { "minimize" }),
                KeyValue::new("Scheduler", result.scheduler().to_string()),
                KeyValue::new("Checker", checker_name),
                KeyValue::new("Status", result.status().to_string()),
                KeyValue::new("Iterations", result.iterations().to_string()),
                KeyValue::new("Final Point", format_point(result.final_point())),
                KeyValue::from_f64("Final Value", final_value, 10),
                KeyValue::new("Evaluations", result.stats().evaluations.to_string()),
                KeyValue::new("Gradients", result.stats().gradients.to_string()),
            ];
            print_output(&summary, OutputFormat::Table)?;

            print_header("Hyperparameters");
            let hyper: Vec<KeyValue> = result
                .hyperparameters()
                .iter()
                .map(|(name, value)| KeyValue::new(name.clone(), value.to_string()))
                .collect();
            print_output(&hyper, OutputFormat::Table)?;

            print_header("Trajectory");
            print_output(&trajectory_rows(&result, &values, display.rows), OutputFormat::Table)?;
        }
    }

    Ok(())
}

fn trajectory_rows(result: &OptimizationResult, values: &[f64], rows: usize) -> Vec<TrajectoryRow> {
    let points = result.trajectory().points();
    thin(points.len(), rows)
        .into_iter()
        .map(|i| TrajectoryRow {
            iteration: i,
            point: format_point(&points[i]),
            value: values[i],
        })
        .collect()
}
