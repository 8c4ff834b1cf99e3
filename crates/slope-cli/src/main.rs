//! Slope CLI - Command-line harness for gradient descent experiments.
//!
//! # Usage
//!
//! ```bash
//! # Minimize Rosenbrock's function with golden-section line search
//! slope minimize --function rosenbrock --start -1.2,1 --scheduler golden
//!
//! # Climb a bowl inside a box
//! slope minimize --function shifted --maximize --lower 0,0 --upper 5,5 --start 1,1
//!
//! # Fit a linear model by minibatch SGD with an L2 penalty
//! slope fit --data points.csv --batch-size 16 --regularizer l2 --lambda 0.1 --seed 7
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod functions;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slope_optim=debug,slope=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slope_optim=warn,slope=warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let display = cli.display();

    match cli.command {
        Commands::Minimize(args) => commands::minimize::execute(args, display)?,
        Commands::Fit(args) => commands::fit::execute(args, display)?,
    }

    Ok(())
}
