mod bootstrap_helpers;
mod cli_args;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use mosaic_client::HttpFetcher;
use mosaic_solver::{Solver, SolverEvent};

use crate::bootstrap_helpers::init_tracing;
use crate::cli_args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.solver_config();

    let fetcher = HttpFetcher::new(
        &config.base_url,
        config.request_timeout_ms,
        config.max_concurrent_requests,
    )
    .context("failed to build fragment fetcher")?;

    let mut solver =
        Solver::new(Arc::new(fetcher), config).context("invalid solver configuration")?;
    solver.subscribe(print_progress);

    let report = solver.solve().await;
    if report.solved {
        println!();
        println!("Message: {}", report.message);
        println!(
            "Fragments: {} | Requests: {} | Elapsed: {:.3}s",
            report.fragments_found,
            report.identifiers_probed,
            report.elapsed_ms as f64 / 1_000.0
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!();
        println!(
            "Could not complete the message after {} probes ({:.3}s).",
            report.identifiers_probed,
            report.elapsed_ms as f64 / 1_000.0
        );
        Ok(ExitCode::FAILURE)
    }
}

fn print_progress(event: &SolverEvent) {
    match event {
        SolverEvent::SolveStart => println!("Starting fragment search..."),
        SolverEvent::PhaseStarted { phase } => println!("Phase: {phase}"),
        SolverEvent::FragmentDiscovered { index, text, .. } => {
            println!("Found fragment {index}: '{text}'");
        }
        SolverEvent::SolveSucceeded { .. } | SolverEvent::SolveAbandoned { .. } => {}
    }
}
