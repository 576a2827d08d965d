use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod album;
mod cli;
mod config;
mod error;
mod library;
mod meta;
mod relocate;
mod runtime;
mod template;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "audiorename=debug"
    } else {
        "audiorename=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match runtime::run(&cli) {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
