mod cli;
mod catalog;
mod engine;
mod error;
mod events;
mod models;
mod parser;

use std::process::ExitCode;
use tracing_subscriber::{registry::Registry, prelude::*, EnvFilter};
use tracing_tree::HierarchicalLayer;

use crate::cli::CLI;
use crate::error::exit_code_for;

fn main() -> ExitCode {
    let subscriber = Registry::default()
        .with(EnvFilter::from_default_env())
        .with(HierarchicalLayer::new(2));
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }

    let result = CLI::init().and_then(|cli| cli.run());

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code_for(&e))
        },
    }
}
