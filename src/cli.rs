//! Provides parsing and validation of command line arguments into
//! options required by the engine

use crate::{
    engine::{self, CatalogSource, Engine, Opts as EngineOpts},
    error::{exit, exit_code_for, ExportError},
    events::ObserverArc,
    models::ExportRequest,
};

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

mod reporter;

pub use reporter::{EngineLogger, Verbosity};

pub const CATALOG_ENV: &str = "CFGX_CATALOG";

pub struct CLI {
    matches: ArgMatches,
}

impl CLI {
    pub fn init() -> Result<CLI> {
        let matches = get_cli_definition().get_matches();
        let cli = CLI { matches };

        Ok(cli)
    }

    /// Runs the chosen subcommand, returning the process exit code.  Export
    /// failures have already been reported by the engine observer by the time
    /// they get here, so only their code is returned.
    pub fn run(&self) -> Result<u8> {
        let verbosity = self.get_verbosity_level()?;

        match self.matches.subcommand() {
            Some(("export", sub)) => {
                let logger: ObserverArc = Arc::new(Mutex::new(EngineLogger::new(verbosity)));
                let mut engine = Engine::new(get_engine_options(sub), vec![logger]);

                match engine.run() {
                    Ok(_) => Ok(exit::S_OK),
                    Err(e) => Ok(exit_code_for(&e)),
                }
            },
            Some(("show", sub)) => {
                let path = required_path(sub, "file");
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let doc = engine::load_document(&text)
                    .with_context(|| format!("Failed to load {}", path.display()))?;

                reporter::print_document(&doc)?;
                Ok(exit::S_OK)
            },
            _ => Err(ExportError::InvalidArguments("No command given".to_string()).into()),
        }
    }

    fn get_verbosity_level(&self) -> Result<Verbosity> {
        let debug = self.matches.get_flag("debug");
        let verbose = self.matches.get_flag("verbose");
        let quiet = self.matches.get_flag("quiet");

        if (debug as usize + verbose as usize + quiet as usize) > 1 {
            return Err(ExportError::InvalidArguments(
                "Only one of --debug, --verbose, or --quiet can be used at a time".to_string()
            ).into());
        }

        if debug {
            Ok(Verbosity::Debug)
        } else if verbose {
            Ok(Verbosity::Verbose)
        } else if quiet {
            Ok(Verbosity::Quiet)
        } else {
            Ok(Verbosity::Default)
        }
    }
}

/// Builds the request exactly as given.  Scope and resource combinations are
/// left for the engine's validator so they fail with the right exit code.
fn get_engine_options(matches: &ArgMatches) -> EngineOpts {
    let request = ExportRequest {
        package_id: matches.get_one::<String>("package_id").cloned(),
        all: matches.get_flag("all"),
        include_versions: matches.get_flag("include_versions"),
        module: matches.get_one::<String>("module").cloned(),
        resource: matches.get_one::<String>("resource").cloned(),
        output: required_path(matches, "output"),
    };

    EngineOpts { request, catalog: CatalogSource::File(get_catalog_path(matches)) }
}

fn get_catalog_path(matches: &ArgMatches) -> Option<PathBuf> {
    match matches.get_one::<String>("catalog") {
        Some(p) => Some(PathBuf::from(p)),
        None => std::env::var_os(CATALOG_ENV).map(PathBuf::from),
    }
}

// clap guarantees required args are present once matching succeeds
fn required_path(matches: &ArgMatches, id: &str) -> PathBuf {
    matches.get_one::<String>(id).map(PathBuf::from).unwrap_or_default()
}

fn get_cli_definition() -> Command {
    Command::new("cfgx")
        .version("1.0")
        .about("Exports installed packages and machine settings as a configuration document")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .short('v')
                .long("verbose")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .help("Suppress diagnostic output")
                .action(ArgAction::SetTrue)
                .short('q')
                .long("quiet")
                .global(true),
        )
        .arg(
            Arg::new("debug")
                .help("Enable debug output")
                .action(ArgAction::SetTrue)
                .short('d')
                .long("debug")
                .global(true),
        )
        .subcommand(
            Command::new("export")
                .about("Export installed packages to a configuration document")
                .arg(
                    Arg::new("package_id")
                        .help("Export the installed package with this id")
                        .long("package-id")
                        .value_name("ID")
                        .num_args(1),
                )
                .arg(
                    Arg::new("all")
                        .help("Export every installed package and machine settings")
                        .action(ArgAction::SetTrue)
                        .long("all"),
                )
                .arg(
                    Arg::new("include_versions")
                        .help("Write package versions")
                        .action(ArgAction::SetTrue)
                        .long("include-versions"),
                )
                .arg(
                    Arg::new("module")
                        .help("Module of a configuration resource to export with the package")
                        .long("module")
                        .value_name("MODULE")
                        .num_args(1),
                )
                .arg(
                    Arg::new("resource")
                        .help("Configuration resource to export with the package")
                        .long("resource")
                        .value_name("RESOURCE")
                        .num_args(1),
                )
                .arg(
                    Arg::new("output")
                        .help("Path to write the document to")
                        .required(true)
                        .short('o')
                        .long("output")
                        .value_name("PATH")
                        .num_args(1),
                )
                .arg(
                    Arg::new("catalog")
                        .help("Installed package catalog; defaults to $CFGX_CATALOG")
                        .long("catalog")
                        .value_name("PATH")
                        .num_args(1),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Print a configuration document in dependency order")
                .arg(
                    Arg::new("file")
                        .help("Document to show")
                        .required(true)
                        .short('f')
                        .long("file")
                        .value_name("PATH")
                        .num_args(1),
                ),
        )
}
