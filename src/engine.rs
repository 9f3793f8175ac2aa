//! The Engine runs an export from a validated request through to a written
//! document: validation, collection from the catalog, unit building, graph
//! assembly and serialization, strictly in that order.
//!
//! It will notify observers with events as it progresses through the stages
//! for UI and logging purposes.  The first failure ends the run; nothing is
//! written unless every earlier stage succeeded.

mod validator;
mod collector;
mod identity;
mod builder;
mod graph;
mod resolver;
mod serializer;

pub use resolver::{ResolvableNode, CircularDependencyError};
pub use graph::UnitGraph;
pub use serializer::unit_lines;

use crate::catalog::{JsonCatalog, PackageCatalog};
use crate::events::{Event, EventHandler, ObserverArc, Stage, Summary};
use crate::models::{ExportDocument, ExportRequest};

use tracing::instrument;
use std::fmt;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use builder::UnitBuilder;

/// Where the installed package catalog comes from.  File catalogs are only
/// opened once the request has been validated.
pub enum CatalogSource {
    File(Option<PathBuf>),
    Loaded(Box<dyn PackageCatalog>),
}

impl fmt::Debug for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "File({:?})", path),
            CatalogSource::Loaded(_) => write!(f, "Loaded"),
        }
    }
}

#[derive(Debug)]
pub struct Opts {
    pub request: ExportRequest,
    pub catalog: CatalogSource,
}

pub struct Engine {
    ev_handler: EventHandler,
    opts: Opts,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Engine {{ opts: {:?} }}", self.opts)?;
        Ok(())
    }
}

impl Engine {
    pub fn new(opts: Opts, observers: Vec<ObserverArc>) -> Engine {
        let ev_handler = EventHandler::new(observers);
        Engine { ev_handler, opts }
    }

    /// Runs the export, reporting the outcome to observers before returning it
    pub fn run(&mut self) -> Result<Summary> {
        let result = self.export();

        let finalization_event = match result {
            Ok(ref summary) => Event::Done(summary.clone()),
            Err(ref e) => Event::Error(format!("{:#}", e)),
        };

        self.ev_handler.handle(finalization_event)?;

        result
    }

    #[instrument]
    fn export(&mut self) -> Result<Summary> {
        let request = self.opts.request.clone();

        self.stage(Stage::Validating)?;
        validator::validate(&request)?;

        self.stage(Stage::Collecting)?;
        let catalog = self.open_catalog()?;
        let records = collector::collect(&*catalog, &request)?;
        self.ev_handler.handle(Event::Collected(records.len()))?;

        self.stage(Stage::Building)?;
        let mut builder = UnitBuilder::new();
        let mut graph = UnitGraph::new();
        for record in records.iter() {
            let added = builder.build(record, &request, &mut graph)?;
            self.ev_handler.handle(Event::Built(added))?;
        }

        self.stage(Stage::Assembling)?;
        let doc = graph.assemble()?;
        self.ev_handler.handle(Event::Resolved(doc.units.clone()))?;

        self.stage(Stage::Serializing)?;
        serializer::write_document(&doc, &request.output)?;

        Ok(Summary::new(request.output.clone(), &doc))
    }

    fn stage(&self, stage: Stage) -> Result<()> {
        self.ev_handler.handle(Event::Stage(stage))
    }

    fn open_catalog(&mut self) -> Result<Box<dyn PackageCatalog>> {
        let source = std::mem::replace(&mut self.opts.catalog, CatalogSource::File(None));

        match source {
            CatalogSource::Loaded(catalog) => Ok(catalog),
            CatalogSource::File(Some(path)) => {
                self.ev_handler.handle(Event::Debug(format!("Loading catalog from {}", path.display())))?;
                Ok(Box::new(JsonCatalog::load(&path)?))
            },
            CatalogSource::File(None) => {
                Err(anyhow!("No catalog provided and no CFGX_CATALOG environment variable set"))
            },
        }
    }
}

/// Reads a configuration document and puts its units in dependency order.
/// Fails if any dependency doesn't resolve to a unit in the same document.
#[instrument(skip(text))]
pub fn load_document(text: &str) -> Result<ExportDocument> {
    let units = crate::parser::parse_document(text)?;
    let graph = UnitGraph::from_units(units)?;
    Ok(graph.assemble()?)
}
