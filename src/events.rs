/// Events are emitted to observers so the stages of an export
/// can be reported to the CLI and logging.

use crate::models::{ConfigurationUnit, ExportDocument, UnitKind};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use anyhow::{anyhow, Result};

/// The stages an export run moves through, in order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Collecting,
    Building,
    Assembling,
    Serializing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Stage::Validating => "Validating",
            Stage::Collecting => "Collecting",
            Stage::Building => "Building",
            Stage::Assembling => "Assembling",
            Stage::Serializing => "Serializing",
        })
    }
}

/// Unit counts for a finished export
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub output: PathBuf,
    pub sources: usize,
    pub packages: usize,
    pub resources: usize,
    pub settings: usize,
}

impl Summary {
    pub fn new(output: PathBuf, doc: &ExportDocument) -> Self {
        Self {
            output,
            sources: doc.of_kind(UnitKind::Source).count(),
            packages: doc.of_kind(UnitKind::Package).count(),
            resources: doc.of_kind(UnitKind::Resource).count(),
            settings: doc.of_kind(UnitKind::SystemSetting).count(),
        }
    }
}

/// Events that can be emitted by the engine
#[derive(Clone, Debug)]
pub enum Event {
    Stage(Stage),
    Collected(usize),
    Built(Vec<String>),
    Resolved(Vec<ConfigurationUnit>),
    Debug(String),
    Done(Summary),
    Error(String),
}

/// Observers watch for events to occur so they can report
pub trait Observer: Send {
    fn handle(&mut self, event: Event) -> Result<()>;
}

pub type ObserverArc = Arc<Mutex<dyn Observer>>;

/// Provides an interface to dispatch events to multiple observers
#[derive(Clone)]
pub struct EventHandler {
    observers: Vec<ObserverArc>,
}

impl EventHandler {
    pub fn new(observers: Vec<ObserverArc>) -> Self {
        Self { observers }
    }

    pub fn handle(&self, event: Event) -> Result<()> {
        for observer in self.observers.iter() {
            let mut observer = observer.lock().map_err(|_| anyhow!("Event observer lock poisoned"))?;
            observer.handle(event.clone())?;
        }

        Ok(())
    }
}
