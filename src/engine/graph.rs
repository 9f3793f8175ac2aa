//! Arena of built units and the links between them
//!
//! Units are stored flat and looked up by instance id.  Links are recorded as
//! the builder goes and only turned into `depends_on` edges when the graph is
//! assembled into a document.

use std::collections::HashMap;

use tracing::{event, instrument, Level};

use super::resolver::{resolve, DependencyFetcher};
use crate::error::ExportError;
use crate::models::{ConfigurationUnit, ExportDocument};

#[derive(Debug, Default)]
pub struct UnitGraph {
    units: Vec<ConfigurationUnit>,
    index: HashMap<String, usize>,
    /// (dependent, dependency) pairs awaiting assembly
    links: Vec<(String, String)>,
}

impl UnitGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from units which already carry their edges, such as units
    /// read back from a document
    pub fn from_units(units: Vec<ConfigurationUnit>) -> Result<Self, ExportError> {
        let mut graph = Self::new();
        for unit in units {
            graph.insert(unit)?;
        }
        Ok(graph)
    }

    pub fn insert(&mut self, unit: ConfigurationUnit) -> Result<(), ExportError> {
        if self.contains(&unit.instance_id) {
            return Err(ExportError::DuplicateUnit(unit.instance_id));
        }

        self.index.insert(unit.instance_id.clone(), self.units.len());
        self.units.push(unit);
        Ok(())
    }

    pub fn link(&mut self, dependent: &str, dependency: &str) {
        self.links.push((dependent.to_string(), dependency.to_string()));
    }

    pub fn contains(&self, instance_id: &str) -> bool {
        self.index.contains_key(instance_id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Turns pending links into edges and orders the units so that every unit
    /// follows all of its dependencies.  Ties keep the order units were inserted.
    #[instrument(skip(self))]
    pub fn assemble(mut self) -> Result<ExportDocument, ExportError> {
        event!(Level::DEBUG, "Assembling {} units with {} links", self.units.len(), self.links.len());

        for (dependent, dependency) in std::mem::take(&mut self.links) {
            if !self.contains(&dependency) {
                return Err(ExportError::DependencyResolution { unit: dependent, missing: dependency });
            }

            match self.index.get(&dependent) {
                Some(&i) => self.units[i].add_dependency(&dependency),
                None => return Err(ExportError::DependencyResolution { unit: dependency, missing: dependent }),
            }
        }

        let ordered = resolve(&self.units, &self)?;
        event!(Level::DEBUG, "Ordered {} units", ordered.len());

        Ok(ExportDocument::new(ordered))
    }
}

impl DependencyFetcher<ConfigurationUnit> for UnitGraph {
    type Error = ExportError;

    fn get_node_dependencies(&self, node: &ConfigurationUnit) -> Result<Vec<ConfigurationUnit>, ExportError> {
        node.depends_on.iter().map(|id| {
            match self.index.get(id) {
                Some(&i) => Ok(self.units[i].clone()),
                None => Err(ExportError::DependencyResolution {
                    unit: node.instance_id.clone(),
                    missing: id.clone(),
                }),
            }
        }).collect()
    }
}
