//! The ordered unit sequence that is written out as a configuration document

use super::unit::{ConfigurationUnit, UnitKind};

/// Units in topological order: every unit comes after all of the units it
/// depends on.
#[derive(Debug, Clone, Default)]
pub struct ExportDocument {
    pub units: Vec<ConfigurationUnit>,
}

impl ExportDocument {
    pub fn new(units: Vec<ConfigurationUnit>) -> Self {
        Self { units }
    }

    pub fn get(&self, instance_id: &str) -> Option<&ConfigurationUnit> {
        self.units.iter().find(|u| u.instance_id == instance_id)
    }

    pub fn of_kind(&self, kind: UnitKind) -> impl Iterator<Item = &ConfigurationUnit> {
        self.units.iter().filter(move |u| u.kind == kind)
    }

    pub fn position(&self, instance_id: &str) -> Option<usize> {
        self.units.iter().position(|u| u.instance_id == instance_id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
