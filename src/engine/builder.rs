//! Turns inventory records into configuration units
//!
//! One package record yields a Source unit (shared by every package from the
//! same source), a Package unit, and a Resource unit per attached resource.
//! Links between them are handed to the graph and wired up on assembly.

use tracing::{event, Level};

use super::graph::UnitGraph;
use super::identity::{IdentityAllocator, UnitKey};
use crate::error::ExportError;
use crate::models::unit::{SOURCE_TYPE, PACKAGE_TYPE};
use crate::models::{
    ConfigurationUnit,
    ExportRequest,
    InventoryRecord,
    PackageRecord,
    ResourceRecord,
    SourceRecord,
    SystemRecord,
    UnitKind,
};

#[derive(Debug, Default)]
pub struct UnitBuilder {
    ids: IdentityAllocator,
}

impl UnitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the units for one record into the graph, returning the ids of the
    /// units that were added
    pub fn build(
        &mut self,
        record: &InventoryRecord,
        request: &ExportRequest,
        graph: &mut UnitGraph,
    ) -> Result<Vec<String>, ExportError> {
        match record {
            InventoryRecord::Package(pkg) => self.build_package(pkg, request, graph),
            InventoryRecord::System(sys) => self.build_system(sys, graph),
        }
    }

    fn build_package(
        &mut self,
        pkg: &PackageRecord,
        request: &ExportRequest,
        graph: &mut UnitGraph,
    ) -> Result<Vec<String>, ExportError> {
        let mut added = Vec::new();

        let package_key = UnitKey::Package { source: pkg.source.name.clone(), id: pkg.id.clone() };
        if self.ids.contains(&package_key) {
            event!(Level::WARN, "Package {} from {} was already exported", pkg.id, pkg.source.name);
            return Ok(added);
        }

        let source_key = UnitKey::Source {
            name: pkg.source.name.clone(),
            source_type: pkg.source.source_type.clone(),
        };
        let source_is_new = !self.ids.contains(&source_key);
        let source_id = self.ids.id_for(&source_key);

        if source_is_new {
            graph.insert(source_unit(&source_id, &pkg.source))?;
            added.push(source_id.clone());
        }

        let package_id = self.ids.id_for(&package_key);
        graph.insert(package_unit(&package_id, pkg, request.include_versions))?;
        graph.link(&package_id, &source_id);
        added.push(package_id.clone());

        for (ordinal, resource) in pkg.resources.iter().enumerate() {
            let resource_id = self.ids.id_for(&UnitKey::Resource {
                package: package_id.clone(),
                module: resource.module.clone(),
                resource: resource.resource.clone(),
                ordinal,
            });

            graph.insert(resource_unit(&resource_id, resource))?;
            graph.link(&resource_id, &package_id);
            added.push(resource_id);
        }

        Ok(added)
    }

    fn build_system(&mut self, sys: &SystemRecord, graph: &mut UnitGraph) -> Result<Vec<String>, ExportError> {
        let key = UnitKey::SystemSetting(sys.kind);
        if self.ids.contains(&key) {
            event!(Level::WARN, "Ignoring repeated {} setting", sys.kind);
            return Ok(Vec::new());
        }

        let id = self.ids.id_for(&key);
        let mut unit = ConfigurationUnit::new(UnitKind::SystemSetting, sys.kind.type_name(), &id);
        unit.properties = sys.properties.clone();
        graph.insert(unit)?;

        Ok(vec![id])
    }
}

fn source_unit(id: &str, source: &SourceRecord) -> ConfigurationUnit {
    let mut unit = ConfigurationUnit::new(UnitKind::Source, SOURCE_TYPE, id);
    unit.properties.add_value("type", source.source_type.as_str());
    unit.properties.add_value("argument", source.argument.as_str());
    unit.properties.add_value("name", source.name.as_str());
    unit
}

fn package_unit(id: &str, pkg: &PackageRecord, include_versions: bool) -> ConfigurationUnit {
    let mut unit = ConfigurationUnit::new(UnitKind::Package, PACKAGE_TYPE, id);
    unit.properties.add_value("id", pkg.id.as_str());
    unit.properties.add_value("source", pkg.source.name.as_str());

    if include_versions {
        if let Some(version) = &pkg.version {
            unit.properties.add_value("version", version.as_str());
        }
    }

    unit
}

fn resource_unit(id: &str, resource: &ResourceRecord) -> ConfigurationUnit {
    let type_name = format!("{}/{}", resource.module, resource.resource);
    let mut unit = ConfigurationUnit::new(UnitKind::Resource, &type_name, id);

    if let Some(data) = &resource.data {
        unit.properties.add_value("data", data.as_str());
    }

    unit
}
