//! Catalog backed by a JSON description of installed state
//!
//! Example:
//!
//! {
//!   "sources": [{ "name": "winget", "type": "Microsoft.PreIndexed.Package", "argument": "https://..." }],
//!   "packages": [{ "id": "Git.Git", "version": "2.45.1", "source": "winget",
//!                  "resources": [{ "module": "GitDsc", "resource": "GitConfig", "data": "..." }] }],
//!   "resources": [{ "module": "GitDsc", "resource": "GitConfig", "data": "..." }],
//!   "settings": [{ "kind": "admin_settings", "properties": { "LocalManifestFiles": false } }]
//! }

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::{event, instrument, Level};

use std::collections::HashMap;
use std::path::Path;

use super::{InstalledPackage, PackageCatalog};
use crate::models::{SourceRecord, ResourceRecord, SystemRecord};
use crate::parser::{is_label, is_property_key};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    sources: Vec<SourceRecord>,
    #[serde(default)]
    packages: Vec<PackageEntry>,
    #[serde(default)]
    resources: Vec<ResourceRecord>,
    #[serde(default)]
    settings: Vec<SystemRecord>,
}

#[derive(Debug, Deserialize)]
struct PackageEntry {
    id: String,
    #[serde(default)]
    version: Option<String>,
    /// Name of the source the package was installed from
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    resources: Vec<ResourceRecord>,
}

#[derive(Debug)]
pub struct JsonCatalog {
    packages: Vec<InstalledPackage>,
    resources: Vec<ResourceRecord>,
    settings: Vec<SystemRecord>,
}

impl JsonCatalog {
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read catalog: {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Invalid catalog: {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(text)?;
        check_names(&file)?;

        let mut sources: HashMap<&str, &SourceRecord> = HashMap::new();
        for source in &file.sources {
            if sources.insert(source.name.as_str(), source).is_some() {
                return Err(anyhow!("Source '{}' is declared more than once", source.name));
            }
        }

        let packages = file.packages.iter().map(|entry| {
            let source = match &entry.source {
                Some(name) => match sources.get(name.as_str()) {
                    Some(source) => Some((*source).clone()),
                    None => return Err(anyhow!("Package '{}' references unknown source '{}'", entry.id, name)),
                },
                None => None,
            };

            Ok(InstalledPackage {
                id: entry.id.clone(),
                version: entry.version.clone(),
                source,
                resources: entry.resources.clone(),
            })
        }).collect::<Result<Vec<_>>>()?;

        event!(Level::DEBUG, "Loaded catalog with {} sources and {} packages", sources.len(), packages.len());

        Ok(Self {
            packages,
            resources: file.resources,
            settings: file.settings,
        })
    }
}

/// Names from the catalog end up as type names and property keys in the
/// exported document, so anything that can't be written is refused up front
fn check_names(file: &CatalogFile) -> Result<()> {
    let declared = file.packages.iter().flat_map(|p| p.resources.iter());

    for resource in declared.chain(file.resources.iter()) {
        for name in [&resource.module, &resource.resource] {
            if !is_label(name) {
                return Err(anyhow!(
                    "Resource '{}/{}' has an invalid name '{}'; names may only contain letters, digits, '.', '_' and '-'",
                    resource.module, resource.resource, name
                ));
            }
        }
    }

    for setting in &file.settings {
        if let Some((key, _)) = setting.properties.iter().find(|(key, _)| !is_property_key(key)) {
            return Err(anyhow!("Setting {} has a property that can't be exported: '{}'", setting.kind, key));
        }
    }

    Ok(())
}

impl PackageCatalog for JsonCatalog {
    fn find_installed(&self, id: &str) -> Result<Option<InstalledPackage>> {
        let exact = self.packages.iter().find(|p| p.id == id);
        let found = exact.or_else(|| self.packages.iter().find(|p| p.id.eq_ignore_ascii_case(id)));
        Ok(found.cloned())
    }

    fn list_installed(&self) -> Result<Vec<InstalledPackage>> {
        Ok(self.packages.clone())
    }

    fn machine_setting_descriptors(&self) -> Result<Vec<SystemRecord>> {
        Ok(self.settings.clone())
    }

    fn resource_data(&self, module: &str, resource: &str) -> Result<Option<String>> {
        Ok(self.resources
            .iter()
            .find(|r| r.module == module && r.resource == resource)
            .and_then(|r| r.data.clone()))
    }
}
