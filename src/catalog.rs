//! Read-only access to the installed package catalog
//!
//! The export engine only ever talks to the catalog through the
//! PackageCatalog trait.  A JSON file backed implementation is provided.

mod json;

pub use json::JsonCatalog;

use anyhow::Result;

use crate::models::{SourceRecord, ResourceRecord, SystemRecord};

/// An installed package as the catalog knows it.  Packages installed outside of
/// any registered source have no source.
#[derive(Debug, Clone)]
pub struct InstalledPackage {
    pub id: String,
    pub version: Option<String>,
    pub source: Option<SourceRecord>,
    pub resources: Vec<ResourceRecord>,
}

pub trait PackageCatalog {
    /// Looks up one installed package by identifier
    fn find_installed(&self, id: &str) -> Result<Option<InstalledPackage>>;

    fn list_installed(&self) -> Result<Vec<InstalledPackage>>;

    fn machine_setting_descriptors(&self) -> Result<Vec<SystemRecord>>;

    /// The exported payload of a configuration resource, if anything provides one
    fn resource_data(&self, module: &str, resource: &str) -> Result<Option<String>>;
}

#[cfg(test)]
pub(crate) use json::tests::{test_catalog, TEST_CATALOG};
