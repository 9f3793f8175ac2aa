//! The request a single export run is driven by, built from command line input

use std::path::PathBuf;

/// A configuration resource to export alongside the targeted package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    pub module: String,
    pub resource: String,
}

impl ResourceRequest {
    pub fn new(module: &str, resource: &str) -> Self {
        Self { module: module.to_string(), resource: resource.to_string() }
    }
}

#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub package_id: Option<String>,
    pub all: bool,
    pub include_versions: bool,
    /// `--module` and `--resource` as given; pairing is checked by the validator
    pub module: Option<String>,
    pub resource: Option<String>,
    pub output: PathBuf,
}

impl ExportRequest {
    pub fn for_package(package_id: &str, output: PathBuf) -> Self {
        Self {
            package_id: Some(package_id.to_string()),
            all: false,
            include_versions: false,
            module: None,
            resource: None,
            output,
        }
    }

    pub fn for_all(output: PathBuf) -> Self {
        Self {
            package_id: None,
            all: true,
            include_versions: false,
            module: None,
            resource: None,
            output,
        }
    }

    pub fn with_versions(mut self) -> Self {
        self.include_versions = true;
        self
    }

    pub fn with_resource(mut self, module: &str, resource: &str) -> Self {
        self.module = Some(module.to_string());
        self.resource = Some(resource.to_string());
        self
    }

    /// The resource request, once both halves are present
    pub fn resource_request(&self) -> Option<ResourceRequest> {
        match (&self.module, &self.resource) {
            (Some(module), Some(resource)) => Some(ResourceRequest::new(module, resource)),
            _ => None,
        }
    }
}
