//! Gathers the installed state an export covers from the package catalog

use anyhow::Result;
use tracing::{event, instrument, Level};

use crate::catalog::{InstalledPackage, PackageCatalog};
use crate::error::ExportError;
use crate::models::{ExportRequest, InventoryRecord, PackageRecord, ResourceRecord};

/// Collects inventory records for a validated request.  Packages come first,
/// in catalog order, followed by machine-level settings for whole-machine exports.
#[instrument(skip(catalog))]
pub fn collect(catalog: &dyn PackageCatalog, request: &ExportRequest) -> Result<Vec<InventoryRecord>> {
    if request.all {
        return collect_all(catalog, request);
    }

    let id = match &request.package_id {
        Some(id) => id.trim(),
        None => return Err(ExportError::InvalidArguments("No package id to collect".into()).into()),
    };

    let installed = match catalog.find_installed(id)? {
        Some(installed) => installed,
        None => return Err(ExportError::PackageNotFound(id.to_string()).into()),
    };

    let mut record = match to_record(installed, request.include_versions) {
        Some(record) => record,
        None => {
            event!(Level::WARN, "Package {} is not available from any source", id);
            return Err(ExportError::PackageNotFound(id.to_string()).into());
        },
    };

    if let Some(req) = request.resource_request() {
        let data = catalog.resource_data(&req.module, &req.resource)?;
        if data.is_none() {
            event!(Level::WARN, "No data exported for resource {}/{}", req.module, req.resource);
        }

        // a resource the package already declares is exported once
        let declared = record.resources.iter_mut()
            .find(|r| r.module == req.module && r.resource == req.resource);

        match declared {
            Some(existing) => {
                if existing.data.is_none() {
                    existing.data = data;
                }
            },
            None => record.resources.push(ResourceRecord { module: req.module, resource: req.resource, data }),
        }
    }

    Ok(vec![InventoryRecord::Package(record)])
}

fn collect_all(catalog: &dyn PackageCatalog, request: &ExportRequest) -> Result<Vec<InventoryRecord>> {
    let mut records = Vec::new();

    for installed in catalog.list_installed()? {
        let id = installed.id.clone();
        match to_record(installed, request.include_versions) {
            Some(record) => records.push(InventoryRecord::Package(record)),
            None => event!(Level::WARN, "Skipping {}: not available from any source", id),
        }
    }

    for setting in catalog.machine_setting_descriptors()? {
        records.push(InventoryRecord::System(setting));
    }

    event!(Level::DEBUG, "Collected {} inventory records", records.len());

    Ok(records)
}

fn to_record(installed: InstalledPackage, include_versions: bool) -> Option<PackageRecord> {
    let source = installed.source?;

    Some(PackageRecord {
        id: installed.id,
        version: if include_versions { installed.version } else { None },
        source,
        resources: installed.resources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{test_catalog, JsonCatalog};
    use crate::models::SystemSettingKind;
    use std::path::PathBuf;

    fn out() -> PathBuf {
        PathBuf::from("out.cfg")
    }

    fn packages(records: &[InventoryRecord]) -> Vec<&PackageRecord> {
        records.iter().filter_map(|r| match r {
            InventoryRecord::Package(p) => Some(p),
            _ => None,
        }).collect()
    }

    #[test]
    fn test_single_package() {
        let catalog = test_catalog();
        let request = ExportRequest::for_package("AppInstallerTest.TestPackageExport", out());

        let records = collect(&catalog, &request).unwrap();
        assert_eq!(records.len(), 1);

        let pkg = packages(&records)[0];
        assert_eq!(pkg.id, "AppInstallerTest.TestPackageExport");
        assert_eq!(pkg.source.name, "TestSource");
        assert!(pkg.version.is_none());
    }

    #[test]
    fn test_versions_materialized_on_request() {
        let catalog = test_catalog();
        let request = ExportRequest::for_package("AppInstallerTest.TestPackageExport", out()).with_versions();

        let records = collect(&catalog, &request).unwrap();
        assert_eq!(packages(&records)[0].version.as_deref(), Some("1.0.0.0"));
    }

    #[test]
    fn test_not_found() {
        let catalog = test_catalog();
        let request = ExportRequest::for_package("NotFound.NotFound", out());

        let err = collect(&catalog, &request).unwrap_err();
        assert!(matches!(err.downcast_ref::<ExportError>(), Some(ExportError::PackageNotFound(_))));
    }

    #[test]
    fn test_unsourced_package_not_found() {
        let catalog = test_catalog();
        let request = ExportRequest::for_package("Contoso.SideLoaded", out());

        let err = collect(&catalog, &request).unwrap_err();
        assert!(matches!(err.downcast_ref::<ExportError>(), Some(ExportError::PackageNotFound(_))));
    }

    #[test]
    fn test_resource_request_attached() {
        let catalog = test_catalog();
        let request = ExportRequest::for_package("Microsoft.PowerShell", out())
            .with_resource("AppInstallerTest", "TestResource");

        let records = collect(&catalog, &request).unwrap();
        let pkg = packages(&records)[0];
        assert_eq!(pkg.resources, vec![ResourceRecord {
            module: "AppInstallerTest".into(),
            resource: "TestResource".into(),
            data: Some("TestData".into()),
        }]);
    }

    #[test]
    fn test_requested_resource_already_declared() {
        let catalog = test_catalog();
        let request = ExportRequest::for_package("AppInstallerTest.TestPackageExport", out())
            .with_resource("AppInstallerTest", "TestResource");

        let records = collect(&catalog, &request).unwrap();
        assert_eq!(packages(&records)[0].resources, vec![ResourceRecord {
            module: "AppInstallerTest".into(),
            resource: "TestResource".into(),
            data: Some("TestData".into()),
        }]);
    }

    #[test]
    fn test_requested_resource_fills_declared_data() {
        let catalog = JsonCatalog::from_json(r#"{
            "sources": [{ "name": "winget", "type": "Microsoft.PreIndexed.Package", "argument": "x" }],
            "packages": [{ "id": "Git.Git", "source": "winget",
                           "resources": [{ "module": "GitDsc", "resource": "GitConfig" }] }],
            "resources": [{ "module": "GitDsc", "resource": "GitConfig", "data": "core.autocrlf=true" }]
        }"#).unwrap();
        let request = ExportRequest::for_package("Git.Git", out()).with_resource("GitDsc", "GitConfig");

        let records = collect(&catalog, &request).unwrap();
        let resources = &packages(&records)[0].resources;
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].data.as_deref(), Some("core.autocrlf=true"));
    }

    #[test]
    fn test_unknown_resource_has_no_data() {
        let catalog = test_catalog();
        let request = ExportRequest::for_package("Microsoft.PowerShell", out())
            .with_resource("Contoso", "Nothing");

        let records = collect(&catalog, &request).unwrap();
        assert_eq!(packages(&records)[0].resources[0].data, None);
    }

    #[test]
    fn test_all() {
        let catalog = test_catalog();
        let records = collect(&catalog, &ExportRequest::for_all(out())).unwrap();

        let ids: Vec<&str> = packages(&records).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["AppInstallerTest.TestPackageExport", "Microsoft.PowerShell", "9WZDNCRFJ3TJ"]);

        let settings: Vec<SystemSettingKind> = records.iter().filter_map(|r| match r {
            InventoryRecord::System(s) => Some(s.kind),
            _ => None,
        }).collect();
        assert_eq!(settings.len(), 3);
        assert!(matches!(records.last(), Some(InventoryRecord::System(_))));
    }
}
