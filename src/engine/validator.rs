//! Checks the export scope of a request before anything is collected

use crate::error::ExportError;
use crate::models::ExportRequest;
use crate::parser::is_label;

pub fn validate(request: &ExportRequest) -> Result<(), ExportError> {
    use ExportError::InvalidArguments;

    match (&request.package_id, request.all) {
        (Some(_), true) => {
            return Err(InvalidArguments("--package-id and --all can't be used together".into()));
        },
        (None, false) => {
            return Err(InvalidArguments("One of --package-id or --all is required".into()));
        },
        (Some(id), false) if id.trim().is_empty() => {
            return Err(InvalidArguments("--package-id can't be empty".into()));
        },
        _ => (),
    }

    match (&request.module, &request.resource) {
        (Some(_), None) => Err(InvalidArguments("--module requires --resource".into())),
        (None, Some(_)) => Err(InvalidArguments("--resource requires --module".into())),
        (Some(_), Some(_)) if request.all => {
            Err(InvalidArguments("--module and --resource apply to a single --package-id".into()))
        },
        (Some(module), Some(resource)) => {
            for name in [module, resource] {
                if !is_label(name) {
                    return Err(InvalidArguments(format!("'{}' is not a valid module or resource name", name)));
                }
            }
            Ok(())
        },
        _ => Ok(()),
    }
}
