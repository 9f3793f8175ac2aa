//! Errors an export run can fail with, and the process exit codes they map to

use std::path::PathBuf;
use thiserror::Error;

use crate::engine::CircularDependencyError;

pub mod exit {
    pub const S_OK: u8 = 0;
    pub const ERROR_GENERAL: u8 = 1;
    pub const ERROR_INVALID_CL_ARGUMENTS: u8 = 2;
    pub const ERROR_NO_APPLICATIONS_FOUND: u8 = 3;
    pub const ERROR_IO: u8 = 4;
    pub const ERROR_INTERNAL: u8 = 70;
}

#[derive(Error, Debug)]
pub enum ExportError {
    /// Bad combination of command line options
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The requested package is not installed
    #[error("No installed package found matching: {0}")]
    PackageNotFound(String),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A link references a unit that was never built.  Indicates a builder bug.
    #[error("Unit {unit} depends on {missing}, which is not part of the document")]
    DependencyResolution { unit: String, missing: String },

    #[error("Unit {0} appears more than once")]
    DuplicateUnit(String),

    #[error(transparent)]
    CircularDependency(#[from] CircularDependencyError),

    #[error("Unit {unit} can't be written: {reason}")]
    Unwritable { unit: String, reason: String },
}

impl ExportError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidArguments(_) => exit::ERROR_INVALID_CL_ARGUMENTS,
            Self::PackageNotFound(_) => exit::ERROR_NO_APPLICATIONS_FOUND,
            Self::Io { .. } => exit::ERROR_IO,
            Self::DependencyResolution { .. }
            | Self::DuplicateUnit(_)
            | Self::CircularDependency(_)
            | Self::Unwritable { .. } => exit::ERROR_INTERNAL,
        }
    }
}

/// Picks the exit code for any error surfaced to main
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ExportError>() {
        Some(e) => e.exit_code(),
        None => exit::ERROR_GENERAL,
    }
}
