//! Normalized records of installed state, as handed from the collector to the builder

use super::val::PropertySet;
use super::unit::{USER_SETTINGS_FILE_TYPE, ADMIN_SETTINGS_TYPE, OS_SETTINGS_TYPE};

use serde::Deserialize;

use std::fmt;

/// Where a package was installed from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub argument: String,
}

/// A configuration resource attached to a package.  `data` is opaque and
/// may be unknown when nothing exports a payload for the resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceRecord {
    pub module: String,
    pub resource: String,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PackageRecord {
    pub id: String,
    pub version: Option<String>,
    pub source: SourceRecord,
    pub resources: Vec<ResourceRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemSettingKind {
    UserSettingsFile,
    AdminSettings,
    OsSettings,
}

impl SystemSettingKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::UserSettingsFile => USER_SETTINGS_FILE_TYPE,
            Self::AdminSettings => ADMIN_SETTINGS_TYPE,
            Self::OsSettings => OS_SETTINGS_TYPE,
        }
    }
}

impl fmt::Display for SystemSettingKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UserSettingsFile => write!(f, "user_settings_file"),
            Self::AdminSettings => write!(f, "admin_settings"),
            Self::OsSettings => write!(f, "os_settings"),
        }
    }
}

/// A machine-level setting descriptor, only collected for whole-machine exports
#[derive(Debug, Clone, Deserialize)]
pub struct SystemRecord {
    pub kind: SystemSettingKind,
    #[serde(default)]
    pub properties: PropertySet,
}

#[derive(Debug, Clone)]
pub enum InventoryRecord {
    Package(PackageRecord),
    System(SystemRecord),
}
