//! Represents one named, typed entry of a configuration document
//!
//! Units are identified uniquely within a document by their instance id.  Edges
//! between units are kept as instance id strings rather than references.

use super::val::PropertySet;
use crate::engine::ResolvableNode;
use std::hash::{Hash, Hasher};
use std::fmt;

pub const SOURCE_TYPE: &str = "Microsoft.WinGet.Dev/Source";
pub const PACKAGE_TYPE: &str = "Microsoft.WinGet.Dev/Package";
pub const USER_SETTINGS_FILE_TYPE: &str = "Microsoft.WinGet.Dev/UserSettingsFile";
pub const ADMIN_SETTINGS_TYPE: &str = "Microsoft.WinGet.Dev/AdminSettings";
pub const OS_SETTINGS_TYPE: &str = "Microsoft.Windows.Settings/WindowsSettings";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Source,
    Package,
    Resource,
    SystemSetting,
}

impl UnitKind {
    /// Recovers the kind of a unit from its type name, as read back from a document
    pub fn from_type_name(type_name: &str) -> UnitKind {
        match type_name {
            SOURCE_TYPE => UnitKind::Source,
            PACKAGE_TYPE => UnitKind::Package,
            USER_SETTINGS_FILE_TYPE | ADMIN_SETTINGS_TYPE | OS_SETTINGS_TYPE => UnitKind::SystemSetting,
            _ => UnitKind::Resource,
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Package => write!(f, "package"),
            Self::Resource => write!(f, "resource"),
            Self::SystemSetting => write!(f, "system setting"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigurationUnit {
    pub kind: UnitKind,
    pub type_name: String,
    pub instance_id: String,
    pub properties: PropertySet,
    pub depends_on: Vec<String>,
}

impl ConfigurationUnit {
    pub fn new(kind: UnitKind, type_name: &str, instance_id: &str) -> ConfigurationUnit {
        ConfigurationUnit {
            kind,
            type_name: type_name.to_string(),
            instance_id: instance_id.to_string(),
            properties: PropertySet::new(),
            depends_on: Vec::new(),
        }
    }

    /// Records a dependency on another unit, ignoring repeats
    pub fn add_dependency(&mut self, instance_id: &str) {
        if !self.depends_on.iter().any(|d| d == instance_id) {
            self.depends_on.push(instance_id.to_string());
        }
    }

    pub fn tag(&self) -> String {
        format!("{} [{}]", self.type_name, self.instance_id)
    }
}

impl PartialEq for ConfigurationUnit {
    fn eq(&self, other: &Self) -> bool {
        self.instance_id == other.instance_id
    }
}

impl Eq for ConfigurationUnit {}

impl Hash for ConfigurationUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.instance_id.hash(state);
    }
}

impl fmt::Display for ConfigurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.instance_id)
    }
}

impl ResolvableNode for ConfigurationUnit {
    fn node_id(&self) -> &str {
        &self.instance_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_type_name() {
        assert_eq!(UnitKind::from_type_name(SOURCE_TYPE), UnitKind::Source);
        assert_eq!(UnitKind::from_type_name(PACKAGE_TYPE), UnitKind::Package);
        assert_eq!(UnitKind::from_type_name(ADMIN_SETTINGS_TYPE), UnitKind::SystemSetting);
        assert_eq!(UnitKind::from_type_name("AppInstallerTest/TestResource"), UnitKind::Resource);
    }

    #[test]
    fn test_add_dependency_dedupes() {
        let mut unit = ConfigurationUnit::new(UnitKind::Package, PACKAGE_TYPE, "src_pkg");
        unit.add_dependency("src_type");
        unit.add_dependency("src_type");
        assert_eq!(unit.depends_on, vec!["src_type".to_string()]);
    }
}
