//! Allocates instance ids for units from their semantic keys
//!
//! Ids are readable and derived only from the key, so the same inventory
//! exported twice produces the same document.  Allocation is memoised per key
//! and scoped to one export run.

use std::collections::{HashMap, HashSet};

use crate::models::SystemSettingKind;

/// What makes a unit the unit it is, independent of its id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnitKey {
    Source { name: String, source_type: String },
    Package { source: String, id: String },
    /// `ordinal` is the position of the resource on its package, so two requests
    /// for the same module/resource pair remain two units
    Resource { package: String, module: String, resource: String, ordinal: usize },
    SystemSetting(SystemSettingKind),
}

impl UnitKey {
    fn base_id(&self) -> String {
        match self {
            UnitKey::Source { name, source_type } => format!("{}_{}", name, source_type),
            UnitKey::Package { source, id } => format!("{}_{}", source, id),
            UnitKey::Resource { package, module, resource, .. } => format!("{}_{}_{}", package, module, resource),
            UnitKey::SystemSetting(kind) => {
                let type_name = kind.type_name();
                type_name.rsplit('/').next().unwrap_or(type_name).to_string()
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct IdentityAllocator {
    by_key: HashMap<UnitKey, String>,
    taken: HashSet<String>,
}

impl IdentityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an id was already handed out for this key
    pub fn contains(&self, key: &UnitKey) -> bool {
        self.by_key.contains_key(key)
    }

    /// Returns the id for the key, allocating one the first time it is seen.  When
    /// the base id is already held by another key, the first free `{base}_{n}`
    /// with n starting at 2 is used.
    pub fn id_for(&mut self, key: &UnitKey) -> String {
        if let Some(id) = self.by_key.get(key) {
            return id.clone();
        }

        let base = sanitize(&key.base_id());
        let mut id = base.clone();
        let mut n = 2;
        while self.taken.contains(&id) {
            id = format!("{}_{}", base, n);
            n += 1;
        }

        self.taken.insert(id.clone());
        self.by_key.insert(key.clone(), id.clone());
        id
    }
}

/// Restricts ids to characters that are safe in a unit header
pub fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' { c } else { '_' })
        .collect()
}
