use std::{collections::BTreeSet, sync::Arc};

use bastion_core::{PermissionTable, ResolvedPermissionMap};
use dashmap::DashMap;

/// Cache key for a resolved map: the principal's role set plus the tenant
/// and scopes that contributed tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ResolveKey {
    pub roles: Vec<String>,
    pub tenant: Option<String>,
    pub scopes: BTreeSet<String>,
}

/// Everything the engine decides from, published as one unit.
///
/// A refresh builds a new snapshot and swaps it in; resolved maps live inside
/// the snapshot so they are dropped together with the tables they came from.
#[derive(Debug, Default)]
pub(crate) struct PermissionSnapshot {
    /// `None` until the global table has been loaded.
    pub global: Option<Arc<PermissionTable>>,
    pub tenants: DashMap<String, Arc<PermissionTable>>,
    pub scopes: DashMap<BTreeSet<String>, Arc<PermissionTable>>,
    pub resolved: DashMap<ResolveKey, Arc<ResolvedPermissionMap>>,
    pub generation: u64,
}

impl PermissionSnapshot {
    pub fn with_global(table: PermissionTable, generation: u64) -> Self {
        Self {
            global: Some(Arc::new(table)),
            generation,
            ..Self::default()
        }
    }

    /// Copy with `tenant`'s table replaced; resolved maps start empty.
    pub fn replacing_tenant(&self, tenant: &str, table: PermissionTable) -> Self {
        let tenants = self.tenants.clone();
        tenants.insert(tenant.to_string(), Arc::new(table));
        Self {
            global: self.global.clone(),
            tenants,
            scopes: self.scopes.clone(),
            resolved: DashMap::new(),
            generation: self.generation + 1,
        }
    }

    /// Copy with the table for `scopes` replaced; resolved maps start empty.
    pub fn replacing_scopes(&self, scopes: &BTreeSet<String>, table: PermissionTable) -> Self {
        let scope_tables = self.scopes.clone();
        scope_tables.insert(scopes.clone(), Arc::new(table));
        Self {
            global: self.global.clone(),
            tenants: self.tenants.clone(),
            scopes: scope_tables,
            resolved: DashMap::new(),
            generation: self.generation + 1,
        }
    }
}
