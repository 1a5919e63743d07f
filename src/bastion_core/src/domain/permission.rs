use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::ant_path::AntPattern;

/// `role -> uri pattern -> permissions`, as supplied by a permission table
/// provider. Role keys carry their `ROLE_` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionTable(HashMap<String, HashMap<String, HashSet<String>>>);

impl PermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `permissions` on `pattern` to `role`, merging with what is there.
    pub fn grant<I, S>(&mut self, role: impl Into<String>, pattern: impl Into<String>, permissions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(role.into())
            .or_default()
            .entry(pattern.into())
            .or_default()
            .extend(permissions.into_iter().map(Into::into));
    }

    pub fn with_grant<I, S>(mut self, role: impl Into<String>, pattern: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grant(role, pattern, permissions);
        self
    }

    pub fn role(&self, role: &str) -> Option<&HashMap<String, HashSet<String>>> {
        self.0.get(role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<HashMap<String, HashMap<String, HashSet<String>>>> for PermissionTable {
    fn from(table: HashMap<String, HashMap<String, HashSet<String>>>) -> Self {
        Self(table)
    }
}

/// Union of a role set's entries: `uri pattern -> permissions`.
///
/// Built once and never mutated; a refresh replaces it wholesale.
#[derive(Debug, Default)]
pub struct ResolvedPermissionMap {
    entries: Vec<(AntPattern, HashSet<String>)>,
}

impl ResolvedPermissionMap {
    /// Unions every table's entries for `roles`. Patterns shared by several
    /// roles or tables get the union of their permissions.
    pub fn resolve<'a, R>(tables: &[&PermissionTable], roles: R) -> Self
    where
        R: IntoIterator<Item = &'a str> + Clone,
    {
        Self::from_authorities(union_of_roles(tables, roles))
    }

    pub fn from_authorities(authorities: HashMap<String, HashSet<String>>) -> Self {
        let mut entries: Vec<(AntPattern, HashSet<String>)> = authorities
            .into_iter()
            .map(|(pattern, permissions)| (AntPattern::new(&pattern), permissions))
            .collect();
        // Stable order keeps lookups reproducible across rebuilds.
        entries.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));
        Self { entries }
    }

    /// True when any pattern matching `uri` grants `permission`.
    pub fn allows(&self, uri: &str, permission: &str) -> bool {
        self.entries
            .iter()
            .any(|(pattern, permissions)| permissions.contains(permission) && pattern.matches(uri))
    }

    /// Permissions granted on `uri` by all matching patterns.
    pub fn permissions_for(&self, uri: &str) -> HashSet<&str> {
        self.entries
            .iter()
            .filter(|(pattern, _)| pattern.matches(uri))
            .flat_map(|(_, permissions)| permissions.iter().map(String::as_str))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `uri pattern -> permissions` for the given roles across `tables`.
pub fn union_of_roles<'a, R>(tables: &[&PermissionTable], roles: R) -> HashMap<String, HashSet<String>>
where
    R: IntoIterator<Item = &'a str> + Clone,
{
    let mut union: HashMap<String, HashSet<String>> = HashMap::new();
    for table in tables {
        for role in roles.clone() {
            let Some(entries) = table.role(role) else {
                continue;
            };
            for (pattern, permissions) in entries {
                union
                    .entry(pattern.clone())
                    .or_default()
                    .extend(permissions.iter().cloned());
            }
        }
    }
    union
}

/// Maps HTTP methods to the permission verb a REST-style check requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodPermissions(HashMap<String, String>);

impl MethodPermissions {
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    pub fn with(mut self, method: &str, permission: impl Into<String>) -> Self {
        self.0.insert(method.to_ascii_uppercase(), permission.into());
        self
    }

    /// `None` for methods without a mapping; callers deny those.
    pub fn permission_for(&self, method: &str) -> Option<&str> {
        self.0
            .get(&method.to_ascii_uppercase())
            .map(String::as_str)
    }
}

impl Default for MethodPermissions {
    fn default() -> Self {
        Self::empty()
            .with("GET", "list")
            .with("POST", "add")
            .with("PUT", "edit")
            .with("PATCH", "edit")
            .with("DELETE", "delete")
    }
}
