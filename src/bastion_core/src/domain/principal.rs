use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub const ROLE_PREFIX: &str = "ROLE_";
pub const TENANT_PREFIX: &str = "TENANT_";
pub const SCOPE_PREFIX: &str = "SCOPE_";

/// An authenticated caller as seen by the authorization engine.
///
/// Authorities keep their prefix; the prefix decides whether an authority is
/// a role, a tenant or an OAuth scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    name: String,
    authorities: BTreeSet<String>,
}

impl Principal {
    pub fn new<I, S>(name: impl Into<String>, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            authorities: authorities.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn authorities(&self) -> impl Iterator<Item = &str> {
        self.authorities.iter().map(String::as_str)
    }

    /// Role authorities, prefix included, in sorted order.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.with_prefix(ROLE_PREFIX)
    }

    /// The first tenant authority, e.g. `TENANT_acme`.
    pub fn tenant(&self) -> Option<&str> {
        self.with_prefix(TENANT_PREFIX).next()
    }

    /// Scope authorities, e.g. `SCOPE_read`.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.with_prefix(SCOPE_PREFIX)
    }

    fn with_prefix<'a>(&'a self, prefix: &'static str) -> impl Iterator<Item = &'a str> {
        self.authorities
            .iter()
            .map(String::as_str)
            .filter(move |a| a.starts_with(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorities_are_partitioned_by_prefix() {
        let principal = Principal::new(
            "alice",
            ["ROLE_ADMIN", "ROLE_USER", "TENANT_acme", "SCOPE_read", "SCOPE_write", "audit"],
        );

        assert_eq!(principal.roles().collect::<Vec<_>>(), ["ROLE_ADMIN", "ROLE_USER"]);
        assert_eq!(principal.tenant(), Some("TENANT_acme"));
        assert_eq!(principal.scopes().collect::<Vec<_>>(), ["SCOPE_read", "SCOPE_write"]);
        assert_eq!(principal.authorities().count(), 6);
    }

    #[test]
    fn test_principal_without_tenant() {
        let principal = Principal::new("bob", ["ROLE_USER"]);
        assert_eq!(principal.tenant(), None);
        assert_eq!(principal.scopes().count(), 0);
    }
}
