use std::{collections::HashMap, path::Path};

use bastion_core::{PermissionTable, PermissionTableError, PermissionTableProvider};
use tokio::sync::RwLock;

/// Permission tables held in memory, typically loaded from a JSON file at
/// startup.
///
/// Without a global table the provider reports itself as unconfigured, which
/// makes the authorization engine deny every request.
#[derive(Debug, Default)]
pub struct StaticPermissionProvider {
    global: RwLock<Option<PermissionTable>>,
    tenants: RwLock<HashMap<String, PermissionTable>>,
}

impl StaticPermissionProvider {
    pub fn new(global: Option<PermissionTable>) -> Self {
        Self {
            global: RwLock::new(global),
            tenants: RwLock::new(HashMap::new()),
        }
    }

    /// Reads a `{ role: { uri_pattern: [permission, ..] } }` document.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PermissionTableError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PermissionTableError::Unavailable(format!("{}: {}", path.display(), e))
        })?;
        let table: PermissionTable = serde_json::from_str(&content).map_err(|e| {
            PermissionTableError::Unavailable(format!("{}: {}", path.display(), e))
        })?;
        Ok(Self::new(Some(table)))
    }

    /// Tables are keyed by the tenant authority, `TENANT_` prefix included.
    pub fn with_tenant(mut self, tenant: impl Into<String>, table: PermissionTable) -> Self {
        self.tenants.get_mut().insert(tenant.into(), table);
        self
    }

    /// Swaps the global table; callers refresh the engine afterwards.
    pub async fn replace_global(&self, table: PermissionTable) {
        *self.global.write().await = Some(table);
    }

    pub async fn replace_tenant(&self, tenant: impl Into<String>, table: PermissionTable) {
        self.tenants.write().await.insert(tenant.into(), table);
    }
}

#[async_trait::async_trait]
impl PermissionTableProvider for StaticPermissionProvider {
    async fn roles_authorities(&self) -> Result<PermissionTable, PermissionTableError> {
        self.global
            .read()
            .await
            .clone()
            .ok_or(PermissionTableError::Unconfigured)
    }

    async fn roles_authorities_of_tenant(
        &self,
        tenant: &str,
    ) -> Result<PermissionTable, PermissionTableError> {
        Ok(self
            .tenants
            .read()
            .await
            .get(tenant)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn test_missing_global_table_is_unconfigured() {
        let provider = StaticPermissionProvider::default();
        assert!(matches!(
            provider.roles_authorities().await,
            Err(PermissionTableError::Unconfigured)
        ));
    }

    #[tokio::test]
    async fn test_loads_json_table() {
        let path = std::env::temp_dir().join(format!("bastion-perms-{}.json", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{ "ROLE_ADMIN": {{ "/user/**": ["list", "delete"] }} }}"#
        )
        .unwrap();

        let provider = StaticPermissionProvider::from_json_file(&path).unwrap();
        let table = provider.roles_authorities().await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let admin = table.role("ROLE_ADMIN").unwrap();
        assert!(admin["/user/**"].contains("delete"));
    }

    #[test]
    fn test_unreadable_file_is_unavailable() {
        let result = StaticPermissionProvider::from_json_file("/definitely/not/here.json");
        assert!(matches!(result, Err(PermissionTableError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_tenant_tables_default_to_empty() {
        let provider = StaticPermissionProvider::new(Some(PermissionTable::default()))
            .with_tenant("TENANT_beta", PermissionTable::default());
        provider
            .replace_tenant(
                "TENANT_acme",
                PermissionTable::default().with_grant("ROLE_USER", "/orders/**", ["list"]),
            )
            .await;

        assert!(!provider.roles_authorities_of_tenant("TENANT_acme").await.unwrap().is_empty());
        assert!(provider.roles_authorities_of_tenant("TENANT_other").await.unwrap().is_empty());
    }
}
