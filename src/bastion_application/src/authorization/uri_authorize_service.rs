use std::{
    collections::{BTreeSet, HashMap, HashSet},
    future::Future,
    sync::Arc,
    time::Duration,
};

use arc_swap::ArcSwap;
use bastion_core::{
    AuthorizeError, MethodPermissions, PermissionTable, PermissionTableError,
    PermissionTableProvider, Principal, ResolvedPermissionMap, union_of_roles,
};

use super::snapshot::{PermissionSnapshot, ResolveKey};

/// What a `refresh` reloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshScope {
    /// The global role table; tenant and scope tables reload lazily.
    All,
    Tenant(String),
    Scopes(BTreeSet<String>),
}

/// Decides whether a principal may access a URI.
///
/// A permission is granted when any pattern matching the URI, from any of
/// the principal's roles, carries it. Reads never block on a refresh: they
/// work on whichever snapshot was current when they started.
pub struct UriAuthorizeService<P: PermissionTableProvider> {
    provider: P,
    methods: MethodPermissions,
    provider_timeout: Duration,
    snapshot: ArcSwap<PermissionSnapshot>,
}

impl<P: PermissionTableProvider> UriAuthorizeService<P> {
    pub fn new(provider: P, methods: MethodPermissions, provider_timeout: Duration) -> Self {
        Self {
            provider,
            methods,
            provider_timeout,
            snapshot: ArcSwap::from_pointee(PermissionSnapshot::default()),
        }
    }

    /// True iff a pattern matching `uri` grants `permission` to `principal`.
    #[tracing::instrument(
        name = "UriAuthorizeService::has_permission",
        skip(self, principal),
        fields(principal = %principal.name())
    )]
    pub async fn has_permission(
        &self,
        principal: &Principal,
        uri: &str,
        permission: &str,
    ) -> Result<bool, AuthorizeError> {
        let resolved = self.resolved_for(principal).await?;
        let granted = resolved.allows(uri, permission);
        if !granted {
            tracing::debug!("Permission not granted");
        }
        Ok(granted)
    }

    /// REST style check: the HTTP method names the required permission.
    /// Methods without a mapping are denied.
    pub async fn has_request_permission(
        &self,
        principal: &Principal,
        method: &str,
        uri: &str,
    ) -> Result<bool, AuthorizeError> {
        let Some(permission) = self.methods.permission_for(method) else {
            tracing::debug!(%method, "No permission mapped for HTTP method");
            return Ok(false);
        };
        self.has_permission(principal, uri, permission).await
    }

    /// Resolved map for the principal's roles, tenant and scopes, taken from
    /// one snapshot.
    pub async fn resolved_for(
        &self,
        principal: &Principal,
    ) -> Result<Arc<ResolvedPermissionMap>, AuthorizeError> {
        let snapshot = self.current_snapshot().await?;
        let key = ResolveKey {
            roles: principal.roles().map(str::to_string).collect(),
            tenant: principal.tenant().map(str::to_string),
            scopes: principal.scopes().map(str::to_string).collect(),
        };

        if let Some(resolved) = snapshot.resolved.get(&key) {
            return Ok(resolved.clone());
        }

        let Some(global) = snapshot.global.clone() else {
            return Err(AuthorizeError::Unconfigured);
        };
        let mut tables = vec![global];
        if let Some(tenant) = &key.tenant {
            tables.push(self.tenant_table(&snapshot, tenant).await?);
        }
        if !key.scopes.is_empty() {
            tables.push(self.scope_table(&snapshot, &key.scopes).await?);
        }

        let table_refs: Vec<&PermissionTable> = tables.iter().map(Arc::as_ref).collect();
        let resolved = Arc::new(ResolvedPermissionMap::resolve(
            &table_refs,
            key.roles.iter().map(String::as_str),
        ));
        snapshot.resolved.insert(key, resolved.clone());
        Ok(resolved)
    }

    /// Reloads tables from the provider and publishes a replacement snapshot.
    #[tracing::instrument(name = "UriAuthorizeService::refresh", skip(self))]
    pub async fn refresh(&self, scope: RefreshScope) -> Result<(), AuthorizeError> {
        match scope {
            RefreshScope::All => self.load_global().await?,
            RefreshScope::Tenant(tenant) => {
                let table = self
                    .bounded(self.provider.roles_authorities_of_tenant(&tenant))
                    .await?;
                self.ensure_global().await?;
                self.snapshot
                    .rcu(|current| current.replacing_tenant(&tenant, table.clone()));
            }
            RefreshScope::Scopes(scopes) => {
                let table = self
                    .bounded(self.provider.roles_authorities_of_scope(&scopes))
                    .await?;
                self.ensure_global().await?;
                self.snapshot
                    .rcu(|current| current.replacing_scopes(&scopes, table.clone()));
            }
        }
        Ok(())
    }

    /// `uri pattern -> permissions` granted to `roles` by `table`.
    pub fn uri_authorities_of_user_role<'a, R>(
        &self,
        table: &PermissionTable,
        roles: R,
    ) -> HashMap<String, HashSet<String>>
    where
        R: IntoIterator<Item = &'a str> + Clone,
    {
        union_of_roles(&[table], roles)
    }

    pub fn method_permissions(&self) -> &MethodPermissions {
        &self.methods
    }

    async fn current_snapshot(&self) -> Result<Arc<PermissionSnapshot>, AuthorizeError> {
        self.ensure_global().await?;
        Ok(self.snapshot.load_full())
    }

    async fn ensure_global(&self) -> Result<(), AuthorizeError> {
        if self.snapshot.load().global.is_none() {
            self.load_global().await?;
        }
        Ok(())
    }

    /// Publishes a fresh snapshot holding only the new global table.
    async fn load_global(&self) -> Result<(), AuthorizeError> {
        let table = self.bounded(self.provider.roles_authorities()).await?;
        let generation = self.snapshot.load().generation + 1;
        tracing::info!(roles = table.len(), generation, "Role permission table refreshed");
        self.snapshot
            .store(Arc::new(PermissionSnapshot::with_global(table, generation)));
        Ok(())
    }

    async fn tenant_table(
        &self,
        snapshot: &PermissionSnapshot,
        tenant: &str,
    ) -> Result<Arc<PermissionTable>, AuthorizeError> {
        if let Some(table) = snapshot.tenants.get(tenant) {
            return Ok(table.clone());
        }
        let table = Arc::new(
            self.bounded(self.provider.roles_authorities_of_tenant(tenant))
                .await?,
        );
        snapshot.tenants.insert(tenant.to_string(), table.clone());
        Ok(table)
    }

    async fn scope_table(
        &self,
        snapshot: &PermissionSnapshot,
        scopes: &BTreeSet<String>,
    ) -> Result<Arc<PermissionTable>, AuthorizeError> {
        if let Some(table) = snapshot.scopes.get(scopes) {
            return Ok(table.clone());
        }
        let table = Arc::new(
            self.bounded(self.provider.roles_authorities_of_scope(scopes))
                .await?,
        );
        snapshot.scopes.insert(scopes.clone(), table.clone());
        Ok(table)
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, AuthorizeError>
    where
        F: Future<Output = Result<T, PermissionTableError>>,
    {
        match tokio::time::timeout(self.provider_timeout, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(PermissionTableError::Unconfigured)) => {
                tracing::error!("Role based authorization requested but no permission table is configured");
                Err(AuthorizeError::Unconfigured)
            }
            Ok(Err(PermissionTableError::Unavailable(reason))) => {
                Err(AuthorizeError::StoreUnavailable(reason))
            }
            Err(_) => Err(AuthorizeError::StoreUnavailable(
                "permission table provider timed out".to_string(),
            )),
        }
    }
}
