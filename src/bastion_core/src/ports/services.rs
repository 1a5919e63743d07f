use std::collections::BTreeSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{delivery::OutOfBandMessage, permission::PermissionTable};

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Delivery channel rejected the message: {0}")]
    Rejected(String),
    #[error("Delivery channel unreachable: {0}")]
    Unreachable(String),
}

/// Port trait for out-of-band delivery (SMS gateway and the like).
///
/// Best effort: a failure is reported once and never retried by the caller.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn deliver(&self, message: &OutOfBandMessage) -> Result<(), DeliveryError>;
}

#[derive(Debug, Error)]
pub enum PermissionTableError {
    #[error("No role permission table configured")]
    Unconfigured,
    #[error("Permission table unavailable: {0}")]
    Unavailable(String),
}

/// Supplies role permission tables to the authorization engine.
///
/// Only the global table has to be implemented for role based authorization;
/// tenant and scope tables are optional and empty unless overridden.
#[async_trait]
pub trait PermissionTableProvider: Send + Sync {
    async fn roles_authorities(&self) -> Result<PermissionTable, PermissionTableError> {
        Err(PermissionTableError::Unconfigured)
    }

    /// `tenant` is the prefixed authority, e.g. `TENANT_acme`.
    async fn roles_authorities_of_tenant(
        &self,
        _tenant: &str,
    ) -> Result<PermissionTable, PermissionTableError> {
        Ok(PermissionTable::default())
    }

    /// `scopes` hold prefixed authorities, e.g. `SCOPE_read`.
    async fn roles_authorities_of_scope(
        &self,
        _scopes: &BTreeSet<String>,
    ) -> Result<PermissionTable, PermissionTableError> {
        Ok(PermissionTable::default())
    }
}
