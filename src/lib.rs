//! # Bastion - Verification Code and URI Authorization Library
//!
//! This is a facade crate that re-exports all public APIs from the bastion components.
//! Use this crate to get the challenge gate and the authorization engine in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! bastion = { path = "../bastion" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Challenge`, `CodeType`, `Principal`, `PermissionTable`, etc.
//! - **Ports**: `ChallengeStore`, `DeliveryChannel`, `PermissionTableProvider`
//! - **Engines**: `ChallengeGate`, `ProcessorRegistry`, `UriAuthorizeService`
//! - **Adapters**: code generators, `RedisChallengeStore`, `HttpSmsClient`, etc.
//! - **Service**: `ChallengeService` - The main entry point for standalone use

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use bastion_core::*;
}

// Re-export most commonly used core types at the root level
pub use bastion_core::{
    Artifact, AuthorizeDenial, AuthorizeError, Challenge, ChallengeError, ChallengeRejection,
    CodeType, DeliveryPayload, FailureKind, MethodPermissions, OwnerKey, PermissionTable,
    Principal, RequestContext,
};

// ============================================================================
// Ports
// ============================================================================

/// Storage and delivery port definitions
pub mod ports {
    pub use bastion_core::{
        ChallengeKey, ChallengeStore, ChallengeStoreError, DeliveryChannel, DeliveryError,
        PermissionTableError, PermissionTableProvider,
    };
}

// Re-export ports at root level
pub use ports::{ChallengeStore, DeliveryChannel, PermissionTableProvider};

// ============================================================================
// Engines (Application Layer)
// ============================================================================

/// Challenge processors, the gate and the authorization engine
pub mod engines {
    pub use bastion_application::*;
}

// Re-export engines at root level
pub use bastion_application::{
    ChallengeGate, ChallengePolicy, GateDecision, ProcessorRegistry, RefreshScope,
    RequestClassifier, UriAuthorizeService,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Framework-agnostic request handlers
    pub mod handlers {
        pub use bastion_adapters::handlers::*;
    }

    /// Challenge renderers and code generators
    pub mod generators {
        pub use bastion_adapters::generators::*;
    }

    /// Challenge stores and permission providers
    pub mod persistence {
        pub use bastion_adapters::persistence::*;
    }

    /// SMS delivery channels
    pub mod sms {
        pub use bastion_adapters::sms::*;
    }

    /// Configuration
    pub mod config {
        pub use bastion_adapters::config::*;
    }

    /// Axum routes, middleware and state
    pub mod axum {
        pub use bastion_axum::*;
    }
}

// Re-export commonly used adapters at root level
pub use bastion_adapters::{
    persistence::{HashMapChallengeStore, RedisChallengeStore, StaticPermissionProvider},
    sms::{HttpSmsClient, MockSmsClient},
};
pub use bastion_axum::{AuthorizeState, ChallengeState};

// ============================================================================
// Challenge Service (Main Entry Point)
// ============================================================================

/// Main challenge service
pub use bastion_service::{
    ChallengeService, ServiceError, build_authorize_service, build_challenge_gate,
    build_delivery_channel, configure_redis, get_redis_client,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use http;
