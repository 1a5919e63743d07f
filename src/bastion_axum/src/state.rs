//! Shared state handed to routes and middleware.

use std::sync::Arc;

use bastion_adapters::handlers::OwnerSession;
use bastion_application::{ChallengeGate, ProcessorRegistry, UriAuthorizeService};
use bastion_core::{ChallengeFailureHandler, JsonFailureHandler, PermissionTableProvider};

/// Everything the issue, slider check and gate endpoints need.
pub struct ChallengeState<F = JsonFailureHandler> {
    pub gate: Arc<ChallengeGate>,
    pub session: OwnerSession,
    pub failure_handler: Arc<F>,
}

impl<F: ChallengeFailureHandler> ChallengeState<F> {
    pub fn new(gate: ChallengeGate, session: OwnerSession, failure_handler: F) -> Self {
        Self {
            gate: Arc::new(gate),
            session,
            failure_handler: Arc::new(failure_handler),
        }
    }

    pub fn registry(&self) -> &ProcessorRegistry {
        self.gate.registry()
    }
}

// Derived Clone would require F: Clone.
impl<F> Clone for ChallengeState<F> {
    fn clone(&self) -> Self {
        Self {
            gate: self.gate.clone(),
            session: self.session.clone(),
            failure_handler: self.failure_handler.clone(),
        }
    }
}

pub struct AuthorizeState<P: PermissionTableProvider, F = JsonFailureHandler> {
    pub service: Arc<UriAuthorizeService<P>>,
    pub failure_handler: Arc<F>,
}

impl<P: PermissionTableProvider, F: ChallengeFailureHandler> AuthorizeState<P, F> {
    pub fn new(service: Arc<UriAuthorizeService<P>>, failure_handler: F) -> Self {
        Self {
            service,
            failure_handler: Arc::new(failure_handler),
        }
    }
}

impl<P: PermissionTableProvider, F> Clone for AuthorizeState<P, F> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            failure_handler: self.failure_handler.clone(),
        }
    }
}
