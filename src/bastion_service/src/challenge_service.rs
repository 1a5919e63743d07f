use std::net::SocketAddr;

use axum::{
    Router,
    http::{HeaderValue, Method, request},
    middleware::from_fn_with_state,
    routing::{get, post},
};
use bastion_adapters::config::CodeSetting;
use bastion_axum::{
    AuthorizeState, ChallengeState,
    middleware::challenge_gate,
    routes::{authorize_check, issue_code, slider_check},
};
use bastion_core::{ChallengeFailureHandler, JsonFailureHandler, PermissionTableProvider};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

/// Verification code endpoints plus the gate guarding every mounted route.
pub struct ChallengeService<F = JsonFailureHandler> {
    router: Router,
    state: ChallengeState<F>,
}

impl<F: ChallengeFailureHandler> ChallengeService<F> {
    /// Create the service with the issue and slider check endpoints
    ///
    /// # Arguments
    /// * `state` - Gate, owner session and failure handler shared by all routes
    /// * `codes` - Supplies the issue URL prefix and the slider check URL
    ///
    /// Codes are issued at `GET {url_prefix}/{code_type}`.
    pub fn new(state: ChallengeState<F>, codes: &CodeSetting) -> Self {
        let issue_path = format!("{}/{{code_type}}", codes.url_prefix.trim_end_matches('/'));

        let router = Router::new()
            .route(&issue_path, get(issue_code::<F>))
            .route(&codes.slider.slider_check_url, post(slider_check::<F>))
            .with_state(state.clone());

        Self { router, state }
    }

    /// Mounts application routes; requests to guarded URIs among them must
    /// carry a valid verification code.
    pub fn with_routes(mut self, routes: Router) -> Self {
        self.router = self.router.merge(routes);
        self
    }

    /// Adds `POST /authorize`, answering whether a principal may call a URI.
    pub fn with_authorization<P, G>(mut self, state: AuthorizeState<P, G>) -> Self
    where
        P: PermissionTableProvider + 'static,
        G: ChallengeFailureHandler,
    {
        self.router = self.router.merge(
            Router::new()
                .route("/authorize", post(authorize_check::<P, G>))
                .with_state(state),
        );
        self
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the service into a router that can be mounted on another router
    ///
    /// # Arguments
    /// * `allowed_origins` - CORS origins; empty disables the CORS layer
    ///
    /// # Returns
    /// An Axum Router that can be nested into another application
    pub fn as_nested_router(mut self, allowed_origins: &[String]) -> Router {
        self.router = self
            .router
            .layer(from_fn_with_state(self.state.clone(), challenge_gate::<F>));

        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        if !origins.is_empty() {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the service as a standalone server
    ///
    /// Connection info is attached to each request so client addresses
    /// reach the gate.
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: &[String],
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Bastion service listening on {}", listener.local_addr()?);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }
}
