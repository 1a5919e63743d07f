use std::sync::Arc;

use bastion::{
    AuthorizeState, ChallengeService, ChallengeState, HashMapChallengeStore, RedisChallengeStore,
    RefreshScope,
    adapters::{config::BastionSetting, handlers::OwnerSession},
    build_authorize_service, build_challenge_gate, build_delivery_channel, configure_redis,
    core::JsonFailureHandler,
};
use color_eyre::eyre::Result;
use tokio::sync::RwLock;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Standalone verification code and authorization service
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    // Load configuration
    let config = BastionSetting::load()?;

    // Create delivery channel for SMS and custom codes
    let delivery = build_delivery_channel(&config.sms_gateway)?;

    // Challenges live in Redis when a host is configured, in memory otherwise
    let gate = if config.redis.host_name.is_empty() {
        tracing::warn!("No Redis host configured; challenges are kept in memory");
        build_challenge_gate(&config.codes, HashMapChallengeStore::new(), delivery)?
    } else {
        let redis_conn = Arc::new(RwLock::new(configure_redis(&config.redis)?));
        build_challenge_gate(&config.codes, RedisChallengeStore::new(redis_conn), delivery)?
    };

    let session = OwnerSession::new(config.codes.session_cookie.clone())
        .with_secure(config.codes.secure_cookie);
    let challenge_state = ChallengeState::new(gate, session, JsonFailureHandler);

    // Load the permission tables up front so the first request does not pay for it
    let authorize_service = Arc::new(build_authorize_service(&config.authorize)?);
    if let Err(e) = authorize_service.refresh(RefreshScope::All).await {
        tracing::warn!(error = %e, "Permission tables not loaded; retrying on first request");
    }

    let service = ChallengeService::new(challenge_state, &config.codes)
        .with_authorization(AuthorizeState::new(authorize_service, JsonFailureHandler));

    // Run as standalone server
    let listener = tokio::net::TcpListener::bind(&config.server.address).await?;
    tracing::info!("Starting bastion service...");

    service
        .run_standalone(listener, &config.server.allowed_origins)
        .await?;

    Ok(())
}

pub fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
