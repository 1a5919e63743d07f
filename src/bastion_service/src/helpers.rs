use std::{sync::Arc, time::Duration};

use bastion_adapters::{
    config::{AuthorizeSetting, CodeSetting, RedisSetting, SmsGatewaySetting},
    generators::{
        CustomizeCodeGenerator, ImageCodeGenerator, SelectionCodeGenerator, SliderCodeGenerator,
        SmsCodeGenerator, TrackCodeGenerator,
    },
    persistence::StaticPermissionProvider,
    sms::{HttpSmsClient, MockSmsClient, http_sms_client::HttpSmsClientError},
};
use bastion_application::{
    ChallengeGate, ChallengePolicy, DefaultCodeProcessor, ProcessorRegistry, RequestClassifier,
    SliderCodeProcessor, SliderParams, TrackCodeProcessor, UriAuthorizeService,
};
use bastion_core::{ChallengeStore, DeliveryChannel, PermissionTableError};
use redis::{Client, RedisResult};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid mobile number pattern: {0}")]
    MobilePattern(String),
    #[error("SMS gateway misconfigured: {0}")]
    SmsGateway(#[from] HttpSmsClientError),
    #[error("Failed to load permission table: {0}")]
    PermissionTable(#[from] PermissionTableError),
}

/// Builds the challenge gate with a processor for every code type.
///
/// All processors share `store`; SMS and custom codes leave through
/// `delivery`.
pub fn build_challenge_gate<S>(
    codes: &CodeSetting,
    store: S,
    delivery: Arc<dyn DeliveryChannel>,
) -> Result<ChallengeGate, ServiceError>
where
    S: ChallengeStore + Clone + 'static,
{
    let policy = |expire: u64, reusable: bool| {
        ChallengePolicy::new(Duration::from_secs(expire), codes.store_timeout())
            .with_reusable(reusable)
    };

    let image = &codes.image;
    let sms = &codes.sms;
    let slider = &codes.slider;
    let track = &codes.track;
    let selection = &codes.selection;
    let customize = &codes.customize;

    let sms_generator = SmsCodeGenerator::new(sms.length, &sms.mobile_param_name, &sms.mobile_pattern)
        .map_err(|e| ServiceError::MobilePattern(e.to_string()))?;

    let registry = ProcessorRegistry::new()
        .with(Arc::new(
            DefaultCodeProcessor::new(
                store.clone(),
                ImageCodeGenerator::new(image.length, image.width, image.height),
                policy(image.expire, image.reusable),
                &image.param_name,
            )
            .with_ignore_case(image.ignore_case),
        ))
        .with(Arc::new(
            DefaultCodeProcessor::new(
                store.clone(),
                sms_generator,
                policy(sms.expire, sms.reusable),
                &sms.param_name,
            )
            .with_delivery(delivery.clone()),
        ))
        .with(Arc::new(SliderCodeProcessor::new(
            store.clone(),
            SliderCodeGenerator::new(slider.width, slider.height, slider.piece_size),
            policy(slider.expire, slider.reusable),
            SliderParams {
                token: slider.token_param_name.clone(),
                x: slider.x_param_name.clone(),
                y: slider.y_param_name.clone(),
            },
            Duration::from_secs(slider.second_check_expire),
        )))
        .with(Arc::new(TrackCodeProcessor::new(
            store.clone(),
            TrackCodeGenerator::new(track.width, track.height),
            policy(track.expire, track.reusable),
            &track.param_name,
        )))
        .with(Arc::new(DefaultCodeProcessor::new(
            store.clone(),
            SelectionCodeGenerator::new(selection.length),
            policy(selection.expire, selection.reusable),
            &selection.param_name,
        )))
        .with(Arc::new(
            DefaultCodeProcessor::new(
                store,
                CustomizeCodeGenerator::new(customize.length),
                policy(customize.expire, customize.reusable),
                &customize.param_name,
            )
            .with_delivery(delivery),
        ));

    let classifier = RequestClassifier::new(codes.classification_rules());
    if classifier.is_empty() {
        tracing::warn!("No guarded URIs configured; the challenge gate lets every request pass");
    }

    Ok(ChallengeGate::new(classifier, registry))
}

/// The HTTP gateway when a base URL is configured, otherwise the logging mock.
pub fn build_delivery_channel(
    setting: &SmsGatewaySetting,
) -> Result<Arc<dyn DeliveryChannel>, ServiceError> {
    match &setting.base_url {
        Some(base_url) => Ok(Arc::new(HttpSmsClient::new(
            base_url,
            setting.auth_token.clone(),
            Duration::from_millis(setting.timeout_ms),
        )?)),
        None => {
            tracing::warn!("No SMS gateway configured; codes are only logged");
            Ok(Arc::new(MockSmsClient::new()))
        }
    }
}

/// Authorization engine over the configured permission table file.
///
/// Without a file the engine answers every check as unconfigured.
pub fn build_authorize_service(
    setting: &AuthorizeSetting,
) -> Result<UriAuthorizeService<StaticPermissionProvider>, ServiceError> {
    let provider = match &setting.permission_table {
        Some(path) => StaticPermissionProvider::from_json_file(path)?,
        None => StaticPermissionProvider::default(),
    };

    Ok(UriAuthorizeService::new(
        provider,
        setting.method_permissions(),
        setting.provider_timeout(),
    ))
}

/// Configure and return a Redis connection
///
/// Reads and writes are bounded by the configured timeout.
pub fn configure_redis(setting: &RedisSetting) -> RedisResult<redis::Connection> {
    let timeout = Duration::from_millis(setting.timeout_ms);
    let conn = get_redis_client(&setting.host_name)?.get_connection_with_timeout(timeout)?;
    conn.set_read_timeout(Some(timeout))?;
    conn.set_write_timeout(Some(timeout))?;
    Ok(conn)
}

/// Create a Redis client
///
/// # Arguments
/// * `redis_hostname` - Redis server hostname
///
/// # Returns
/// Result containing the Redis client or an error
pub fn get_redis_client(redis_hostname: &str) -> RedisResult<Client> {
    let redis_url = format!("redis://{}/", redis_hostname);
    redis::Client::open(redis_url)
}
