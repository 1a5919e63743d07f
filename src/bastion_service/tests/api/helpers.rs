use std::{sync::Arc, time::Duration};

use axum::{Router, routing::post};
use bastion_adapters::{
    config::CodeSetting,
    handlers::OwnerSession,
    persistence::{HashMapChallengeStore, StaticPermissionProvider},
    sms::MockSmsClient,
};
use bastion_application::UriAuthorizeService;
use bastion_axum::{AuthorizeState, ChallengeState};
use bastion_core::{
    ChallengeKey, ChallengeStore, CodeType, JsonFailureHandler, MethodPermissions, OwnerKey,
    PermissionTable,
};
use bastion_service::{ChallengeService, build_challenge_gate};
use reqwest::header::SET_COOKIE;

pub const SESSION_COOKIE: &str = "bastion_session";

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub store: HashMapChallengeStore,
    pub sms: MockSmsClient,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let mut codes = CodeSetting::default();
        codes.sms.auth_urls = vec!["/authentication/mobile".to_string()];
        codes.slider.auth_urls = vec!["/authentication/slider".to_string()];
        codes.customize.auth_urls = vec!["/orders/**".to_string()];

        let store = HashMapChallengeStore::new();
        let sms = MockSmsClient::new();
        let gate = build_challenge_gate(&codes, store.clone(), Arc::new(sms.clone()))
            .expect("Failed to build challenge gate");
        let state = ChallengeState::new(
            gate,
            OwnerSession::new(SESSION_COOKIE),
            JsonFailureHandler,
        );

        let table = PermissionTable::new()
            .with_grant("ROLE_ADMIN", "/users/**", ["list", "add", "edit", "delete"])
            .with_grant("ROLE_VIEWER", "/users/**", ["list"]);
        let authorize = UriAuthorizeService::new(
            StaticPermissionProvider::new(Some(table)),
            MethodPermissions::default(),
            Duration::from_millis(200),
        );

        let app_routes = Router::new()
            .route("/authentication/form", post(|| async { "logged in" }))
            .route("/authentication/mobile", post(|| async { "logged in" }))
            .route("/authentication/slider", post(|| async { "logged in" }))
            .route("/orders/{id}", post(|| async { "order placed" }));

        let service = ChallengeService::new(state, &codes)
            .with_routes(app_routes)
            .with_authorization(AuthorizeState::new(Arc::new(authorize), JsonFailureHandler));

        let listener = tokio::net::TcpListener::bind(bastion_adapters::config::test::APP_ADDRESS)
            .await
            .expect("Failed to bind test listener");
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            service.run_standalone(listener, &[]).await.ok();
        });

        let http_client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            address,
            http_client,
            store,
            sms,
        }
    }

    pub async fn issue(&self, code_type: &str, query: &[(&str, &str)]) -> reqwest::Response {
        self.http_client
            .get(format!("{}/code/{}", self.address, code_type))
            .query(query)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.http_client
            .post(format!("{}{}", self.address, path))
            .form(form)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_authorize(&self, body: &serde_json::Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}/authorize", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Stored challenge of `code_type` for the owner in `response`'s cookie.
    pub async fn stored(
        &self,
        code_type: CodeType,
        response: &reqwest::Response,
    ) -> Option<bastion_core::Challenge> {
        let owner = owner_from(response)?;
        self.store
            .get(&ChallengeKey::new(code_type, owner))
            .await
            .expect("Store failed")
    }
}

/// The owner key handed out in a `Set-Cookie` header.
pub fn owner_from(response: &reqwest::Response) -> Option<OwnerKey> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| {
            let pair = cookie.split(';').next()?;
            let (name, value) = pair.split_once('=')?;
            (name == SESSION_COOKIE).then(|| OwnerKey::parse(value).ok())?
        })
}
