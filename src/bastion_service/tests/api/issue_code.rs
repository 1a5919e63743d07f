use bastion_core::{CodeType, OutOfBandMessage};
use secrecy::ExposeSecret;

use crate::helpers::TestApp;

#[tokio::test]
async fn issue_image_code_returns_png_and_sets_session() {
    let app = TestApp::spawn().await;

    let response = app.issue("image", &[]).await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(app.stored(CodeType::Image, &response).await.is_some());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["type"], "image");
    assert!(body["image"].as_str().is_some_and(|image| !image.is_empty()));
    assert_eq!(body["expire_in"], 300);
    assert!(body.get("code").is_none());
}

#[tokio::test]
async fn issue_unknown_code_type_returns_404() {
    let app = TestApp::spawn().await;

    let response = app.issue("fingerprint", &[]).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn guarded_post_without_challenge_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.post_form("/authentication/form", &[("imageCode", "1234")]).await;

    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "expired");
}

#[tokio::test]
async fn unguarded_route_passes_without_code() {
    let app = TestApp::spawn().await;

    let response = app
        .http_client
        .get(format!("{}/code/image", app.address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
}

async fn issue_custom_code(app: &TestApp) -> String {
    let issued = app.issue("customize", &[]).await;
    assert_eq!(issued.status().as_u16(), 200);

    let Some(OutOfBandMessage::Custom { code }) = app.sms.last().await else {
        panic!("expected a custom code delivery");
    };
    code.as_ref().expose_secret().clone()
}

#[tokio::test]
async fn customize_code_guards_pattern_routes() {
    let app = TestApp::spawn().await;

    issue_custom_code(&app).await;
    let rejected = app.post_form("/orders/42", &[("customizeCode", "nope")]).await;
    assert_eq!(rejected.status().as_u16(), 401);
    let body: serde_json::Value = rejected.json().await.unwrap();
    assert_eq!(body["code"], "mismatch");

    // The wrong answer consumed the challenge; a fresh one is needed.
    let code = issue_custom_code(&app).await;
    let accepted = app.post_form("/orders/42", &[("customizeCode", &code)]).await;
    assert_eq!(accepted.status().as_u16(), 200);
    assert_eq!(accepted.text().await.unwrap(), "order placed");

    let replayed = app.post_form("/orders/42", &[("customizeCode", &code)]).await;
    assert_eq!(replayed.status().as_u16(), 401);
}
