use bastion_core::{CodeType, OutOfBandMessage};
use secrecy::ExposeSecret;

use crate::helpers::TestApp;

#[tokio::test]
async fn sms_code_is_delivered_and_single_use() {
    let app = TestApp::spawn().await;

    let issued = app.issue("sms", &[("mobile", "13800138000")]).await;
    assert_eq!(issued.status().as_u16(), 200);
    assert!(app.stored(CodeType::Sms, &issued).await.is_some());
    let body: serde_json::Value = issued.json().await.unwrap();
    assert_eq!(body["type"], "sms");
    assert_ne!(body["mobile"], "13800138000");

    let sent = app.sms.sent().await;
    assert_eq!(sent.len(), 1);
    let OutOfBandMessage::Sms { code, .. } = &sent[0] else {
        panic!("expected an SMS delivery");
    };
    let code = code.as_ref().expose_secret().clone();
    assert_eq!(code.len(), 6);

    let accepted = app
        .post_form(
            "/authentication/mobile",
            &[("mobile", "13800138000"), ("smsCode", &code)],
        )
        .await;
    assert_eq!(accepted.status().as_u16(), 200);

    let replayed = app
        .post_form(
            "/authentication/mobile",
            &[("mobile", "13800138000"), ("smsCode", &code)],
        )
        .await;
    assert_eq!(replayed.status().as_u16(), 401);
    let body: serde_json::Value = replayed.json().await.unwrap();
    assert_eq!(body["code"], "expired");
}

#[tokio::test]
async fn sms_issue_rejects_invalid_mobile() {
    let app = TestApp::spawn().await;

    let response = app.issue("sms", &[("mobile", "not-a-number")]).await;

    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "malformed_input");
    assert!(app.sms.sent().await.is_empty());
}

#[tokio::test]
async fn sms_guard_rejects_missing_code() {
    let app = TestApp::spawn().await;

    app.issue("sms", &[("mobile", "13800138000")]).await;
    let response = app
        .post_form("/authentication/mobile", &[("mobile", "13800138000")])
        .await;

    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "malformed_input");
}
