use bastion_core::{ChallengeSecret, CodeType};

use crate::helpers::TestApp;

/// Issues a slider challenge and returns the issued token, the hidden x
/// offset and the row.
async fn issue_slider(app: &TestApp) -> (String, i32, i32) {
    let issued = app.issue("slider", &[]).await;
    assert_eq!(issued.status().as_u16(), 200);

    let challenge = app
        .stored(CodeType::Slider, &issued)
        .await
        .expect("slider challenge stored");
    let ChallengeSecret::Slider(target) = challenge.secret() else {
        panic!("expected a slider secret");
    };
    let x = target.x;

    let body: serde_json::Value = issued.json().await.unwrap();
    assert!(body.get("x").is_none());
    let token = body["token"].as_str().unwrap().to_string();
    let y = body["y"].as_i64().unwrap() as i32;
    (token, x, y)
}

async fn slider_check(app: &TestApp, token: &str, x: i32, y: i32) -> reqwest::Response {
    app.post_form(
        "/slider/check",
        &[
            ("sliderToken", token),
            ("x", &x.to_string()),
            ("y", &y.to_string()),
        ],
    )
    .await
}

#[tokio::test]
async fn slider_two_phase_check_unlocks_guarded_route() {
    let app = TestApp::spawn().await;
    let (token, x, y) = issue_slider(&app).await;

    let checked = slider_check(&app, &token, x + 1, y).await;
    assert_eq!(checked.status().as_u16(), 200);
    let body: serde_json::Value = checked.json().await.unwrap();
    let second = body["token"].as_str().unwrap().to_string();
    assert_ne!(second, token);

    let guarded = app
        .post_form("/authentication/slider", &[("sliderToken", &second)])
        .await;
    assert_eq!(guarded.status().as_u16(), 200);
    assert_eq!(guarded.text().await.unwrap(), "logged in");

    let replayed = app
        .post_form("/authentication/slider", &[("sliderToken", &second)])
        .await;
    assert_eq!(replayed.status().as_u16(), 401);
}

#[tokio::test]
async fn slider_check_rejects_wrong_position() {
    let app = TestApp::spawn().await;
    let (token, x, y) = issue_slider(&app).await;

    let checked = slider_check(&app, &token, x + 40, y).await;

    assert_eq!(checked.status().as_u16(), 401);
    let body: serde_json::Value = checked.json().await.unwrap();
    assert_eq!(body["code"], "mismatch");
}

#[tokio::test]
async fn slider_second_check_rejects_stale_token() {
    let app = TestApp::spawn().await;
    let (token, x, y) = issue_slider(&app).await;

    let checked = slider_check(&app, &token, x, y).await;
    assert_eq!(checked.status().as_u16(), 200);

    let guarded = app
        .post_form("/authentication/slider", &[("sliderToken", &token)])
        .await;
    assert_eq!(guarded.status().as_u16(), 401);
    let body: serde_json::Value = guarded.json().await.unwrap();
    assert_eq!(body["code"], "mismatch");
}
