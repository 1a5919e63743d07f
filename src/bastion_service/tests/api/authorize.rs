use serde_json::json;

use crate::helpers::TestApp;

fn check(authorities: &[&str], method: &str, uri: &str) -> serde_json::Value {
    json!({
        "principal": { "name": "alice", "authorities": authorities },
        "method": method,
        "uri": uri,
    })
}

#[tokio::test]
async fn authorize_grants_by_role_and_method() {
    let app = TestApp::spawn().await;

    let cases = [
        (vec!["ROLE_ADMIN"], "DELETE", "/users/7", true),
        (vec!["ROLE_VIEWER"], "GET", "/users/7", true),
        (vec!["ROLE_VIEWER"], "DELETE", "/users/7", false),
        (vec!["ROLE_ADMIN"], "GET", "/orders/7", false),
        (vec!["ROLE_ADMIN"], "TRACE", "/users/7", false),
        (vec![], "GET", "/users/7", false),
    ];

    for (authorities, method, uri, expected) in cases {
        let response = app.post_authorize(&check(&authorities, method, uri)).await;
        assert_eq!(response.status().as_u16(), 200, "{method} {uri}");
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["granted"], expected, "{authorities:?} {method} {uri}");
    }
}

#[tokio::test]
async fn authorize_rejects_malformed_request() {
    let app = TestApp::spawn().await;

    let response = app.post_authorize(&json!({ "method": "GET" })).await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn authorize_route_is_not_challenge_guarded() {
    let app = TestApp::spawn().await;

    let response = app
        .post_authorize(&check(&["ROLE_ADMIN"], "POST", "/users/7"))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["granted"], true);
}
