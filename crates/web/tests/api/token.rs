use auth_core::AuthorityKind;

use crate::helpers::{assert_json_message, spawn_app};

#[tokio::test]
async fn introspection_reports_live_credentials() {
    for kind in [AuthorityKind::Opaque, AuthorityKind::Signed] {
        let app = spawn_app(kind).await;
        let token = app.login_as(&app.test_user).await;

        let response = app.api_client.introspect(&token.value).await.unwrap();

        assert_eq!(200, response.status().as_u16(), "{kind}");
        let body: web::domain::TokenResponse = response.json().await.unwrap();
        assert_eq!(body.value, token.value);
        assert_eq!(body.expires_at, token.expires_at);
    }
}

#[tokio::test]
async fn introspection_of_unknown_credentials_is_401() {
    let app = spawn_app(AuthorityKind::Opaque).await;

    let response = app.api_client.introspect("never-issued").await.unwrap();

    assert_eq!(401, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_json_message(&body, "Unauthorized");
}

#[tokio::test]
async fn introspection_with_a_broken_body_is_400() {
    let app = spawn_app(AuthorityKind::Opaque).await;

    let response = app
        .http_client
        .post(&format!("{}/token", &app.address))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(400, response.status().as_u16());
}
