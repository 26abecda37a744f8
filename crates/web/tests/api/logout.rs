use auth_core::AuthorityKind;

use crate::helpers::spawn_app;

#[tokio::test]
async fn logout_revokes_an_opaque_credential() {
    let app = spawn_app(AuthorityKind::Opaque).await;
    let token = app.login_as(&app.test_user).await;

    let response = app.api_client.logout(&token.value).await.unwrap();
    assert_eq!(204, response.status().as_u16());

    let response = app.api_client.get_authorized("/data", &token.value).await.unwrap();
    assert_eq!(403, response.status().as_u16());

    // A second logout with the same credential no longer gets past the gate.
    let response = app.api_client.logout(&token.value).await.unwrap();
    assert_eq!(403, response.status().as_u16());
}

#[tokio::test]
async fn logout_leaves_other_sessions_alone() {
    let app = spawn_app(AuthorityKind::Opaque).await;
    let first = app.login_as(&app.test_user).await;
    let second = app.login_as(&app.test_user).await;

    app.api_client.logout(&first.value).await.unwrap();

    let response = app.api_client.get_authorized("/data", &second.value).await.unwrap();
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn signed_credentials_outlive_logout() {
    let app = spawn_app(AuthorityKind::Signed).await;
    let token = app.login_as(&app.test_user).await;

    let response = app.api_client.logout(&token.value).await.unwrap();
    assert_eq!(204, response.status().as_u16());

    // Nothing is stored server-side, so only expiry retires the token.
    let response = app.api_client.get_authorized("/data", &token.value).await.unwrap();
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn logout_requires_a_credential() {
    let app = spawn_app(AuthorityKind::Opaque).await;

    let response = app
        .http_client
        .post(&format!("{}/logout", &app.address))
        .send()
        .await
        .unwrap();

    assert_eq!(401, response.status().as_u16());
}
