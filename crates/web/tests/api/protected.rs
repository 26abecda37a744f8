use auth_core::AuthorityKind;

use crate::helpers::{assert_json_message, spawn_app};

const KINDS: [AuthorityKind; 2] = [AuthorityKind::Opaque, AuthorityKind::Signed];

#[tokio::test]
async fn requests_without_a_bearer_credential_are_401() {
    for kind in KINDS {
        let app = spawn_app(kind).await;
        let response = app
            .http_client
            .get(&format!("{}/data", &app.address))
            .send()
            .await
            .unwrap();
        assert_eq!(401, response.status().as_u16());
        let body: serde_json::Value = response.json().await.unwrap();
        assert_json_message(&body, "Unauthorized");

        let response = app.get_with_authorization("/data", "Basic dXNlcjpwYXNz").await;
        assert_eq!(401, response.status().as_u16());
    }
}

#[tokio::test]
async fn unknown_credentials_are_403() {
    for kind in KINDS {
        let app = spawn_app(kind).await;

        let response = app.get_with_authorization("/data", "Bearer not-a-real-token").await;

        assert_eq!(403, response.status().as_u16(), "{kind}");
        let body: serde_json::Value = response.json().await.unwrap();
        assert_json_message(&body, "Forbidden");
    }
}

#[tokio::test]
async fn a_live_credential_reaches_the_handler() {
    for kind in KINDS {
        let app = spawn_app(kind).await;
        let token = app.login_as(&app.test_user).await;

        let response = app.api_client.get_authorized("/data", &token.value).await.unwrap();

        assert_eq!(200, response.status().as_u16(), "{kind}");
        assert_eq!("Hello, Jane!", response.text().await.unwrap());
    }
}

#[tokio::test]
async fn tampered_signed_credentials_are_403() {
    let app = spawn_app(AuthorityKind::Signed).await;
    let token = app.login_as(&app.test_user).await;

    // Swap the payload for the admin's, keeping the user's signature.
    let admin_token = app.login_as(&app.admin_user).await;
    let user_parts: Vec<&str> = token.value.split('.').collect();
    let admin_parts: Vec<&str> = admin_token.value.split('.').collect();
    let forged = format!("{}.{}.{}", user_parts[0], admin_parts[1], user_parts[2]);

    let response = app.api_client.get_authorized("/admin", &forged).await.unwrap();

    assert_eq!(403, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_json_message(&body, "Forbidden");
}

#[tokio::test]
async fn admin_route_checks_the_admin_flag() {
    for kind in KINDS {
        let app = spawn_app(kind).await;
        let user_token = app.login_as(&app.test_user).await;
        let admin_token = app.login_as(&app.admin_user).await;

        let response = app.api_client.get_authorized("/admin", &user_token.value).await.unwrap();
        assert_eq!(403, response.status().as_u16(), "{kind}");

        let response = app.api_client.get_authorized("/admin", &admin_token.value).await.unwrap();
        assert_eq!(200, response.status().as_u16(), "{kind}");
    }
}
