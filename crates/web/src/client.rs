// Thin HTTP client for the API: log in once, then present the returned
// credential as a bearer token on every protected call.

use reqwest::{Response, StatusCode};
use serde_json::json;

use crate::domain::TokenResponse;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("login refused with status {0}")]
    Refused(StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/login", self.base_url))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::Refused(response.status()));
        }
        Ok(response.json().await?)
    }

    /// `GET {path}` with `Authorization: Bearer {token}`.
    pub async fn get_authorized(&self, path: &str, token: &str) -> Result<Response, reqwest::Error> {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .send()
            .await
    }

    pub async fn logout(&self, token: &str) -> Result<Response, reqwest::Error> {
        self.http
            .post(format!("{}/logout", self.base_url))
            .bearer_auth(token)
            .send()
            .await
    }

    pub async fn introspect(&self, token: &str) -> Result<Response, reqwest::Error> {
        self.http
            .post(format!("{}/token", self.base_url))
            .json(&json!({ "value": token }))
            .send()
            .await
    }
}
