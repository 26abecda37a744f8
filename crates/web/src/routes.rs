use actix_web::{get, post, web, HttpResponse};
use anyhow::Context;
use auth_core::{Authenticated, Authority, UserDirectory};
use secrecy::Secret;

use crate::{
    domain::{TokenResponse, Username},
    error::ApiError,
};

#[get("/health_check")]
pub async fn health_check() -> Result<HttpResponse, actix_web::Error> {
    Ok(HttpResponse::Ok().finish())
}

#[derive(serde::Deserialize)]
pub struct LoginBody {
    username: String,
    password: Secret<String>,
}

#[post("/login")]
#[tracing::instrument(
    name = "Log in",
    skip(body, directory, authority),
    fields(username = %body.username)
)]
pub async fn login(
    body: web::Json<LoginBody>,
    directory: web::Data<dyn UserDirectory>,
    authority: web::Data<dyn Authority>,
) -> Result<HttpResponse, ApiError> {
    let LoginBody { username, password } = body.into_inner();
    let username = Username::parse(username).map_err(ApiError::BadRequest)?;

    let identity = directory
        .authenticate(username.as_ref(), &password)
        .map_err(|e| {
            tracing::info!(reason = e.kind(), "login refused");
            ApiError::Unauthorized("Invalid username or password")
        })?;
    let credential = authority
        .issue(&identity)
        .context("Failed to issue a credential")?;
    tracing::info!(subject_id = %identity.subject_id, authority = %authority.kind(), "credential issued");

    Ok(HttpResponse::Ok().json(TokenResponse::from(&credential)))
}

#[derive(serde::Deserialize)]
pub struct IntrospectBody {
    value: String,
}

/// Report whether a credential is still live, and until when.
#[post("/token")]
#[tracing::instrument(name = "Introspect credential", skip(body, authority))]
pub async fn introspect(
    body: web::Json<IntrospectBody>,
    authority: web::Data<dyn Authority>,
) -> Result<HttpResponse, ApiError> {
    let IntrospectBody { value } = body.into_inner();
    let claims = authority
        .verify(&value)
        .map_err(|_| ApiError::Unauthorized("Unauthorized"))?;

    Ok(HttpResponse::Ok().json(TokenResponse {
        value,
        expires_at: claims.expires_at,
    }))
}

// The handlers below sit behind `RequireCredential`.

pub async fn data(caller: web::ReqData<Authenticated>) -> HttpResponse {
    HttpResponse::Ok().body(format!("Hello, {}!", caller.claims.display_name))
}

pub async fn admin(caller: web::ReqData<Authenticated>) -> Result<HttpResponse, ApiError> {
    if !caller.claims.is_admin {
        tracing::info!(subject_id = %caller.claims.subject_id, "admin route refused");
        return Err(ApiError::Forbidden);
    }
    Ok(HttpResponse::Ok().body(format!("Welcome, administrator {}.", caller.claims.display_name)))
}

#[tracing::instrument(name = "Log out", skip(caller, authority), fields(subject_id = %caller.claims.subject_id))]
pub async fn logout(
    caller: web::ReqData<Authenticated>,
    authority: web::Data<dyn Authority>,
) -> HttpResponse {
    authority.revoke(&caller.token);
    HttpResponse::NoContent().finish()
}
