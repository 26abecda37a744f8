use std::sync::Arc;

use thiserror::Error;

use crate::{AuthError, Authority, Claims};

/// Why the gate turned a request away. Deliberately coarse: the precise
/// [`AuthError`] goes to the logs, not to the client.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No usable credential, or one that has expired.
    #[error("unauthenticated")]
    Unauthenticated,
    /// A credential was presented but it is not one we honour.
    #[error("forbidden")]
    Forbidden,
}

impl From<&AuthError> for Rejection {
    fn from(err: &AuthError) -> Self {
        match err {
            AuthError::Expired => Rejection::Unauthenticated,
            _ => Rejection::Forbidden,
        }
    }
}

/// What a downstream handler gets to see about the caller.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub claims: Claims,
    /// The bearer token exactly as presented, so the handler can revoke it.
    pub token: String,
}

/// Stateless check run in front of every protected request.
#[derive(Clone)]
pub struct VerificationGate {
    authority: Arc<dyn Authority>,
}

impl VerificationGate {
    pub fn new(authority: Arc<dyn Authority>) -> Self {
        Self { authority }
    }

    /// Run extract and delegate against the raw `Authorization` header value.
    pub fn check(&self, authorization: Option<&str>) -> Result<Authenticated, Rejection> {
        let Some(token) = bearer_token(authorization) else {
            tracing::debug!("no bearer credential on request");
            return Err(Rejection::Unauthenticated);
        };

        match self.authority.verify(token) {
            Ok(claims) => Ok(Authenticated {
                claims,
                token: token.to_owned(),
            }),
            Err(err) => Err(Rejection::from(&err)),
        }
    }
}

/// Pull the token out of `Bearer <token>`. The scheme is matched case-insensitively.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    let (scheme, token) = authorization?.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
