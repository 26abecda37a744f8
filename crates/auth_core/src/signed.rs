use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    AuthError, Authority, AuthorityKind, Claims, Clock, Credential, Identity, SignedCredential,
    SystemClock,
};

const ALGORITHM: Algorithm = Algorithm::HS256;
const ALGORITHM_NAME: &str = "HS256";

pub const DEFAULT_SIGNED_TTL: Duration = Duration::hours(24);

/// JWT payload as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenClaims {
    user_id: String,
    name: String,
    is_admin: bool,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenHeader {
    alg: String,
}

/// Self-contained HS256 tokens. Nothing is stored server-side, so a token can
/// only be retired by letting it expire.
pub struct SignedClaimsAuthority {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SignedClaimsAuthority {
    pub fn new(secret: &Secret<String>, ttl: Duration) -> Self {
        Self::with_clock(secret, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(secret: &Secret<String>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let key = secret.expose_secret().as_bytes();

        // Expiry is checked against our own clock after decoding.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            ttl,
            clock,
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
            validation,
        }
    }

    pub fn issue(
        &self,
        subject_id: &str,
        display_name: &str,
        is_admin: bool,
    ) -> Result<SignedCredential, AuthError> {
        let exp = self
            .clock
            .now()
            .checked_add_signed(self.ttl)
            .ok_or(AuthError::ExpiryOutOfRange)?
            .timestamp();
        let expires_at =
            DateTime::<Utc>::from_timestamp(exp, 0).ok_or(AuthError::ExpiryOutOfRange)?;

        let payload = TokenClaims {
            user_id: subject_id.to_owned(),
            name: display_name.to_owned(),
            is_admin,
            exp,
        };
        let encoded = jsonwebtoken::encode(&Header::new(ALGORITHM), &payload, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))?;
        tracing::debug!(%subject_id, %expires_at, "issued signed token");

        Ok(SignedCredential {
            encoded,
            claims: Claims {
                subject_id: payload.user_id,
                display_name: payload.name,
                is_admin,
                expires_at,
            },
        })
    }

    pub fn verify(&self, encoded: &str) -> Result<Claims, AuthError> {
        self.check(encoded).inspect_err(|e| {
            tracing::warn!(authority = "signed", reason = e.kind(), error = %e, "credential rejected");
        })
    }

    fn check(&self, encoded: &str) -> Result<Claims, AuthError> {
        let alg = peek_algorithm(encoded)?;
        if alg != ALGORITHM_NAME {
            return Err(AuthError::WrongAlgorithm {
                expected: ALGORITHM_NAME,
                found: alg,
            });
        }

        let payload = jsonwebtoken::decode::<TokenClaims>(encoded, &self.decoding_key, &self.validation)
            .map_err(classify)?
            .claims;
        let expires_at = DateTime::<Utc>::from_timestamp(payload.exp, 0)
            .ok_or_else(|| AuthError::Malformed(format!("exp {} out of range", payload.exp)))?;

        let claims = Claims {
            subject_id: payload.user_id,
            display_name: payload.name,
            is_admin: payload.is_admin,
            expires_at,
        };
        if !claims.is_live_at(self.clock.now()) {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }
}

impl Authority for SignedClaimsAuthority {
    fn kind(&self) -> AuthorityKind {
        AuthorityKind::Signed
    }

    fn issue(&self, identity: &Identity) -> Result<Credential, AuthError> {
        SignedClaimsAuthority::issue(
            self,
            &identity.subject_id,
            &identity.display_name,
            identity.is_admin,
        )
        .map(Credential::from)
    }

    fn verify(&self, presented: &str) -> Result<Claims, AuthError> {
        SignedClaimsAuthority::verify(self, presented)
    }

    fn revoke(&self, _presented: &str) {
        tracing::debug!("signed tokens cannot be revoked before expiry");
    }
}

/// Read the `alg` out of the JOSE header without trusting anything else.
fn peek_algorithm(encoded: &str) -> Result<String, AuthError> {
    let mut segments = encoded.split('.');
    let (Some(header), Some(_), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AuthError::Malformed(
            "expected three dot-separated segments".into(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|e| AuthError::Malformed(format!("header is not base64url: {e}")))?;
    let header: TokenHeader = serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::Malformed(format!("header is not valid JSON: {e}")))?;
    Ok(header.alg)
}

fn classify(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::InvalidSignature => AuthError::BadSignature,
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidAlgorithm => AuthError::WrongAlgorithm {
            expected: ALGORITHM_NAME,
            found: "unknown".into(),
        },
        _ => AuthError::Malformed(err.to_string()),
    }
}
