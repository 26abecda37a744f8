// Value objects handed out by an authority. None of them hold a reference back
// to the authority that minted them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who a successful login resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: String,
    pub display_name: String,
    pub is_admin: bool,
}

/// Identity plus the instant the credential stops being valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub subject_id: String,
    pub display_name: String,
    pub is_admin: bool,
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    pub fn new(identity: &Identity, expires_at: DateTime<Utc>) -> Self {
        Self {
            subject_id: identity.subject_id.clone(),
            display_name: identity.display_name.clone(),
            is_admin: identity.is_admin,
            expires_at,
        }
    }

    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaqueCredential {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCredential {
    /// Compact JWT: `header.payload.signature`, each part base64url.
    pub encoded: String,
    pub claims: Claims,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Opaque(OpaqueCredential),
    Signed(SignedCredential),
}

impl Credential {
    /// The string a client presents back as its bearer token.
    pub fn value(&self) -> &str {
        match self {
            Credential::Opaque(c) => &c.value,
            Credential::Signed(c) => &c.encoded,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        match self {
            Credential::Opaque(c) => c.expires_at,
            Credential::Signed(c) => c.claims.expires_at,
        }
    }
}

impl From<OpaqueCredential> for Credential {
    fn from(value: OpaqueCredential) -> Self {
        Credential::Opaque(value)
    }
}

impl From<SignedCredential> for Credential {
    fn from(value: SignedCredential) -> Self {
        Credential::Signed(value)
    }
}
