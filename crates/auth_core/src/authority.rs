use std::fmt;

use serde::Deserialize;

use crate::{AuthError, Claims, Credential, Identity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorityKind {
    Opaque,
    Signed,
}

impl AuthorityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorityKind::Opaque => "opaque",
            AuthorityKind::Signed => "signed",
        }
    }
}

impl fmt::Display for AuthorityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issues, verifies and revokes bearer credentials.
///
/// Implementations are shared across request handlers, so every method takes
/// `&self` and must be safe to call concurrently.
pub trait Authority: Send + Sync {
    fn kind(&self) -> AuthorityKind;

    /// Mint a fresh credential for `identity`. Every call yields a new one.
    fn issue(&self, identity: &Identity) -> Result<Credential, AuthError>;

    /// Resolve a presented token back to its claims, checking expiry on every call.
    fn verify(&self, presented: &str) -> Result<Claims, AuthError>;

    /// Withdraw a credential before it expires. Unknown tokens are ignored.
    fn revoke(&self, presented: &str);
}
