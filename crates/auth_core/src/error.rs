use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Structurally invalid credential.
    #[error("malformed credential: {0}")]
    Malformed(String),
    /// Opaque token is not in the store.
    #[error("credential not found")]
    NotFound,
    #[error("credential signature does not verify")]
    BadSignature,
    #[error("unexpected signing algorithm: expected {expected}, found {found}")]
    WrongAlgorithm {
        expected: &'static str,
        found: String,
    },
    #[error("credential expired")]
    Expired,
    /// The user directory refused the username/password pair.
    #[error("invalid username or password")]
    DirectoryRejected,
    #[error("failed to sign credential: {0}")]
    Signing(String),
    /// `now + ttl` runs past the last instant `DateTime<Utc>` can hold.
    #[error("credential expiry out of range")]
    ExpiryOutOfRange,
}

impl AuthError {
    /// Short, stable label used as the `reason` field in audit logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Malformed(_) => "malformed",
            AuthError::NotFound => "not_found",
            AuthError::BadSignature => "bad_signature",
            AuthError::WrongAlgorithm { .. } => "wrong_algorithm",
            AuthError::Expired => "expired",
            AuthError::DirectoryRejected => "directory_rejected",
            AuthError::Signing(_) => "signing",
            AuthError::ExpiryOutOfRange => "expiry_out_of_range",
        }
    }
}
