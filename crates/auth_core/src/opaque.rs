use std::collections::HashMap;
use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Duration;
use parking_lot::Mutex;
use rand::{rngs::OsRng, RngCore};

use crate::{
    AuthError, Authority, AuthorityKind, Claims, Clock, Credential, Identity, OpaqueCredential,
    SystemClock,
};

/// 256 bits of entropy per token.
const TOKEN_BYTES: usize = 32;

pub const DEFAULT_OPAQUE_TTL: Duration = Duration::hours(1);

/// Bearer tokens that mean nothing without a lookup in this authority's store.
pub struct OpaqueTokenAuthority {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    // One lock guards lookup, expiry check and eviction together.
    store: Mutex<HashMap<String, Claims>>,
}

impl OpaqueTokenAuthority {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            store: Mutex::new(HashMap::new()),
        }
    }

    pub fn issue(&self, identity: &Identity) -> Result<OpaqueCredential, AuthError> {
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(self.ttl)
            .ok_or(AuthError::ExpiryOutOfRange)?;
        let value = generate_token();
        let claims = Claims::new(identity, expires_at);

        if self.store.lock().insert(value.clone(), claims).is_some() {
            tracing::warn!("opaque token collision, previous entry overwritten");
        }
        tracing::debug!(subject_id = %identity.subject_id, %expires_at, "issued opaque token");

        Ok(OpaqueCredential { value, expires_at })
    }

    pub fn verify(&self, value: &str) -> Result<Claims, AuthError> {
        self.check(value).inspect_err(|e| {
            tracing::warn!(authority = "opaque", reason = e.kind(), "credential rejected");
        })
    }

    fn check(&self, value: &str) -> Result<Claims, AuthError> {
        let now = self.clock.now();
        let mut store = self.store.lock();

        let claims = store.get(value).ok_or(AuthError::NotFound)?;
        if !claims.is_live_at(now) {
            store.remove(value);
            return Err(AuthError::Expired);
        }
        Ok(claims.clone())
    }

    pub fn revoke(&self, value: &str) {
        if self.store.lock().remove(value).is_some() {
            tracing::debug!("revoked opaque token");
        }
    }

    /// Number of entries currently held, including expired ones not yet
    /// presented for verification.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Authority for OpaqueTokenAuthority {
    fn kind(&self) -> AuthorityKind {
        AuthorityKind::Opaque
    }

    fn issue(&self, identity: &Identity) -> Result<Credential, AuthError> {
        OpaqueTokenAuthority::issue(self, identity).map(Credential::from)
    }

    fn verify(&self, presented: &str) -> Result<Claims, AuthError> {
        OpaqueTokenAuthority::verify(self, presented)
    }

    fn revoke(&self, presented: &str) {
        OpaqueTokenAuthority::revoke(self, presented)
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
