// Credential authorities and the gate that sits in front of protected routes.
//
// Two interchangeable strategies share one contract (issue, verify, revoke):
// - `OpaqueTokenAuthority` keeps random tokens in an in-memory store.
// - `SignedClaimsAuthority` hands out HS256 JWTs and keeps nothing.

mod authority;
mod clock;
mod credential;
mod directory;
mod error;
mod gate;
mod opaque;
mod signed;

pub use authority::{Authority, AuthorityKind};
pub use clock::{Clock, SystemClock};
pub use credential::{Claims, Credential, Identity, OpaqueCredential, SignedCredential};
pub use directory::{DirectoryUser, StaticDirectory, UserDirectory};
pub use error::AuthError;
pub use gate::{bearer_token, Authenticated, Rejection, VerificationGate};
pub use opaque::{OpaqueTokenAuthority, DEFAULT_OPAQUE_TTL};
pub use signed::{SignedClaimsAuthority, DEFAULT_SIGNED_TTL};
