//! Bearer-token sessions.
//!
//! Tokens are random UUIDs handed to the client once; only their SHA-256
//! hash is stored.

mod session;

pub use session::{create_session, resolve_session, revoke_session, AuthError, SessionToken};
