//! OAuth handshake guard: CSRF state and PKCE.
//!
//! Protects the third-party login flow with short-lived, single-use state
//! tokens and an RFC 7636 S256 verifier/challenge pair.

pub mod handshake;
pub mod pkce;

pub use handshake::{Handshake, HandshakeGuard};
pub use pkce::{PkceChallenge, PkceError, PkceVerifier};
