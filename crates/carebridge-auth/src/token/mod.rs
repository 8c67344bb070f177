//! Credential issuance and verification.
//!
//! This module provides the stateless credential signer:
//!
//! - Access/refresh token pair issuance with a fresh session id
//! - Access token verification (signature, issuer, audience, expiry)
//! - Refresh token verification in its own secret namespace

pub mod claims;
pub mod signer;

pub use claims::{AccessClaims, RefreshClaims};
pub use signer::{IssuedTokens, TokenSigner};
