//! Storage traits for auth-related data.
//!
//! The session store, refresh-token registry, and handshake state are all
//! network-backed in production; each concern gets its own trait so a
//! backend crate can implement them over a single shared store. The user
//! store is the platform's document store, consulted only for the slice of
//! the user record this subsystem needs.

pub mod handshake;
pub mod refresh_token;
pub mod session;
pub mod unavailable;
pub mod user;

pub use handshake::{HandshakeState, HandshakeStore};
pub use refresh_token::{RefreshEntry, RefreshTokenStore};
pub use session::SessionStore;
pub use unavailable::UnavailableStore;
pub use user::{AuthUser, UserStore};
