//! Shared identity types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Platform roles carried inside access tokens.
///
/// Role policy evaluation happens elsewhere; this subsystem only transports
/// the role from the user record into the identity claim and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A patient accessing their own records.
    Patient,
    /// A counselor managing assigned patients.
    Counselor,
    /// A researcher with de-identified data access.
    Researcher,
    /// A platform administrator.
    Admin,
}

impl Role {
    /// Returns the role name as stored in tokens and user records.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Counselor => "counselor",
            Self::Researcher => "researcher",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Self::Patient),
            "counselor" => Ok(Self::Counselor),
            "researcher" => Ok(Self::Researcher),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized role name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

/// The authenticated identity reconstructed from a verified access token.
///
/// Never persisted; exists only for the duration of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// User identifier.
    pub user_id: String,
    /// Email address.
    pub email: String,
    /// Platform role.
    pub role: Role,
    /// The session this identity is bound to.
    pub session_id: String,
}
