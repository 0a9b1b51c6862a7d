//! Actor identity and role values supplied by the identity collaborator.

use super::{ParseRoleError, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of the user performing an operation.
///
/// Exactly two roles exist; every lifecycle and permission check is a
/// function of this role plus the current task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Creates tasks, reviews submissions, manages context and feedback files.
    Admin,
    /// Works assigned tasks and submits results for review.
    Employee,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "employee" => Ok(Self::Employee),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The current user performing an operation.
///
/// Threaded explicitly as a parameter into every lifecycle and permission
/// function; the domain never reads ambient global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    uid: UserId,
    role: Role,
}

impl Actor {
    /// Creates an actor from identity-collaborator values.
    #[must_use]
    pub const fn new(uid: UserId, role: Role) -> Self {
        Self { uid, role }
    }

    /// Returns the actor's user identifier.
    #[must_use]
    pub const fn uid(&self) -> UserId {
        self.uid
    }

    /// Returns the actor's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns `true` when the actor holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.uid, self.role)
    }
}
