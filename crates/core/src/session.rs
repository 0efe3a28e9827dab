//! Explicit session identity passed into service calls.
//!
//! A [`Session`] is built once per request from a validated access token and
//! handed down by reference. Core services never look up "the current user"
//! on their own.

use serde::Serialize;

use crate::error::CoreError;
use crate::roles::ROLE_ADMIN;
use crate::types::DbId;

/// The authenticated actor for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: DbId,
    /// Role name (`"admin"` or `"member"`).
    pub role: String,
}

impl Session {
    pub fn new(user_id: DbId, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Fail with [`CoreError::Forbidden`] unless the session holds the admin role.
    pub fn require_admin(&self, action: &str) -> Result<(), CoreError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!("Admin role required to {action}")))
        }
    }
}
