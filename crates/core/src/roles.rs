//! Well-known role name constants.
//!
//! These must match the `ck_users_role` constraint in `20260101000002_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MEMBER: &str = "member";

/// All roles a user profile may hold.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MEMBER];

/// Validate that a role string is one of [`VALID_ROLES`].
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_accepted() {
        assert!(validate_role(ROLE_ADMIN).is_ok());
        assert!(validate_role(ROLE_MEMBER).is_ok());
    }

    #[test]
    fn unknown_role_rejected() {
        let err = validate_role("superuser").unwrap_err();
        assert!(err.contains("Invalid role"));
    }
}
