//! Well-known role name constants.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_USER];

/// Minimum accepted password length for tenant users.
pub const MIN_PASSWORD_LENGTH: usize = 8;

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
