//! Well-known member role constants.
//!
//! These must match the check constraint on `members.role`.

pub const ROLE_CREW: &str = "crew";
pub const ROLE_COACH: &str = "coach";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_CREW, ROLE_COACH, ROLE_ADMIN];
