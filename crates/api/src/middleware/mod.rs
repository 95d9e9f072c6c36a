//! Authentication and authorization extractors.
//!
//! - [`auth::AuthMember`] -- the member behind a JWT Bearer token.
//! - [`auth::OptionalAuthMember`] -- same, but anonymous requests pass through.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.

pub mod auth;
pub mod rbac;
