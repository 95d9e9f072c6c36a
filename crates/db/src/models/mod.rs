//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` request DTOs, validated with `validator`
//! - `Serialize` response shapes assembled by the service layer

pub mod ability;
pub mod level_log;
pub mod member;
pub mod report;
pub mod studylog;
pub mod tag;
