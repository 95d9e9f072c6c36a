//! Pure domain logic for the studylog backend.
//!
//! Nothing in this crate performs I/O. Repositories load rows, services feed
//! them into the functions here, and the results decide what gets persisted.

pub mod ability;
pub mod error;
pub mod level_log;
pub mod pagination;
pub mod popularity;
pub mod report;
pub mod roles;
pub mod studylog;
pub mod types;
