//! Service layer.
//!
//! Each service borrows the pool, owns the transaction boundary of its
//! operations, and talks only to repositories and the pure rules in
//! `studylog_core`. Handlers stay thin: extract, call one service method,
//! wrap the result.

pub mod ability_service;
pub mod level_log_service;
pub mod member_service;
pub mod post_tag_service;
pub mod report_service;
pub mod studylog_service;

pub use ability_service::AbilityService;
pub use level_log_service::LevelLogService;
pub use member_service::MemberService;
pub use post_tag_service::PostTagService;
pub use report_service::{ReportService, ReportsListing};
pub use studylog_service::StudylogService;
