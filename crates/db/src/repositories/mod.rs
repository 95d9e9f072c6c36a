//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Single-statement methods accept any `PgExecutor` so they run on the pool
//! or inside a service transaction; multi-statement writes take a
//! `&mut PgConnection` and expect the caller to own the transaction.

pub mod ability_repo;
pub mod level_log_repo;
pub mod member_repo;
pub mod popular_studylog_repo;
pub mod post_tag_repo;
pub mod report_repo;
pub mod studylog_repo;
pub mod tag_repo;

pub use ability_repo::AbilityRepo;
pub use level_log_repo::LevelLogRepo;
pub use member_repo::MemberRepo;
pub use popular_studylog_repo::PopularStudylogRepo;
pub use post_tag_repo::PostTagRepo;
pub use report_repo::ReportRepo;
pub use studylog_repo::StudylogRepo;
pub use tag_repo::TagRepo;
