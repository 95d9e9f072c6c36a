pub mod abilities;
pub mod level_logs;
pub mod members;
pub mod reports;
pub mod studylogs;
pub mod tags;
