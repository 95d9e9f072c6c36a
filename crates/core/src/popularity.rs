//! Popular-studylog scoring.
//!
//! A sync run fetches the best `size` studylogs by score, ranks them and
//! stores them as the new snapshot in rank order.

use crate::pagination::clamp_limit;
use crate::types::DbId;

/// Weight of one like relative to one view.
pub const LIKE_WEIGHT: i64 = 3;

/// Default number of studylogs kept per sync.
pub const DEFAULT_SYNC_SIZE: i64 = 6;

/// Maximum number of studylogs kept per sync.
pub const MAX_SYNC_SIZE: i64 = 100;

/// Counters a studylog is ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopularityInput {
    pub studylog_id: DbId,
    pub view_count: i64,
    pub like_count: i64,
}

/// A ranked studylog. `rank` starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedStudylog {
    pub studylog_id: DbId,
    pub rank: i32,
    pub score: i64,
}

pub fn score(view_count: i64, like_count: i64) -> i64 {
    view_count + like_count * LIKE_WEIGHT
}

pub fn clamp_sync_size(size: Option<i64>) -> i64 {
    clamp_limit(size, DEFAULT_SYNC_SIZE, MAX_SYNC_SIZE)
}

/// Rank by score descending, newer studylog first on ties, and keep `size`.
pub fn rank(inputs: &[PopularityInput], size: i64) -> Vec<RankedStudylog> {
    let mut scored: Vec<(DbId, i64)> = inputs
        .iter()
        .map(|input| {
            (
                input.studylog_id,
                score(input.view_count, input.like_count),
            )
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

    scored
        .into_iter()
        .take(usize::try_from(size.max(0)).unwrap_or(0))
        .zip(1..)
        .map(|((studylog_id, score), rank)| RankedStudylog {
            studylog_id,
            rank,
            score,
        })
        .collect()
}
