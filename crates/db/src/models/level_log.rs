//! Level-log and self-discussion models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studylog_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::member::MemberResponse;

/// A row from the `level_logs` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct LevelLog {
    pub id: DbId,
    pub member_id: DbId,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `self_discussions` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct SelfDiscussion {
    pub id: DbId,
    pub level_log_id: DbId,
    pub question: String,
    pub answer: String,
    pub sort_order: i32,
}

/// Body of `POST /levellogs` and `PUT /levellogs/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LevelLogRequest {
    /// Trimmed and checked by `normalize_title`.
    pub title: String,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
    #[serde(default)]
    pub self_discussions: Vec<SelfDiscussionRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelfDiscussionRequest {
    pub question: String,
    pub answer: String,
}

impl LevelLogRequest {
    pub fn discussion_pairs(&self) -> Vec<(&str, &str)> {
        self.self_discussions
            .iter()
            .map(|d| (d.question.as_str(), d.answer.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfDiscussionResponse {
    pub id: DbId,
    pub question: String,
    pub answer: String,
}

impl From<&SelfDiscussion> for SelfDiscussionResponse {
    fn from(discussion: &SelfDiscussion) -> Self {
        Self {
            id: discussion.id,
            question: discussion.question.clone(),
            answer: discussion.answer.clone(),
        }
    }
}

/// Full level log with its discussions, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelLogResponse {
    pub id: DbId,
    pub author: MemberResponse,
    pub title: String,
    pub content: String,
    #[serde(rename = "level_logs")]
    pub self_discussions: Vec<SelfDiscussionResponse>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Listing entry; discussions are never loaded for summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelLogSummaryResponse {
    pub id: DbId,
    pub author: MemberResponse,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
