//! Studylog models, search parameters, and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studylog_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::member::MemberResponse;
use crate::models::tag::{TagRequest, TagResponse};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `studylogs` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Studylog {
    pub id: DbId,
    pub member_id: DbId,
    pub title: String,
    pub content: String,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `popular_studylogs` snapshot.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct PopularStudylog {
    pub id: DbId,
    pub studylog_id: DbId,
    pub rank: i32,
    pub score: i64,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Body of `POST /studylogs` and `PUT /studylogs/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StudylogRequest {
    /// Trimmed and checked by `normalize_title`.
    pub title: String,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<TagRequest>,
}

/// Query parameters for `GET /studylogs`.
///
/// `tags` and `usernames` are comma-separated (`?tags=1,2&usernames=verus`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudylogSearchParams {
    pub keyword: Option<String>,
    pub tags: Option<String>,
    pub usernames: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Parsed search filter handed to the repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudylogFilter {
    pub keyword: Option<String>,
    pub tag_ids: Vec<DbId>,
    pub usernames: Vec<String>,
}

impl StudylogSearchParams {
    /// Split the comma-separated lists. Non-numeric tag ids are an error.
    pub fn to_filter(&self) -> Result<StudylogFilter, String> {
        let keyword = self
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        let tag_ids = split_list(self.tags.as_deref())
            .into_iter()
            .map(|raw| {
                raw.parse::<DbId>()
                    .map_err(|_| format!("Invalid tag id '{raw}'"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let usernames = split_list(self.usernames.as_deref())
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(StudylogFilter {
            keyword,
            tag_ids,
            usernames,
        })
    }
}

fn split_list(raw: Option<&str>) -> Vec<&str> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Query parameters for `GET /studylogs/popular/sync`.
#[derive(Debug, Clone, Deserialize)]
pub struct PopularSyncParams {
    pub size: Option<i64>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudylogResponse {
    pub id: DbId,
    pub author: MemberResponse,
    pub title: String,
    pub content: String,
    pub tags: Vec<TagResponse>,
    pub view_count: i64,
    pub like_count: i64,
    /// Whether the requesting member liked it. Always `false` when anonymous.
    pub liked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of a popularity sync.
#[derive(Debug, Clone, Serialize)]
pub struct PopularSyncResult {
    pub synced: usize,
}
