//! Tag and post-tag models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studylog_core::types::{DbId, Timestamp};

/// A row from the `tags` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// A row from the `post_tags` junction table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct PostTag {
    pub id: DbId,
    pub studylog_id: DbId,
    pub tag_id: DbId,
}

/// A tag joined with the studylog it is attached to.
#[derive(Debug, Clone, FromRow)]
pub struct StudylogTag {
    pub studylog_id: DbId,
    pub id: DbId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagResponse {
    pub id: DbId,
    pub name: String,
}

impl From<&Tag> for TagResponse {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
        }
    }
}

impl From<&StudylogTag> for TagResponse {
    fn from(tag: &StudylogTag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
        }
    }
}

/// Tag as sent by clients when writing a studylog.
#[derive(Debug, Clone, Deserialize)]
pub struct TagRequest {
    pub name: String,
}
