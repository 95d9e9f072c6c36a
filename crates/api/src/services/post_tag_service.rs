//! Tag lookups across studylogs.

use sqlx::PgPool;
use studylog_core::types::DbId;
use studylog_db::models::tag::{PostTag, TagResponse};
use studylog_db::repositories::{PostTagRepo, TagRepo};

use crate::error::AppResult;

pub struct PostTagService<'a> {
    pool: &'a PgPool,
}

impl<'a> PostTagService<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Tags attached to at least one studylog, by name.
    pub async fn find_tags_included_in_post(&self) -> AppResult<Vec<TagResponse>> {
        let tags = TagRepo::find_tags_included_in_post(self.pool).await?;
        Ok(tags.iter().map(TagResponse::from).collect())
    }

    /// Post-tag rows for any of `tag_ids`.
    pub async fn find_by_tags(&self, tag_ids: &[DbId]) -> AppResult<Vec<PostTag>> {
        Ok(PostTagRepo::find_by_tag_ids(self.pool, tag_ids).await?)
    }
}
