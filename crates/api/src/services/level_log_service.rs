//! Level logs and their self-discussions.

use sqlx::PgPool;
use studylog_core::error::CoreError;
use studylog_core::level_log::validate_self_discussions;
use studylog_core::studylog::normalize_title;
use studylog_core::pagination::{PageRequest, Paged};
use studylog_core::types::DbId;
use studylog_db::models::level_log::{
    LevelLog, LevelLogRequest, LevelLogResponse, LevelLogSummaryResponse, SelfDiscussionResponse,
};
use studylog_db::models::member::MemberResponse;
use studylog_db::repositories::{LevelLogRepo, MemberRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::services::member_service::MemberService;

pub struct LevelLogService<'a> {
    pool: &'a PgPool,
}

impl<'a> LevelLogService<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: DbId) -> AppResult<LevelLogResponse> {
        let level_log = self.load(id).await?;
        let author = MemberService::new(self.pool).find_by_id(level_log.member_id).await?;
        self.assemble(level_log, MemberResponse::from(&author)).await
    }

    /// Summaries, newest first. Discussions are not loaded.
    pub async fn find_all(&self, page: PageRequest) -> AppResult<Paged<LevelLogSummaryResponse>> {
        let level_logs = LevelLogRepo::list(self.pool, page.limit(), page.offset()).await?;
        let total = LevelLogRepo::count(self.pool).await?;

        let author_ids: Vec<DbId> = level_logs.iter().map(|l| l.member_id).collect();
        let authors = MemberService::new(self.pool).responses_by_id(&author_ids).await?;

        let data = level_logs
            .into_iter()
            .filter_map(|level_log| {
                let author = authors.get(&level_log.member_id)?.clone();
                Some(LevelLogSummaryResponse {
                    id: level_log.id,
                    author,
                    title: level_log.title,
                    content: level_log.content,
                    created_at: level_log.created_at,
                    updated_at: level_log.updated_at,
                })
            })
            .collect();
        Ok(Paged::new(data, total, page))
    }

    pub async fn create(
        &self,
        member_id: DbId,
        request: &LevelLogRequest,
    ) -> AppResult<LevelLogResponse> {
        let title = validate(request)?;

        let mut tx = self.pool.begin().await?;
        let author = MemberRepo::find_by_id(&mut *tx, member_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Member",
                id: member_id,
            })?;
        let level_log = LevelLogRepo::create(
            &mut tx,
            member_id,
            &title,
            &request.content,
            &request.discussion_pairs(),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(level_log_id = level_log.id, member_id, "Level log created");
        self.assemble(level_log, MemberResponse::from(&author)).await
    }

    /// Overwrite a level log and replace its discussions. Author only.
    pub async fn update(
        &self,
        member_id: DbId,
        id: DbId,
        request: &LevelLogRequest,
    ) -> AppResult<LevelLogResponse> {
        let title = validate(request)?;

        let mut tx = self.pool.begin().await?;
        let existing = LevelLogRepo::find_by_id(&mut *tx, id)
            .await?
            .ok_or(level_log_not_found(id))?;
        ensure_author(&existing, member_id)?;

        let level_log = LevelLogRepo::update(
            &mut tx,
            id,
            &title,
            &request.content,
            &request.discussion_pairs(),
        )
        .await?
        .ok_or(level_log_not_found(id))?;
        tx.commit().await?;

        tracing::info!(level_log_id = id, member_id, "Level log updated");
        let author = MemberService::new(self.pool).find_by_id(member_id).await?;
        self.assemble(level_log, MemberResponse::from(&author)).await
    }

    pub async fn delete(&self, member_id: DbId, id: DbId) -> AppResult<()> {
        let existing = self.load(id).await?;
        ensure_author(&existing, member_id)?;

        if !LevelLogRepo::delete(self.pool, id).await? {
            return Err(level_log_not_found(id).into());
        }

        tracing::info!(level_log_id = id, member_id, "Level log deleted");
        Ok(())
    }

    async fn load(&self, id: DbId) -> AppResult<LevelLog> {
        LevelLogRepo::find_by_id(self.pool, id)
            .await?
            .ok_or_else(|| level_log_not_found(id).into())
    }

    async fn assemble(
        &self,
        level_log: LevelLog,
        author: MemberResponse,
    ) -> AppResult<LevelLogResponse> {
        let discussions = LevelLogRepo::find_discussions(self.pool, level_log.id).await?;
        Ok(LevelLogResponse {
            id: level_log.id,
            author,
            title: level_log.title,
            content: level_log.content,
            self_discussions: discussions.iter().map(SelfDiscussionResponse::from).collect(),
            created_at: level_log.created_at,
            updated_at: level_log.updated_at,
        })
    }
}

/// Run the request checks and return the trimmed title to store.
fn validate(request: &LevelLogRequest) -> Result<String, CoreError> {
    request.validate()?;
    let title = normalize_title(&request.title).map_err(CoreError::Validation)?;
    validate_self_discussions(&request.discussion_pairs()).map_err(CoreError::Validation)?;
    Ok(title)
}

fn ensure_author(level_log: &LevelLog, member_id: DbId) -> Result<(), CoreError> {
    if level_log.member_id != member_id {
        return Err(CoreError::Forbidden(
            "Only the author may modify this level log".into(),
        ));
    }
    Ok(())
}

fn level_log_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "LevelLog",
        id,
    }
}
