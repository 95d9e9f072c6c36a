//! Studylog business rules: search, authoring, views, likes and the popular
//! snapshot.

use std::collections::{HashMap, HashSet};

use sqlx::{PgConnection, PgPool};
use studylog_core::error::CoreError;
use studylog_core::pagination::{PageRequest, Paged, DEFAULT_PAGE_SIZE};
use studylog_core::popularity;
use studylog_core::studylog::{counts_as_view, normalize_tag_names, normalize_title};
use studylog_core::types::DbId;
use studylog_db::models::studylog::{
    PopularSyncResult, Studylog, StudylogRequest, StudylogResponse, StudylogSearchParams,
};
use studylog_db::models::tag::TagResponse;
use studylog_db::repositories::{
    MemberRepo, PopularStudylogRepo, PostTagRepo, StudylogRepo, TagRepo,
};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::member_service::MemberService;

pub struct StudylogService<'a> {
    pool: &'a PgPool,
}

impl<'a> StudylogService<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Search by keyword, tags and usernames, newest first.
    pub async fn search(
        &self,
        params: &StudylogSearchParams,
        viewer_id: Option<DbId>,
    ) -> AppResult<Paged<StudylogResponse>> {
        let filter = params.to_filter().map_err(AppError::BadRequest)?;
        let page = PageRequest::new(params.page, params.size, DEFAULT_PAGE_SIZE);

        let studylogs = StudylogRepo::search(self.pool, &filter, page.limit(), page.offset()).await?;
        let total = StudylogRepo::count(self.pool, &filter).await?;

        let data = self.assemble(studylogs, viewer_id).await?;
        Ok(Paged::new(data, total, page))
    }

    /// Studylogs written by `username`, newest first.
    pub async fn find_studylogs_of(
        &self,
        username: &str,
        page: PageRequest,
    ) -> AppResult<Paged<StudylogResponse>> {
        MemberService::new(self.pool).find_by_username(username).await?;

        let params = StudylogSearchParams {
            usernames: Some(username.to_string()),
            ..Default::default()
        };
        let filter = params.to_filter().map_err(AppError::BadRequest)?;

        let studylogs = StudylogRepo::search(self.pool, &filter, page.limit(), page.offset()).await?;
        let total = StudylogRepo::count(self.pool, &filter).await?;

        let data = self.assemble(studylogs, None).await?;
        Ok(Paged::new(data, total, page))
    }

    /// Load one studylog, counting a view unless the author is reading it.
    pub async fn find_by_id(
        &self,
        id: DbId,
        viewer_id: Option<DbId>,
    ) -> AppResult<StudylogResponse> {
        let mut studylog = self.load(id).await?;

        if counts_as_view(studylog.member_id, viewer_id) {
            StudylogRepo::increase_view_count(self.pool, id).await?;
            studylog.view_count += 1;
        }

        self.assemble_one(studylog, viewer_id).await
    }

    /// The last popularity snapshot in rank order.
    pub async fn find_popular(
        &self,
        page: PageRequest,
        viewer_id: Option<DbId>,
    ) -> AppResult<Paged<StudylogResponse>> {
        let studylogs =
            PopularStudylogRepo::list_studylogs(self.pool, page.limit(), page.offset()).await?;
        let total = PopularStudylogRepo::count(self.pool).await?;

        let data = self.assemble(studylogs, viewer_id).await?;
        Ok(Paged::new(data, total, page))
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    pub async fn create(
        &self,
        member_id: DbId,
        request: &StudylogRequest,
    ) -> AppResult<StudylogResponse> {
        request.validate()?;
        let title = normalize_title(&request.title).map_err(CoreError::Validation)?;
        let tag_names = tag_names(request)?;

        let mut tx = self.pool.begin().await?;
        MemberRepo::find_by_id(&mut *tx, member_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Member",
                id: member_id,
            })?;

        let studylog =
            StudylogRepo::create(&mut *tx, member_id, &title, &request.content)
                .await?;
        attach_tags(&mut tx, studylog.id, &tag_names).await?;
        tx.commit().await?;

        tracing::info!(studylog_id = studylog.id, member_id, "Studylog created");
        self.assemble_one(studylog, Some(member_id)).await
    }

    /// Overwrite title, content and tags. Author only.
    pub async fn update(
        &self,
        member_id: DbId,
        id: DbId,
        request: &StudylogRequest,
    ) -> AppResult<StudylogResponse> {
        request.validate()?;
        let title = normalize_title(&request.title).map_err(CoreError::Validation)?;
        let tag_names = tag_names(request)?;

        let mut tx = self.pool.begin().await?;
        let existing = StudylogRepo::find_by_id(&mut *tx, id)
            .await?
            .ok_or(studylog_not_found(id))?;
        ensure_author(&existing, member_id)?;

        let studylog = StudylogRepo::update(&mut *tx, id, &title, &request.content)
            .await?
            .ok_or(studylog_not_found(id))?;
        PostTagRepo::delete_by_studylog(&mut *tx, id).await?;
        attach_tags(&mut tx, id, &tag_names).await?;
        tx.commit().await?;

        tracing::info!(studylog_id = id, member_id, "Studylog updated");
        self.assemble_one(studylog, Some(member_id)).await
    }

    /// Delete a studylog. Author only.
    pub async fn delete(&self, member_id: DbId, id: DbId) -> AppResult<()> {
        let existing = self.load(id).await?;
        ensure_author(&existing, member_id)?;

        if !StudylogRepo::delete(self.pool, id).await? {
            return Err(studylog_not_found(id).into());
        }

        tracing::info!(studylog_id = id, member_id, "Studylog deleted");
        Ok(())
    }

    /// Like a studylog. Liking twice is a no-op.
    pub async fn like(&self, member_id: DbId, id: DbId) -> AppResult<StudylogResponse> {
        self.load(id).await?;

        let mut tx = self.pool.begin().await?;
        let added = StudylogRepo::like(&mut tx, id, member_id).await?;
        tx.commit().await?;

        tracing::debug!(studylog_id = id, member_id, added, "Studylog liked");
        let studylog = self.load(id).await?;
        self.assemble_one(studylog, Some(member_id)).await
    }

    /// Withdraw a like. Unliking twice is a no-op.
    pub async fn unlike(&self, member_id: DbId, id: DbId) -> AppResult<StudylogResponse> {
        self.load(id).await?;

        let mut tx = self.pool.begin().await?;
        let removed = StudylogRepo::unlike(&mut tx, id, member_id).await?;
        tx.commit().await?;

        tracing::debug!(studylog_id = id, member_id, removed, "Studylog unliked");
        let studylog = self.load(id).await?;
        self.assemble_one(studylog, Some(member_id)).await
    }

    /// Recompute scores and replace the popular snapshot with the top `size`.
    pub async fn sync_popular(&self, size: Option<i64>) -> AppResult<PopularSyncResult> {
        let size = popularity::clamp_sync_size(size);

        let mut tx = self.pool.begin().await?;
        let inputs =
            StudylogRepo::top_by_popularity(&mut *tx, popularity::LIKE_WEIGHT, size).await?;
        let ranked = popularity::rank(&inputs, size);
        PopularStudylogRepo::replace_snapshot(&mut tx, &ranked).await?;
        tx.commit().await?;

        tracing::info!(size, synced = ranked.len(), "Popular studylogs synced");
        Ok(PopularSyncResult {
            synced: ranked.len(),
        })
    }

    // -----------------------------------------------------------------------
    // Assembly
    // -----------------------------------------------------------------------

    async fn load(&self, id: DbId) -> AppResult<Studylog> {
        StudylogRepo::find_by_id(self.pool, id)
            .await?
            .ok_or_else(|| studylog_not_found(id).into())
    }

    async fn assemble_one(
        &self,
        studylog: Studylog,
        viewer_id: Option<DbId>,
    ) -> AppResult<StudylogResponse> {
        let id = studylog.id;
        self.assemble(vec![studylog], viewer_id)
            .await?
            .pop()
            .ok_or_else(|| AppError::InternalError(format!("Studylog {id} lost its author")))
    }

    /// Attach authors, tags and the viewer's like flag, keeping input order.
    ///
    /// Studylogs whose author row is gone are skipped.
    async fn assemble(
        &self,
        studylogs: Vec<Studylog>,
        viewer_id: Option<DbId>,
    ) -> AppResult<Vec<StudylogResponse>> {
        if studylogs.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<DbId> = studylogs.iter().map(|s| s.id).collect();
        let author_ids: Vec<DbId> = studylogs.iter().map(|s| s.member_id).collect();

        let authors = MemberService::new(self.pool).responses_by_id(&author_ids).await?;

        let mut tags: HashMap<DbId, Vec<TagResponse>> = HashMap::new();
        for tag in TagRepo::find_by_studylog_ids(self.pool, &ids).await? {
            tags.entry(tag.studylog_id)
                .or_default()
                .push(TagResponse::from(&tag));
        }

        let liked: HashSet<DbId> = match viewer_id {
            Some(viewer_id) => StudylogRepo::liked_ids(self.pool, viewer_id, &ids)
                .await?
                .into_iter()
                .collect(),
            None => HashSet::new(),
        };

        Ok(studylogs
            .into_iter()
            .filter_map(|studylog| {
                let author = authors.get(&studylog.member_id)?.clone();
                Some(StudylogResponse {
                    id: studylog.id,
                    author,
                    title: studylog.title,
                    content: studylog.content,
                    tags: tags.remove(&studylog.id).unwrap_or_default(),
                    view_count: studylog.view_count,
                    like_count: studylog.like_count,
                    liked: liked.contains(&studylog.id),
                    created_at: studylog.created_at,
                    updated_at: studylog.updated_at,
                })
            })
            .collect())
    }
}

fn tag_names(request: &StudylogRequest) -> Result<Vec<String>, CoreError> {
    let names: Vec<&str> = request.tags.iter().map(|t| t.name.as_str()).collect();
    normalize_tag_names(&names).map_err(CoreError::Validation)
}

async fn attach_tags(
    conn: &mut PgConnection,
    studylog_id: DbId,
    names: &[String],
) -> Result<(), sqlx::Error> {
    for name in names {
        let tag = TagRepo::create_or_get(&mut *conn, name).await?;
        PostTagRepo::insert(&mut *conn, studylog_id, tag.id).await?;
    }
    Ok(())
}

fn ensure_author(studylog: &Studylog, member_id: DbId) -> Result<(), CoreError> {
    if studylog.member_id != member_id {
        return Err(CoreError::Forbidden(
            "Only the author may modify this studylog".into(),
        ));
    }
    Ok(())
}

fn studylog_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Studylog",
        id,
    }
}
