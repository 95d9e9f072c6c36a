//! Report authoring and listing.
//!
//! Every write runs in one transaction that first takes a row lock on the
//! member, so two concurrent writes cannot both leave a represented report
//! behind. The checks run in a fixed order and stop at the first failure:
//! ownership (updates only), graph parents, studylog abilities, duplicate
//! title. Only then is the previous represented report demoted and the new
//! state written.

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use studylog_core::error::CoreError;
use studylog_core::pagination::{PageRequest, Paged};
use studylog_core::report::{
    verify_duplicate_title, verify_is_allowed_member, ReportDraft, ReportsRequestType,
};
use studylog_core::types::DbId;
use studylog_db::models::member::{Member, MemberResponse};
use studylog_db::models::report::{
    AbilityGraphResponse, GraphAbilityResponse, Report, ReportRequest, ReportResponse,
    ReportSummaryResponse, ReportedAbilityResponse, ReportedStudylogResponse,
};
use studylog_db::repositories::{AbilityRepo, MemberRepo, ReportRepo, StudylogRepo};

use crate::error::{AppError, AppResult};
use crate::services::member_service::MemberService;

/// Result of `GET /members/{username}/reports`, shaped by the request type.
#[derive(Debug)]
pub enum ReportsListing {
    Simple(Paged<ReportSummaryResponse>),
    Represent(Option<ReportResponse>),
}

pub struct ReportService<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportService<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    pub async fn create(&self, member_id: DbId, request: &ReportRequest) -> AppResult<ReportResponse> {
        let mut tx = self.pool.begin().await?;
        let member = lock_member(&mut tx, member_id).await?;

        let draft = request.to_draft(None, member.id)?;
        verify_draft(&mut tx, &draft).await?;

        if draft.is_represent {
            ReportRepo::demote_represent(&mut *tx, member.id, None).await?;
        }
        let report = ReportRepo::insert(&mut tx, &draft).await?;
        tx.commit().await?;

        tracing::info!(report_id = report.id, member_id, "Report created");
        self.assemble(report, &member).await
    }

    /// Replace a report's content. Only its owner may do this.
    pub async fn update(
        &self,
        member_id: DbId,
        report_id: DbId,
        request: &ReportRequest,
    ) -> AppResult<ReportResponse> {
        self.try_update(member_id, report_id, request)
            .await
            .inspect_err(|err| {
                tracing::warn!(report_id, member_id, error = %err, "Report update failed");
            })
    }

    async fn try_update(
        &self,
        member_id: DbId,
        report_id: DbId,
        request: &ReportRequest,
    ) -> AppResult<ReportResponse> {
        let mut tx = self.pool.begin().await?;
        let member = lock_member(&mut tx, member_id).await?;

        let existing = ReportRepo::find_by_id(&mut *tx, report_id)
            .await?
            .ok_or(report_not_found(report_id))?;
        verify_is_allowed_member(existing.member_id, member.id)?;

        let draft = request.to_draft(Some(report_id), member.id)?;
        verify_draft(&mut tx, &draft).await?;

        if draft.is_represent {
            ReportRepo::demote_represent(&mut *tx, member.id, Some(report_id)).await?;
        }
        let report = ReportRepo::update(&mut tx, report_id, &draft)
            .await?
            .ok_or(report_not_found(report_id))?;
        tx.commit().await?;

        tracing::info!(report_id, member_id, "Report updated");
        self.assemble(report, &member).await
    }

    /// Delete a report and everything it owns. Only its owner may do this.
    pub async fn delete(&self, member_id: DbId, report_id: DbId) -> AppResult<()> {
        let existing = ReportRepo::find_by_id(self.pool, report_id)
            .await?
            .ok_or(report_not_found(report_id))?;
        verify_is_allowed_member(existing.member_id, member_id)?;

        if !ReportRepo::delete(self.pool, report_id).await? {
            return Err(report_not_found(report_id).into());
        }

        tracing::info!(report_id, member_id, "Report deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn find_by_id(&self, report_id: DbId) -> AppResult<ReportResponse> {
        let report = ReportRepo::find_by_id(self.pool, report_id)
            .await?
            .ok_or(report_not_found(report_id))?;
        let member = MemberService::new(self.pool).find_by_id(report.member_id).await?;
        self.assemble(report, &member).await
    }

    /// Reports of `username`, shaped by the raw `type` query value.
    pub async fn find_by_username(
        &self,
        username: &str,
        kind: Option<&str>,
        page: PageRequest,
    ) -> AppResult<ReportsListing> {
        let kind: ReportsRequestType = kind.unwrap_or_default().parse()?;
        let member = MemberService::new(self.pool).find_by_username(username).await?;

        match kind {
            ReportsRequestType::Simple => {
                let reports =
                    ReportRepo::list_by_member(self.pool, member.id, page.limit(), page.offset())
                        .await?;
                let total = ReportRepo::count_by_member(self.pool, member.id).await?;
                let data = reports.iter().map(ReportSummaryResponse::from).collect();
                Ok(ReportsListing::Simple(Paged::new(data, total, page)))
            }
            ReportsRequestType::Represent => {
                let represent = match ReportRepo::find_represent_of(self.pool, member.id).await? {
                    Some(report) => Some(self.assemble(report, &member).await?),
                    None => None,
                };
                Ok(ReportsListing::Represent(represent))
            }
        }
    }

    /// Load the graph and reported studylogs of `report`.
    async fn assemble(&self, report: Report, member: &Member) -> AppResult<ReportResponse> {
        let graph = ReportRepo::graph_abilities(self.pool, report.id).await?;
        let studylogs = ReportRepo::reported_studylogs(self.pool, report.id).await?;

        let mut cited: HashMap<DbId, Vec<ReportedAbilityResponse>> = HashMap::new();
        for row in ReportRepo::reported_studylog_abilities(self.pool, report.id).await? {
            cited
                .entry(row.reported_studylog_id)
                .or_default()
                .push(ReportedAbilityResponse {
                    id: row.ability_id,
                    name: row.name,
                    color: row.color,
                });
        }

        Ok(ReportResponse {
            id: report.id,
            title: report.title,
            description: report.description,
            member: MemberResponse::from(member),
            represent: report.is_represent,
            ability_graph: AbilityGraphResponse {
                abilities: graph.iter().map(GraphAbilityResponse::from).collect(),
            },
            studylogs: studylogs
                .into_iter()
                .map(|row| ReportedStudylogResponse {
                    id: row.studylog_id,
                    title: row.title,
                    content: row.content,
                    abilities: cited.remove(&row.id).unwrap_or_default(),
                })
                .collect(),
            created_at: report.created_at,
            updated_at: report.updated_at,
        })
    }
}

/// Lock the member row for the rest of the transaction.
async fn lock_member(conn: &mut PgConnection, member_id: DbId) -> AppResult<Member> {
    MemberRepo::lock_for_update(conn, member_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Member",
                id: member_id,
            }
            .into()
        })
}

/// Graph parents, studylog abilities, title, then the cited studylogs.
async fn verify_draft(conn: &mut PgConnection, draft: &ReportDraft) -> AppResult<()> {
    let mut ability_ids = draft.graph_ability_ids();
    ability_ids.extend(draft.studylog_ability_ids());
    let tree = AbilityRepo::load_tree_around(&mut *conn, &ability_ids).await?;
    draft.verify_abilities(&tree)?;

    let existing = ReportRepo::find_by_title_and_member(&mut *conn, &draft.title, draft.member_id)
        .await?
        .map(|report| report.id);
    verify_duplicate_title(existing, draft.id)?;

    verify_studylogs_exist(conn, draft).await
}

async fn verify_studylogs_exist(conn: &mut PgConnection, draft: &ReportDraft) -> AppResult<()> {
    let ids: Vec<DbId> = draft.studylogs.iter().map(|s| s.studylog_id).collect();
    if ids.is_empty() {
        return Ok(());
    }
    let found: Vec<DbId> = StudylogRepo::find_by_ids(&mut *conn, &ids)
        .await?
        .into_iter()
        .map(|studylog| studylog.id)
        .collect();
    match ids.iter().find(|id| !found.contains(id)) {
        Some(&missing) => Err(AppError::Core(CoreError::NotFound {
            entity: "Studylog",
            id: missing,
        })),
        None => Ok(()),
    }
}

fn report_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Report",
        id,
    }
}
