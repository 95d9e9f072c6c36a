//! Report models, request DTOs, and response shapes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studylog_core::error::CoreError;
use studylog_core::report::{GraphAbility, ReportDraft, ReportedStudylogDraft};
use studylog_core::studylog::normalize_title;
use studylog_core::types::{DbId, Timestamp};

use crate::models::member::MemberResponse;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `reports` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub member_id: DbId,
    pub title: String,
    pub description: String,
    pub is_represent: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A graph entry joined with its ability.
#[derive(Debug, Clone, FromRow)]
pub struct GraphAbilityRow {
    pub ability_id: DbId,
    pub name: String,
    pub description: String,
    pub color: String,
    pub weight: i32,
    pub is_present: bool,
}

/// A reported studylog joined with the studylog title.
#[derive(Debug, Clone, FromRow)]
pub struct ReportedStudylogRow {
    pub id: DbId,
    pub studylog_id: DbId,
    pub title: String,
    pub content: String,
}

/// An ability cited by a reported studylog.
#[derive(Debug, Clone, FromRow)]
pub struct ReportedStudylogAbilityRow {
    pub reported_studylog_id: DbId,
    pub ability_id: DbId,
    pub name: String,
    pub color: String,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Body of `POST /reports` and `PUT /reports/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub represent: bool,
    #[serde(default)]
    pub ability_graph: AbilityGraphRequest,
    #[serde(default)]
    pub studylogs: Vec<ReportStudylogRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AbilityGraphRequest {
    #[serde(default)]
    pub abilities: Vec<GraphAbilityRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphAbilityRequest {
    pub id: DbId,
    #[serde(default)]
    pub weight: i32,
    #[serde(default = "default_true")]
    pub is_present: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportStudylogRequest {
    pub id: DbId,
    #[serde(default)]
    pub abilities: Vec<DbId>,
}

fn default_true() -> bool {
    true
}

impl ReportRequest {
    /// Assemble the transient report the validation pipeline runs against.
    ///
    /// Fails when the trimmed title is blank or too long.
    pub fn to_draft(&self, id: Option<DbId>, member_id: DbId) -> Result<ReportDraft, CoreError> {
        let title = normalize_title(&self.title).map_err(CoreError::Validation)?;
        Ok(ReportDraft {
            id,
            member_id,
            title,
            description: self.description.clone(),
            is_represent: self.represent,
            graph: self
                .ability_graph
                .abilities
                .iter()
                .map(|a| GraphAbility {
                    ability_id: a.id,
                    weight: a.weight,
                    is_present: a.is_present,
                })
                .collect(),
            studylogs: self
                .studylogs
                .iter()
                .map(|s| ReportedStudylogDraft {
                    studylog_id: s.id,
                    ability_ids: s.abilities.clone(),
                })
                .collect(),
        })
    }
}

/// Query parameters for `GET /members/{username}/reports`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportsQueryParams {
    /// `simple` or `represent`. A missing value is rejected like an unknown one.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportResponse {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub member: MemberResponse,
    pub represent: bool,
    pub ability_graph: AbilityGraphResponse,
    pub studylogs: Vec<ReportedStudylogResponse>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityGraphResponse {
    pub abilities: Vec<GraphAbilityResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphAbilityResponse {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub color: String,
    pub weight: i32,
    pub is_present: bool,
}

impl From<&GraphAbilityRow> for GraphAbilityResponse {
    fn from(row: &GraphAbilityRow) -> Self {
        Self {
            id: row.ability_id,
            name: row.name.clone(),
            description: row.description.clone(),
            color: row.color.clone(),
            weight: row.weight,
            is_present: row.is_present,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportedStudylogResponse {
    /// The studylog id, not the junction row id.
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub abilities: Vec<ReportedAbilityResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportedAbilityResponse {
    pub id: DbId,
    pub name: String,
    pub color: String,
}

/// Lightweight entry for the `simple` report listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummaryResponse {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub represent: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Report> for ReportSummaryResponse {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id,
            title: report.title.clone(),
            description: report.description.clone(),
            represent: report.is_represent,
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn request_defaults_and_draft_conversion() {
        let request: ReportRequest = serde_json::from_value(serde_json::json!({
            "title": " T1 ",
            "ability_graph": { "abilities": [{ "id": 2, "weight": 3 }] },
            "studylogs": [{ "id": 10, "abilities": [5] }]
        }))
        .unwrap();

        assert!(!request.represent);
        let draft = request.to_draft(Some(7), 1).unwrap();
        assert_eq!(draft.id, Some(7));
        assert_eq!(draft.title, "T1");
        assert_eq!(
            draft.graph,
            vec![GraphAbility {
                ability_id: 2,
                weight: 3,
                is_present: true
            }]
        );
        assert_eq!(draft.studylog_ability_ids(), vec![5]);
    }

    #[test]
    fn blank_title_never_becomes_a_draft() {
        let request: ReportRequest =
            serde_json::from_value(serde_json::json!({ "title": "   " })).unwrap();

        assert_matches!(request.to_draft(None, 1), Err(CoreError::Validation(_)));
    }
}
