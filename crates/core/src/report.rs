//! Report validation pipeline.
//!
//! A report declares an *ability graph* (parent abilities with a weight) and a
//! list of studylogs, each tagged with abilities. Before a report is created
//! or updated the pipeline checks, in order:
//!
//! 1. every graph ability is a parent ability,
//! 2. every studylog ability is a present graph ability or one of its children,
//! 3. no other report of the member carries the same title.
//!
//! Represent demotion and persistence happen in the service layer once all
//! checks have passed.

use std::collections::HashSet;
use std::str::FromStr;

use crate::ability::AbilityTree;
use crate::types::DbId;

/// Typed failures raised by the report pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("Every ability in the report graph must be a parent ability")]
    GraphAbilitiesAreNotParent,

    #[error("Studylog abilities must belong to the report's ability graph")]
    UnrelatedAbilityExistence,

    #[error("A report with this title already exists")]
    DuplicateReportTitle,

    #[error("Unsupported reports type '{0}'. Must be one of: simple, represent")]
    UnsupportedReportsType(String),

    #[error("Member is not allowed to modify this report")]
    MemberNotAllowed,
}

/// One entry of a report's ability graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphAbility {
    pub ability_id: DbId,
    pub weight: i32,
    pub is_present: bool,
}

/// A studylog attached to a report, with the abilities cited for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportedStudylogDraft {
    pub studylog_id: DbId,
    pub ability_ids: Vec<DbId>,
}

/// Transient report assembled from a create or update request.
///
/// `id` is `None` when creating and the target report id when updating, so
/// the duplicate-title check can tell a real collision from the report
/// keeping its own title.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub id: Option<DbId>,
    pub member_id: DbId,
    pub title: String,
    pub description: String,
    pub is_represent: bool,
    pub graph: Vec<GraphAbility>,
    pub studylogs: Vec<ReportedStudylogDraft>,
}

impl ReportDraft {
    /// Distinct ids of every graph entry, present or not, in request order.
    pub fn graph_ability_ids(&self) -> Vec<DbId> {
        let mut seen = HashSet::new();
        self.graph
            .iter()
            .map(|entry| entry.ability_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Ids of the graph entries flagged as present.
    pub fn present_graph_ability_ids(&self) -> Vec<DbId> {
        self.graph
            .iter()
            .filter(|entry| entry.is_present)
            .map(|entry| entry.ability_id)
            .collect()
    }

    /// Ability ids cited by all reported studylogs, flattened.
    pub fn studylog_ability_ids(&self) -> Vec<DbId> {
        self.studylogs
            .iter()
            .flat_map(|studylog| studylog.ability_ids.iter().copied())
            .collect()
    }

    /// Reported studylogs with repeated entries merged, in first-seen order.
    ///
    /// A studylog listed twice keeps the union of the abilities cited for it.
    pub fn merged_studylogs(&self) -> Vec<ReportedStudylogDraft> {
        let mut merged: Vec<ReportedStudylogDraft> = Vec::new();
        for studylog in &self.studylogs {
            let index = match merged
                .iter()
                .position(|m| m.studylog_id == studylog.studylog_id)
            {
                Some(index) => index,
                None => {
                    merged.push(ReportedStudylogDraft {
                        studylog_id: studylog.studylog_id,
                        ability_ids: Vec::new(),
                    });
                    merged.len() - 1
                }
            };
            let abilities = &mut merged[index].ability_ids;
            for id in &studylog.ability_ids {
                if !abilities.contains(id) {
                    abilities.push(*id);
                }
            }
        }
        merged
    }

    /// Run the ability-graph checks against the loaded ability tree.
    pub fn verify_abilities(&self, tree: &AbilityTree) -> Result<(), ReportError> {
        verify_graph_abilities_are_parent(tree, &self.graph_ability_ids())?;
        verify_studylog_abilities_are_children_of_graph_abilities(
            tree,
            &self.present_graph_ability_ids(),
            &self.studylog_ability_ids(),
        )
    }
}

/// Fail unless every distinct id in `ability_ids` is a parent ability.
pub fn verify_graph_abilities_are_parent(
    tree: &AbilityTree,
    ability_ids: &[DbId],
) -> Result<(), ReportError> {
    let distinct: HashSet<DbId> = ability_ids.iter().copied().collect();
    let ids: Vec<DbId> = distinct.into_iter().collect();

    if tree.count_parents_of(&ids) != ids.len() {
        return Err(ReportError::GraphAbilitiesAreNotParent);
    }
    Ok(())
}

/// Fail when a studylog cites an ability outside the present graph abilities
/// and their children. An empty citation list is always valid.
pub fn verify_studylog_abilities_are_children_of_graph_abilities(
    tree: &AbilityTree,
    graph_ability_ids: &[DbId],
    studylog_ability_ids: &[DbId],
) -> Result<(), ReportError> {
    if studylog_ability_ids.is_empty() {
        return Ok(());
    }

    let children = tree.children_of(graph_ability_ids);
    let unrelated = studylog_ability_ids
        .iter()
        .filter(|id| !children.contains(id))
        .filter(|id| !graph_ability_ids.contains(id))
        .count();

    if unrelated != 0 {
        return Err(ReportError::UnrelatedAbilityExistence);
    }
    Ok(())
}

/// `existing_id` is the report already holding the same `(title, member)`.
pub fn verify_duplicate_title(
    existing_id: Option<DbId>,
    target_id: Option<DbId>,
) -> Result<(), ReportError> {
    match existing_id {
        Some(existing) if Some(existing) != target_id => Err(ReportError::DuplicateReportTitle),
        _ => Ok(()),
    }
}

pub fn verify_is_allowed_member(owner_id: DbId, member_id: DbId) -> Result<(), ReportError> {
    if owner_id != member_id {
        return Err(ReportError::MemberNotAllowed);
    }
    Ok(())
}

/// Listing strategy for `GET /members/{username}/reports?type=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportsRequestType {
    /// Paginated summaries of every report of the member.
    Simple,
    /// The member's represented report, in full.
    Represent,
}

impl ReportsRequestType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ReportsRequestType::Simple => "simple",
            ReportsRequestType::Represent => "represent",
        }
    }
}

impl FromStr for ReportsRequestType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(ReportsRequestType::Simple),
            "represent" => Ok(ReportsRequestType::Represent),
            other => Err(ReportError::UnsupportedReportsType(other.to_string())),
        }
    }
}
