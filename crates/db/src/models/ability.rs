//! Ability models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studylog_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `abilities` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Ability {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub color: String,
    pub parent_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// Body of `POST /abilities`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAbility {
    #[validate(length(min = 1, max = 30, message = "name must be 1 to 30 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(equal = 7, message = "color must look like #RRGGBB"))]
    pub color: Option<String>,
    pub parent_id: Option<DbId>,
}

/// A parent ability with its children, as returned by `GET /abilities`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityResponse {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub color: String,
    pub is_parent: bool,
    pub children: Vec<AbilityResponse>,
}

impl AbilityResponse {
    pub fn leaf(ability: &Ability) -> Self {
        Self {
            id: ability.id,
            name: ability.name.clone(),
            description: ability.description.clone(),
            color: ability.color.clone(),
            is_parent: ability.parent_id.is_none(),
            children: Vec::new(),
        }
    }
}
