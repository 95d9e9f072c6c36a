//! The shared ability hierarchy.

use std::collections::HashMap;

use sqlx::PgPool;
use studylog_core::ability::{validate_parent_for_new_ability, AbilityTree};
use studylog_core::types::DbId;
use studylog_db::models::ability::{Ability, AbilityResponse, CreateAbility};
use studylog_db::repositories::AbilityRepo;
use validator::Validate;

use crate::error::AppResult;

const DEFAULT_COLOR: &str = "#000000";

pub struct AbilityService<'a> {
    pool: &'a PgPool,
}

impl<'a> AbilityService<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Parent abilities with their children nested, both by id.
    pub async fn find_tree(&self) -> AppResult<Vec<AbilityResponse>> {
        let abilities = AbilityRepo::list_all(self.pool).await?;
        let tree = AbilityTree::from_records(abilities.iter().map(|a| (a.id, a.parent_id)));
        let by_id: HashMap<DbId, &Ability> = abilities.iter().map(|a| (a.id, a)).collect();

        Ok(tree
            .roots()
            .into_iter()
            .filter_map(|root| by_id.get(&root))
            .map(|parent| {
                let mut response = AbilityResponse::leaf(parent);
                response.children = tree
                    .children(parent.id)
                    .into_iter()
                    .filter_map(|child| by_id.get(&child))
                    .map(|child| AbilityResponse::leaf(child))
                    .collect();
                response
            })
            .collect())
    }

    /// Create a parent ability, or a child under an existing parent.
    pub async fn create(&self, input: &CreateAbility) -> AppResult<AbilityResponse> {
        input.validate()?;

        let parent_ids: Vec<DbId> = input.parent_id.into_iter().collect();
        let tree = AbilityRepo::load_tree_around(self.pool, &parent_ids).await?;
        validate_parent_for_new_ability(&tree, input.parent_id)?;

        let ability = AbilityRepo::create(
            self.pool,
            input.name.trim(),
            input.description.as_deref().unwrap_or_default(),
            input.color.as_deref().unwrap_or(DEFAULT_COLOR),
            input.parent_id,
        )
        .await?;

        tracing::info!(ability_id = ability.id, parent_id = ?ability.parent_id, "Ability created");
        Ok(AbilityResponse::leaf(&ability))
    }
}
