//! Two-level ability hierarchy held as an arena of nodes.
//!
//! Abilities without a parent are *parent* (top-level) abilities; every other
//! ability is a child of exactly one parent. Repositories load the rows once
//! per request and the report validation pipeline queries this structure
//! instead of issuing one SQL query per check.

use std::collections::{HashMap, HashSet};

use crate::error::CoreError;
use crate::types::DbId;

#[derive(Debug, Clone)]
struct AbilityNode {
    id: DbId,
    parent_id: Option<DbId>,
    /// Arena index of the parent, when the parent row was loaded too.
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Arena of ability nodes addressed by their database id.
#[derive(Debug, Clone, Default)]
pub struct AbilityTree {
    nodes: Vec<AbilityNode>,
    index: HashMap<DbId, usize>,
}

impl AbilityTree {
    /// Build the tree from `(id, parent_id)` pairs in any order.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (DbId, Option<DbId>)>,
    {
        let mut tree = AbilityTree::default();
        for (id, parent_id) in records {
            if tree.index.contains_key(&id) {
                continue;
            }
            tree.index.insert(id, tree.nodes.len());
            tree.nodes.push(AbilityNode {
                id,
                parent_id,
                parent: None,
                children: Vec::new(),
            });
        }

        for idx in 0..tree.nodes.len() {
            let Some(parent_id) = tree.nodes[idx].parent_id else {
                continue;
            };
            if let Some(&parent_idx) = tree.index.get(&parent_id) {
                tree.nodes[idx].parent = Some(parent_idx);
                tree.nodes[parent_idx].children.push(idx);
            }
        }

        tree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: DbId) -> bool {
        self.index.contains_key(&id)
    }

    /// `true` when `id` is a known ability with no parent.
    pub fn is_parent(&self, id: DbId) -> bool {
        self.index
            .get(&id)
            .is_some_and(|&idx| self.nodes[idx].parent_id.is_none())
    }

    /// Parent id of a child ability. `None` for parents and unknown ids.
    pub fn parent_of(&self, id: DbId) -> Option<DbId> {
        self.index.get(&id).and_then(|&idx| self.nodes[idx].parent_id)
    }

    /// Number of distinct ids in `ids` that are parent abilities.
    pub fn count_parents_of(&self, ids: &[DbId]) -> usize {
        ids.iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter(|&&id| self.is_parent(id))
            .count()
    }

    /// Ids of every ability whose parent is one of `parent_ids`.
    pub fn children_of(&self, parent_ids: &[DbId]) -> HashSet<DbId> {
        parent_ids
            .iter()
            .filter_map(|id| self.index.get(id))
            .flat_map(|&idx| self.nodes[idx].children.iter())
            .map(|&child| self.nodes[child].id)
            .collect()
    }

    /// Direct children of `id`, in load order.
    pub fn children(&self, id: DbId) -> Vec<DbId> {
        match self.index.get(&id) {
            Some(&idx) => self.nodes[idx]
                .children
                .iter()
                .map(|&child| self.nodes[child].id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Parent abilities, in load order.
    pub fn roots(&self) -> Vec<DbId> {
        self.nodes
            .iter()
            .filter(|node| node.parent_id.is_none())
            .map(|node| node.id)
            .collect()
    }
}

/// Check that a new ability may hang below `parent_id`.
///
/// The hierarchy is two levels deep, so the parent must exist and must
/// itself be a top-level ability.
pub fn validate_parent_for_new_ability(
    tree: &AbilityTree,
    parent_id: Option<DbId>,
) -> Result<(), CoreError> {
    let Some(parent_id) = parent_id else {
        return Ok(());
    };
    if !tree.contains(parent_id) {
        return Err(CoreError::NotFound {
            entity: "Ability",
            id: parent_id,
        });
    }
    if !tree.is_parent(parent_id) {
        return Err(CoreError::Validation(format!(
            "Ability {parent_id} is a child ability and cannot have children"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2 -> {5, 6}, 3 -> {7}, 9 -> {}, 10 -> {11}
    fn sample_tree() -> AbilityTree {
        AbilityTree::from_records([
            (5, Some(2)),
            (2, None),
            (6, Some(2)),
            (3, None),
            (7, Some(3)),
            (9, None),
            (10, None),
            (11, Some(10)),
        ])
    }

    #[test]
    fn parents_have_no_parent_id() {
        let tree = sample_tree();
        assert!(tree.is_parent(2));
        assert!(tree.is_parent(9));
        assert!(!tree.is_parent(5));
        assert!(!tree.is_parent(404));
    }

    #[test]
    fn children_are_linked_regardless_of_load_order() {
        let tree = sample_tree();
        assert_eq!(tree.children(2), vec![5, 6]);
        assert_eq!(tree.parent_of(5), Some(2));
        assert_eq!(tree.parent_of(2), None);
    }

    #[test]
    fn count_parents_ignores_duplicates_and_children() {
        let tree = sample_tree();
        assert_eq!(tree.count_parents_of(&[2, 2, 3]), 2);
        assert_eq!(tree.count_parents_of(&[2, 5]), 1);
        assert_eq!(tree.count_parents_of(&[404]), 0);
        assert_eq!(tree.count_parents_of(&[]), 0);
    }

    #[test]
    fn children_of_collects_across_parents() {
        let tree = sample_tree();
        let children = tree.children_of(&[2, 3]);
        assert_eq!(children, HashSet::from([5, 6, 7]));
        assert!(tree.children_of(&[9]).is_empty());
    }

    #[test]
    fn roots_lists_parent_abilities_only() {
        let tree = sample_tree();
        assert_eq!(tree.roots(), vec![2, 3, 9, 10]);
    }

    #[test]
    fn new_ability_may_hang_below_a_parent() {
        let tree = sample_tree();
        assert!(validate_parent_for_new_ability(&tree, None).is_ok());
        assert!(validate_parent_for_new_ability(&tree, Some(2)).is_ok());
    }

    #[test]
    fn new_ability_rejects_child_or_missing_parent() {
        let tree = sample_tree();
        assert!(matches!(
            validate_parent_for_new_ability(&tree, Some(5)),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            validate_parent_for_new_ability(&tree, Some(404)),
            Err(CoreError::NotFound { id: 404, .. })
        ));
    }
}
