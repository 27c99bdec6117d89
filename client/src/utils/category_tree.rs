//! # Category Tree
//!
//! Builds the parent/child hierarchy from a flat category list and flattens
//! it into rows a tree view can render top to bottom.
//!
//! The flat list comes from the server and is not trusted to be a tree:
//! categories whose parent is missing become roots, and categories that sit
//! on a parent cycle or deeper than [`MAX_DEPTH`] are left out with a warning.

use std::collections::{HashMap, HashSet};

use shared::{Category, CategoryTreeEntry};

/// Deepest level kept; the root level is 0.
pub const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes in this subtree, including itself.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(CategoryNode::subtree_size).sum::<usize>()
    }
}

impl From<CategoryTreeEntry> for CategoryNode {
    fn from(entry: CategoryTreeEntry) -> Self {
        Self {
            category: entry.category,
            children: entry.children.into_iter().map(CategoryNode::from).collect(),
        }
    }
}

/// One line of a rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow<'a> {
    pub category: &'a Category,
    pub depth: usize,
    pub has_children: bool,
}

/// Arrange `categories` into a forest, keeping input order among siblings.
pub fn build_category_tree(categories: &[Category]) -> Vec<CategoryNode> {
    let ids: HashSet<i64> = categories.iter().map(|c| c.id).collect();
    let mut children: HashMap<i64, Vec<&Category>> = HashMap::new();
    let mut roots = Vec::new();

    for category in categories {
        match category.parent_id {
            Some(parent) if ids.contains(&parent) => children.entry(parent).or_default().push(category),
            _ => roots.push(category),
        }
    }

    let mut placed = HashSet::new();
    let forest: Vec<CategoryNode> = roots
        .into_iter()
        .filter_map(|root| attach(root, &children, 0, &mut placed))
        .collect();

    let dropped = categories.len().saturating_sub(placed.len());
    if dropped > 0 {
        tracing::warn!(dropped, "Categories left out of tree (parent cycle or too deep)");
    }
    forest
}

fn attach(
    category: &Category,
    children: &HashMap<i64, Vec<&Category>>,
    depth: usize,
    placed: &mut HashSet<i64>,
) -> Option<CategoryNode> {
    if depth > MAX_DEPTH || !placed.insert(category.id) {
        return None;
    }
    let kids = children
        .get(&category.id)
        .map(|kids| {
            kids.iter()
                .filter_map(|child| attach(child, children, depth + 1, placed))
                .collect()
        })
        .unwrap_or_default();
    Some(CategoryNode {
        category: category.clone(),
        children: kids,
    })
}

/// Depth-first rows for the whole forest.
pub fn flatten_tree(nodes: &[CategoryNode]) -> Vec<TreeRow<'_>> {
    let mut rows = Vec::new();
    walk(nodes, 0, None, &mut rows);
    rows
}

/// Rows for a tree view where only `expanded` nodes show their children.
pub fn flatten_expanded<'a>(nodes: &'a [CategoryNode], expanded: &HashSet<i64>) -> Vec<TreeRow<'a>> {
    let mut rows = Vec::new();
    walk(nodes, 0, Some(expanded), &mut rows);
    rows
}

fn walk<'a>(
    nodes: &'a [CategoryNode],
    depth: usize,
    expanded: Option<&HashSet<i64>>,
    rows: &mut Vec<TreeRow<'a>>,
) {
    for node in nodes {
        rows.push(TreeRow {
            category: &node.category,
            depth,
            has_children: node.has_children(),
        });
        let open = expanded.map_or(true, |set| set.contains(&node.category.id));
        if open {
            walk(&node.children, depth + 1, expanded, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, parent_id: Option<i64>) -> Category {
        Category {
            id,
            name: format!("c{id}"),
            slug: format!("c-{id}"),
            description: None,
            image: None,
            parent_id,
            active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn ids(rows: &[TreeRow<'_>]) -> Vec<(i64, usize)> {
        rows.iter().map(|r| (r.category.id, r.depth)).collect()
    }

    #[test]
    fn builds_nested_tree_in_input_order() {
        let flat = vec![
            category(1, None),
            category(2, Some(1)),
            category(3, None),
            category(4, Some(2)),
            category(5, Some(1)),
        ];
        let tree = build_category_tree(&flat);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].subtree_size(), 4);

        let rows = flatten_tree(&tree);
        assert_eq!(ids(&rows), vec![(1, 0), (2, 1), (4, 2), (5, 1), (3, 0)]);
        assert!(rows[0].has_children);
        assert!(!rows[2].has_children);
    }

    #[test]
    fn orphans_become_roots() {
        let tree = build_category_tree(&[category(1, Some(99)), category(2, Some(1))]);
        assert_eq!(ids(&flatten_tree(&tree)), vec![(1, 0), (2, 1)]);
    }

    #[test]
    fn cycles_are_dropped() {
        let flat = vec![
            category(1, None),
            category(2, Some(3)),
            category(3, Some(2)),
            category(4, Some(4)),
        ];
        let tree = build_category_tree(&flat);
        assert_eq!(ids(&flatten_tree(&tree)), vec![(1, 0)]);
    }

    #[test]
    fn depth_is_bounded() {
        let flat: Vec<Category> = (0..40)
            .map(|i| category(i, if i == 0 { None } else { Some(i - 1) }))
            .collect();
        let tree = build_category_tree(&flat);
        let rows = flatten_tree(&tree);
        assert_eq!(rows.len(), MAX_DEPTH + 1);
        assert_eq!(rows.last().map(|r| r.depth), Some(MAX_DEPTH));
    }

    #[test]
    fn collapsed_nodes_hide_children() {
        let tree = build_category_tree(&[category(1, None), category(2, Some(1)), category(3, Some(2))]);
        assert_eq!(ids(&flatten_expanded(&tree, &HashSet::new())), vec![(1, 0)]);

        let expanded: HashSet<i64> = [1].into_iter().collect();
        assert_eq!(ids(&flatten_expanded(&tree, &expanded)), vec![(1, 0), (2, 1)]);
    }

    #[test]
    fn converts_server_tree() {
        let entry = CategoryTreeEntry {
            category: category(1, None),
            children: vec![CategoryTreeEntry {
                category: category(2, Some(1)),
                children: vec![],
            }],
        };
        let node = CategoryNode::from(entry);
        assert_eq!(ids(&flatten_tree(&[node])), vec![(1, 0), (2, 1)]);
    }
}
