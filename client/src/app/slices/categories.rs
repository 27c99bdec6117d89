//! Categories by id, in server order, plus the tree built from them.

use std::collections::HashMap;

use shared::{Category, CategoryTreeEntry};

use crate::app::state::RequestState;
use crate::utils::category_tree::{build_category_tree, flatten_tree, CategoryNode, TreeRow};

#[derive(Debug, Clone, Default)]
pub struct CategoriesSlice {
    pub entities: HashMap<i64, Category>,
    pub order: Vec<i64>,
    pub tree: Vec<CategoryNode>,
    pub current: Option<i64>,
    pub request: RequestState,
}

impl CategoriesSlice {
    pub fn set_all(&mut self, categories: Vec<Category>) {
        self.order = categories.iter().map(|c| c.id).collect();
        self.entities = categories.into_iter().map(|c| (c.id, c)).collect();
        self.rebuild_tree();
    }

    /// Take the server-built tree as is and index its categories.
    pub fn set_tree(&mut self, entries: Vec<CategoryTreeEntry>) {
        for category in entries.iter().cloned().flat_map(CategoryTreeEntry::into_categories) {
            if !self.entities.contains_key(&category.id) {
                self.order.push(category.id);
            }
            self.entities.insert(category.id, category);
        }
        self.tree = entries.into_iter().map(CategoryNode::from).collect();
    }

    pub fn set_current(&mut self, category: Category) {
        self.current = Some(category.id);
        self.upsert(category);
    }

    pub fn upsert(&mut self, category: Category) {
        if !self.entities.contains_key(&category.id) {
            self.order.push(category.id);
        }
        self.entities.insert(category.id, category);
        self.rebuild_tree();
    }

    pub fn removed(&mut self, id: i64) {
        self.entities.remove(&id);
        self.order.retain(|x| *x != id);
        if self.current == Some(id) {
            self.current = None;
        }
        self.rebuild_tree();
    }

    pub fn all(&self) -> Vec<&Category> {
        self.order.iter().filter_map(|id| self.entities.get(id)).collect()
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Category> {
        self.entities.values().find(|c| c.slug == slug)
    }

    pub fn current(&self) -> Option<&Category> {
        self.current.and_then(|id| self.entities.get(&id))
    }

    pub fn rows(&self) -> Vec<TreeRow<'_>> {
        flatten_tree(&self.tree)
    }

    fn rebuild_tree(&mut self) {
        let flat: Vec<Category> = self.all().into_iter().cloned().collect();
        self.tree = build_category_tree(&flat);
    }
}
