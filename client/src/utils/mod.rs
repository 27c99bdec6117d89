//! # Utilities
//!
//! Input validation and category-tree shaping for views.

pub mod category_tree;
pub mod validation;

pub use category_tree::{build_category_tree, flatten_tree, CategoryNode, TreeRow};
pub use validation::{FormErrors, ValidationResult};
