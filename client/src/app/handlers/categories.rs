//! # Category Actions

use shared::{Category, CategoryFilters, CreateCategoryRequest, UpdateCategoryRequest};

use crate::app::state::{AppState, RequestState};
use crate::app::Store;
use crate::core::error::ApiResult;

fn categories_request(state: &mut AppState) -> &mut RequestState {
    &mut state.categories.request
}

impl Store {
    pub async fn fetch_categories(&self, filters: CategoryFilters) -> ApiResult<()> {
        self.fetch(
            categories_request,
            "categories",
            self.api().get_categories(&filters),
            |s, categories| s.categories.set_all(categories),
        )
        .await
    }

    pub async fn fetch_category(&self, id: i64) -> ApiResult<()> {
        self.fetch(categories_request, "category", self.api().get_category(id), |s, category| {
            s.categories.set_current(category)
        })
        .await
    }

    pub async fn fetch_category_by_slug(&self, slug: &str) -> ApiResult<()> {
        self.fetch(
            categories_request,
            "category",
            self.api().get_category_by_slug(slug),
            |s, category| s.categories.set_current(category),
        )
        .await
    }

    pub async fn fetch_category_tree(&self) -> ApiResult<()> {
        self.fetch(categories_request, "tree", self.api().get_category_tree(), |s, tree| {
            s.categories.set_tree(tree)
        })
        .await
    }

    pub async fn create_category(&self, request: CreateCategoryRequest) -> ApiResult<Category> {
        self.mutate(
            categories_request,
            "create_category",
            self.api().create_category(&request),
            |s, category: Category| {
                s.categories.upsert(category.clone());
                category
            },
        )
        .await
    }

    pub async fn update_category(&self, id: i64, request: UpdateCategoryRequest) -> ApiResult<Category> {
        self.mutate(
            categories_request,
            "update_category",
            self.api().update_category(id, &request),
            |s, category: Category| {
                s.categories.upsert(category.clone());
                category
            },
        )
        .await
    }

    pub async fn delete_category(&self, id: i64) -> ApiResult<()> {
        self.mutate(categories_request, "delete_category", self.api().delete_category(id), |s, ()| {
            s.categories.removed(id)
        })
        .await
    }
}
