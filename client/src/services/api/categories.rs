//! # Category Endpoints
//!
//! Reads are public; create, update and delete are admin-only on the server.

use shared::{
    CategoriesResponse, Category, CategoryEnvelope, CategoryFilters, CategoryTreeEntry,
    CategoryTreeResponse, CreateCategoryRequest, UpdateCategoryRequest,
};

use super::client::ApiClient;
use crate::core::error::ApiResult;

pub async fn get_categories(client: &ApiClient, filters: &CategoryFilters) -> ApiResult<Vec<Category>> {
    let response: CategoriesResponse = client.send_json(client.get("/categories").query(filters)).await?;
    Ok(response.categories)
}

pub async fn get_category(client: &ApiClient, id: i64) -> ApiResult<Category> {
    let envelope: CategoryEnvelope = client.send_json(client.get(&format!("/categories/{id}"))).await?;
    Ok(envelope.category)
}

pub async fn get_category_by_slug(client: &ApiClient, slug: &str) -> ApiResult<Category> {
    let envelope: CategoryEnvelope = client
        .send_json(client.get(&format!("/categories/slug/{}", ApiClient::segment(slug))))
        .await?;
    Ok(envelope.category)
}

pub async fn get_category_tree(client: &ApiClient) -> ApiResult<Vec<CategoryTreeEntry>> {
    let response: CategoryTreeResponse = client.send_json(client.get("/categories/tree")).await?;
    Ok(response.category_tree)
}

pub async fn create_category(client: &ApiClient, request: &CreateCategoryRequest) -> ApiResult<Category> {
    let envelope: CategoryEnvelope = client.send_json(client.post("/categories").json(request)).await?;
    tracing::info!(category_id = envelope.category.id, slug = %envelope.category.slug, "Category created");
    Ok(envelope.category)
}

pub async fn update_category(
    client: &ApiClient,
    id: i64,
    request: &UpdateCategoryRequest,
) -> ApiResult<Category> {
    let envelope: CategoryEnvelope = client
        .send_json(client.put(&format!("/categories/{id}")).json(request))
        .await?;
    Ok(envelope.category)
}

pub async fn delete_category(client: &ApiClient, id: i64) -> ApiResult<()> {
    client.send_empty(client.delete(&format!("/categories/{id}"))).await
}
