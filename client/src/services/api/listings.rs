//! # Listing Endpoints

use reqwest::multipart::Form;
use shared::{
    CreateListingRequest, Listing, ListingEnvelope, ListingFilters, ListingsResponse, PageQuery,
    UpdateListingRequest, UploadedImages,
};

use super::client::ApiClient;
use super::upload::{attach_images, validate_uploads, ImageUpload};
use crate::core::error::ApiResult;

/// Search listings. Only set filters become query parameters.
#[tracing::instrument(skip(client, filters), fields(page = ?filters.page))]
pub async fn get_listings(client: &ApiClient, filters: &ListingFilters) -> ApiResult<ListingsResponse> {
    let response: ListingsResponse = client.send_json(client.get("/listings").query(filters)).await?;
    tracing::debug!(count = response.listings.len(), total = response.meta.total, "Listings loaded");
    Ok(response)
}

pub async fn get_listing(client: &ApiClient, id: i64) -> ApiResult<Listing> {
    let envelope: ListingEnvelope = client.send_json(client.get(&format!("/listings/{id}"))).await?;
    Ok(envelope.listing)
}

pub async fn create_listing(client: &ApiClient, request: &CreateListingRequest) -> ApiResult<Listing> {
    let envelope: ListingEnvelope = client.send_json(client.post("/listings").json(request)).await?;
    tracing::info!(listing_id = envelope.listing.id, "Listing created");
    Ok(envelope.listing)
}

pub async fn update_listing(
    client: &ApiClient,
    id: i64,
    request: &UpdateListingRequest,
) -> ApiResult<Listing> {
    let envelope: ListingEnvelope = client
        .send_json(client.put(&format!("/listings/{id}")).json(request))
        .await?;
    Ok(envelope.listing)
}

pub async fn delete_listing(client: &ApiClient, id: i64) -> ApiResult<()> {
    client.send_empty(client.delete(&format!("/listings/{id}"))).await?;
    tracing::info!(listing_id = id, "Listing deleted");
    Ok(())
}

pub async fn get_user_listings(client: &ApiClient, page: &PageQuery) -> ApiResult<ListingsResponse> {
    client.send_json(client.get("/listings/user/me").query(page)).await
}

/// Upload up to the configured number of images as multipart field `images`.
pub async fn upload_images(client: &ApiClient, images: Vec<ImageUpload>) -> ApiResult<UploadedImages> {
    validate_uploads(&images, &client.uploads, "images")?;
    let count = images.len();
    let form = attach_images(Form::new(), "images", images)?;
    let uploaded: UploadedImages = client.send_json(client.post("/listings/upload").multipart(form)).await?;
    tracing::info!(count, "Images uploaded");
    Ok(uploaded)
}
