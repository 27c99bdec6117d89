//! # Listing Actions

use shared::{
    CreateListingRequest, Listing, ListingFilters, PageQuery, UpdateListingRequest, UploadedImages,
};

use crate::app::state::{AppState, RequestState};
use crate::app::Store;
use crate::config::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::core::error::ApiResult;
use crate::services::api::ImageUpload;

fn listings_request(state: &mut AppState) -> &mut RequestState {
    &mut state.listings.request
}

/// Fill in paging defaults and cap the page size.
fn normalize_page(page: Option<u32>, limit: Option<u32>) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
    (page, limit)
}

impl Store {
    /// Load one search page. A page past the end is an empty result, not an
    /// error.
    pub async fn fetch_listings(&self, mut filters: ListingFilters) -> ApiResult<()> {
        let (page, limit) = normalize_page(filters.page, filters.limit);
        filters.page = Some(page);
        filters.limit = Some(limit);

        self.fetch(listings_request, "listings", self.api().get_listings(&filters), |s, response| {
            s.listings.set_page(filters.clone(), response)
        })
        .await
    }

    pub async fn fetch_listing(&self, id: i64) -> ApiResult<()> {
        self.fetch(listings_request, "listing", self.api().get_listing(id), |s, listing| {
            s.listings.set_current(listing)
        })
        .await
    }

    pub async fn fetch_user_listings(&self, page: PageQuery) -> ApiResult<()> {
        let (p, limit) = normalize_page(page.page, page.limit);
        let query = PageQuery::new(p, limit);
        self.fetch(
            listings_request,
            "user_listings",
            self.api().get_user_listings(&query),
            |s, response| s.listings.set_user_page(response),
        )
        .await
    }

    pub async fn create_listing(&self, request: CreateListingRequest) -> ApiResult<Listing> {
        self.mutate(
            listings_request,
            "create_listing",
            self.api().create_listing(&request),
            |s, listing: Listing| {
                s.listings.created(listing.clone());
                listing
            },
        )
        .await
    }

    /// The server's copy replaces the cached one everywhere it is shown.
    pub async fn update_listing(&self, id: i64, patch: UpdateListingRequest) -> ApiResult<Listing> {
        self.mutate(
            listings_request,
            "update_listing",
            self.api().update_listing(id, &patch),
            |s, listing: Listing| {
                s.listings.updated(listing.clone());
                listing
            },
        )
        .await
    }

    pub async fn delete_listing(&self, id: i64) -> ApiResult<()> {
        self.mutate(listings_request, "delete_listing", self.api().delete_listing(id), |s, ()| {
            s.listings.removed(id)
        })
        .await
    }

    /// Upload images for a listing form; returns their URLs.
    pub async fn upload_listing_images(&self, images: Vec<ImageUpload>) -> ApiResult<Vec<String>> {
        self.mutate(listings_request, "upload_images", self.api().upload_images(images), |_, uploaded: UploadedImages| {
            uploaded.urls
        })
        .await
    }

    pub fn clear_current_listing(&self) {
        self.update(|s| s.listings.clear_current());
    }
}
