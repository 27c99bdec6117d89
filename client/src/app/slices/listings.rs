//! # Listings Slice
//!
//! Listings are stored once by id. The search results, the user's own
//! listings and the detail view hold ids into that map, so an update shows up
//! everywhere the listing is visible.

use std::collections::{HashMap, HashSet};

use shared::{Listing, ListingFilters, ListingsResponse, PageMeta};

use crate::app::state::RequestState;

#[derive(Debug, Clone, Default)]
pub struct ListingsSlice {
    pub entities: HashMap<i64, Listing>,
    /// Current search page.
    pub order: Vec<i64>,
    pub meta: Option<PageMeta>,
    pub filters: ListingFilters,
    /// The signed-in user's listings.
    pub user_order: Vec<i64>,
    pub user_meta: Option<PageMeta>,
    pub current: Option<i64>,
    pub request: RequestState,
}

impl ListingsSlice {
    pub fn set_page(&mut self, filters: ListingFilters, response: ListingsResponse) {
        self.order = response.listings.iter().map(|l| l.id).collect();
        self.meta = Some(response.meta);
        self.filters = filters;
        self.upsert_all(response.listings);
        self.prune();
    }

    pub fn set_user_page(&mut self, response: ListingsResponse) {
        self.user_order = response.listings.iter().map(|l| l.id).collect();
        self.user_meta = Some(response.meta);
        self.upsert_all(response.listings);
        self.prune();
    }

    pub fn set_current(&mut self, listing: Listing) {
        self.current = Some(listing.id);
        self.entities.insert(listing.id, listing);
    }

    pub fn clear_current(&mut self) {
        self.current = None;
        self.prune();
    }

    /// A freshly created listing goes to the front of both lists.
    pub fn created(&mut self, listing: Listing) {
        let id = listing.id;
        self.entities.insert(id, listing);
        self.order.retain(|x| *x != id);
        self.order.insert(0, id);
        self.user_order.retain(|x| *x != id);
        self.user_order.insert(0, id);
    }

    /// Server fields replace the cached entity wholesale.
    pub fn updated(&mut self, listing: Listing) {
        self.entities.insert(listing.id, listing);
    }

    pub fn removed(&mut self, id: i64) {
        self.entities.remove(&id);
        let before = self.order.len();
        self.order.retain(|x| *x != id);
        if self.order.len() != before {
            if let Some(meta) = self.meta.as_mut() {
                *meta = PageMeta::new(meta.page, meta.limit, meta.total.saturating_sub(1));
            }
        }
        self.user_order.retain(|x| *x != id);
        if self.current == Some(id) {
            self.current = None;
        }
    }

    pub fn clear_user_listings(&mut self) {
        self.user_order.clear();
        self.user_meta = None;
        self.prune();
    }

    pub fn get(&self, id: i64) -> Option<&Listing> {
        self.entities.get(&id)
    }

    pub fn visible(&self) -> Vec<&Listing> {
        self.resolve(&self.order)
    }

    pub fn user_listings(&self) -> Vec<&Listing> {
        self.resolve(&self.user_order)
    }

    pub fn current(&self) -> Option<&Listing> {
        self.current.and_then(|id| self.entities.get(&id))
    }

    fn resolve(&self, ids: &[i64]) -> Vec<&Listing> {
        ids.iter().filter_map(|id| self.entities.get(id)).collect()
    }

    fn upsert_all(&mut self, listings: Vec<Listing>) {
        for listing in listings {
            self.entities.insert(listing.id, listing);
        }
    }

    /// Forget entities no view refers to any more.
    fn prune(&mut self) {
        let referenced: HashSet<i64> = self
            .order
            .iter()
            .chain(self.user_order.iter())
            .chain(self.current.iter())
            .copied()
            .collect();
        self.entities.retain(|id, _| referenced.contains(id));
    }
}
