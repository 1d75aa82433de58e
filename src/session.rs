//! Application state for one browsing session.
//!
//! The session owns the catalog, its facets, the active filter state and the
//! bookmark set. Front ends hold a session value and pass it around; nothing
//! here is global.

use crate::algo::catalog::{Catalog, CatalogOrigin, LoadOutcome};
use crate::algo::facets::{build_facets, Facets};
use crate::algo::filter::{apply_filters, FilterState, SavedSet};
use crate::algo::record::CaseRecord;
use crate::algo::saved::{toggle_id, toggle_saved, ArchiveStore};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct ArchiveSession {
    catalog: Catalog,
    origin: CatalogOrigin,
    facets: Facets,
    pub filters: FilterState,
    saved: SavedSet,
}

impl ArchiveSession {
    pub fn new(outcome: LoadOutcome, saved: SavedSet) -> Self {
        let facets = build_facets(&outcome.catalog);
        Self {
            catalog: outcome.catalog,
            origin: outcome.origin,
            facets,
            filters: FilterState::default(),
            saved,
        }
    }

    /// Start a session with bookmarks read from `store`.
    pub fn with_store(outcome: LoadOutcome, store: &dyn ArchiveStore) -> Result<Self> {
        Ok(Self::new(outcome, store.load_saved_ids()?))
    }

    /// Swap in a freshly loaded catalog. Filters and bookmarks are kept.
    pub fn replace_catalog(&mut self, outcome: LoadOutcome) {
        self.facets = build_facets(&outcome.catalog);
        self.catalog = outcome.catalog;
        self.origin = outcome.origin;
        tracing::debug!(records = self.catalog.len(), origin = ?self.origin, "catalog replaced");
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn origin(&self) -> CatalogOrigin {
        self.origin
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn saved(&self) -> &SavedSet {
        &self.saved
    }

    /// Records passing the current filters, in catalog order.
    pub fn view(&self) -> Vec<&CaseRecord> {
        apply_filters(self.catalog.records(), &self.filters, &self.saved)
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.contains(id)
    }

    /// Flip a bookmark in memory only.
    pub fn toggle_saved(&mut self, id: &str) -> bool {
        toggle_id(&mut self.saved, id)
    }

    /// Flip a bookmark in `store` and adopt the store's bookmark set.
    pub fn toggle_saved_in(&mut self, store: &mut dyn ArchiveStore, id: &str) -> Result<bool> {
        let now_saved = toggle_saved(store, id)?;
        self.saved = store.load_saved_ids()?;
        Ok(now_saved)
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn total_incidents(&self) -> usize {
        self.catalog.len()
    }
}
