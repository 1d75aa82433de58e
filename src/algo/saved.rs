//! Persistence collaborator: bookmarks, the visitor counter, and the
//! content-warning gate.

use crate::error::Result;

use super::filter::SavedSet;

/// Backing store for state that outlives a session.
pub trait ArchiveStore {
    fn load_saved_ids(&self) -> Result<SavedSet>;
    fn save_saved_ids(&mut self, ids: &SavedSet) -> Result<()>;
    fn load_visitor_count(&self) -> Result<u64>;
    /// Bump the counter and return the new value.
    fn increment_visitor_count(&mut self) -> Result<u64>;
    fn warning_accepted(&self) -> Result<bool>;
    /// Record acceptance of the content warning. The first acceptance counts
    /// as a visit; repeated calls do not.
    fn accept_warning(&mut self) -> Result<u64>;
}

/// Flip `id` in a bookmark set. Returns `true` if it is now present.
pub fn toggle_id(ids: &mut SavedSet, id: &str) -> bool {
    if ids.remove(id) {
        false
    } else {
        ids.insert(id.to_string());
        true
    }
}

/// Flip a bookmark. Returns `true` if the case is now saved.
pub fn toggle_saved<S: ArchiveStore + ?Sized>(store: &mut S, id: &str) -> Result<bool> {
    let mut ids = store.load_saved_ids()?;
    let now_saved = toggle_id(&mut ids, id);
    store.save_saved_ids(&ids)?;
    tracing::debug!(id, saved = now_saved, "toggled bookmark");
    Ok(now_saved)
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: SavedSet,
    visitors: u64,
    warning_accepted: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArchiveStore for MemoryStore {
    fn load_saved_ids(&self) -> Result<SavedSet> {
        Ok(self.saved.clone())
    }

    fn save_saved_ids(&mut self, ids: &SavedSet) -> Result<()> {
        self.saved = ids.clone();
        Ok(())
    }

    fn load_visitor_count(&self) -> Result<u64> {
        Ok(self.visitors)
    }

    fn increment_visitor_count(&mut self) -> Result<u64> {
        self.visitors += 1;
        Ok(self.visitors)
    }

    fn warning_accepted(&self) -> Result<bool> {
        Ok(self.warning_accepted)
    }

    fn accept_warning(&mut self) -> Result<u64> {
        if self.warning_accepted {
            return Ok(self.visitors);
        }
        self.warning_accepted = true;
        self.increment_visitor_count()
    }
}
