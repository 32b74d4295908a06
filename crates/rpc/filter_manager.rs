//! In-process installed-filter state: a mutex-guarded map cloned into every
//! request's context. Never held across an `.await` — every method here is
//! synchronous; the async
//! work (querying the store for matching blocks/logs) happens in the
//! `eth::filter` handlers, outside the lock.

use gw_codec::{Filter, FilterId, FilterKind};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A filter not polled within this window is pruned by the background
/// sweep — a filter a caller has abandoned should not live forever.
pub const FILTER_DURATION: Duration = Duration::from_secs(5 * 60);

#[derive(Clone)]
pub struct FilterManager {
    filters: Arc<Mutex<HashMap<FilterId, (Instant, Filter)>>>,
}

impl FilterManager {
    pub fn new() -> Self {
        Self { filters: Arc::new(Mutex::new(HashMap::new())) }
    }

    pub fn install(&self, kind: FilterKind, initial_cursor: u64) -> FilterId {
        let filter = Filter::new(kind, initial_cursor);
        let id = filter.id;
        self.filters.lock().expect("filter map lock poisoned").insert(id, (Instant::now(), filter));
        id
    }

    pub fn uninstall(&self, id: FilterId) -> bool {
        self.filters.lock().expect("filter map lock poisoned").remove(&id).is_some()
    }

    /// Returns the filter's current kind and cursor, refreshing its
    /// last-touched time so the cleanup sweep doesn't prune a filter being
    /// actively polled.
    pub fn touch(&self, id: FilterId) -> Option<Filter> {
        let mut filters = self.filters.lock().expect("filter map lock poisoned");
        let (last_touched, filter) = filters.get_mut(&id)?;
        *last_touched = Instant::now();
        Some(filter.clone())
    }

    /// Advances the stored cursor after `getChanges` has read up to
    /// `new_cursor`. Returns `false` if the filter no longer exists
    /// (uninstalled or expired between `touch` and `advance`).
    pub fn advance(&self, id: FilterId, new_cursor: u64) -> bool {
        let mut filters = self.filters.lock().expect("filter map lock poisoned");
        match filters.get_mut(&id) {
            Some((_, filter)) => {
                filter.last_poll = new_cursor;
                true
            }
            None => false,
        }
    }

    pub fn prune_expired(&self) {
        let mut filters = self.filters.lock().expect("filter map lock poisoned");
        filters.retain(|_, (last_touched, _)| last_touched.elapsed() < FILTER_DURATION);
    }
}

impl Default for FilterManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gw_codec::FilterKind;

    #[test]
    fn install_then_uninstall() {
        let manager = FilterManager::new();
        let id = manager.install(FilterKind::BlockFilter, 0);
        assert!(manager.touch(id).is_some());
        assert!(manager.uninstall(id));
        assert!(manager.touch(id).is_none());
    }

    #[test]
    fn advance_updates_cursor() {
        let manager = FilterManager::new();
        let id = manager.install(FilterKind::BlockFilter, 0);
        assert!(manager.advance(id, 10));
        assert_eq!(manager.touch(id).unwrap().last_poll, 10);
    }
}
