/// Per-cell metadata cache for one page session
///
/// Successful fetches are kept for the whole session. A key with a fetch
/// in flight is marked pending so a second request does not fetch again.
/// Failures are never stored: the pending mark is dropped and the next
/// request for that key fetches afresh.
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::content::data::{CellKey, ItemMetadata};
use crate::error::FetchError;

#[derive(Debug)]
enum Entry {
    Pending,
    Ready(Arc<ItemMetadata>),
}

/// Answer to a cache request
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Fetched earlier in this session
    Ready(Arc<ItemMetadata>),
    /// First request: the caller must fetch and then `settle`
    Fetch,
    /// A fetch for this key is already in flight
    InFlight,
}

#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: HashMap<CellKey, Entry>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `key`, marking it pending when the caller has to fetch
    pub fn request(&mut self, key: &CellKey) -> Lookup {
        match self.entries.get(key) {
            Some(Entry::Ready(metadata)) => Lookup::Ready(Arc::clone(metadata)),
            Some(Entry::Pending) => Lookup::InFlight,
            None => {
                self.entries.insert(key.clone(), Entry::Pending);
                Lookup::Fetch
            }
        }
    }

    /// Record the outcome of a fetch for `key`
    ///
    /// Returns the stored metadata, or `None` for a failure.
    pub fn settle(
        &mut self,
        key: &CellKey,
        result: Result<ItemMetadata, FetchError>,
    ) -> Option<Arc<ItemMetadata>> {
        match result {
            Ok(metadata) => {
                let metadata = Arc::new(metadata);
                self.entries
                    .insert(key.clone(), Entry::Ready(Arc::clone(&metadata)));
                Some(metadata)
            }
            Err(e) => {
                warn!(cell = %key, error = %e, "error loading metadata");
                self.entries.remove(key);
                None
            }
        }
    }

    /// Settled metadata for `key`, without marking anything pending
    pub fn get(&self, key: &CellKey) -> Option<Arc<ItemMetadata>> {
        match self.entries.get(key) {
            Some(Entry::Ready(metadata)) => Some(Arc::clone(metadata)),
            _ => None,
        }
    }

    /// Number of settled entries
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| matches!(entry, Entry::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::data::FocalPoint;

    fn metadata(id: &str) -> ItemMetadata {
        ItemMetadata {
            id: id.to_string(),
            title: id.to_string(),
            focal_point: FocalPoint { x: 25.0, y: 75.0 },
            path: None,
            thumbnail: None,
            fullscreen: None,
            details: None,
            metadata: None,
        }
    }

    fn unavailable() -> FetchError {
        FetchError::Unavailable {
            url: "/lager/item-1/metadata.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "404"),
        }
    }

    #[test]
    fn concurrent_requests_fetch_once() {
        let mut cache = MetadataCache::new();
        let key = CellKey::new(0, 0);

        assert_eq!(cache.request(&key), Lookup::Fetch);
        assert_eq!(cache.request(&key), Lookup::InFlight);

        cache.settle(&key, Ok(metadata("item-1")));
        assert!(matches!(cache.request(&key), Lookup::Ready(m) if m.id == "item-1"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = MetadataCache::new();
        let key = CellKey::new(1, 0);

        assert_eq!(cache.request(&key), Lookup::Fetch);
        assert!(cache.settle(&key, Err(unavailable())).is_none());
        assert!(cache.is_empty());
        assert_eq!(cache.request(&key), Lookup::Fetch);
    }

    #[test]
    fn keys_are_independent() {
        let mut cache = MetadataCache::new();
        let a = CellKey::new(0, 0);
        let b = CellKey::new(0, 1);

        assert_eq!(cache.request(&a), Lookup::Fetch);
        assert_eq!(cache.request(&b), Lookup::Fetch);
        cache.settle(&b, Ok(metadata("item-3")));
        assert!(cache.get(&a).is_none());
        assert_eq!(cache.get(&b).unwrap().id, "item-3");
    }
}
