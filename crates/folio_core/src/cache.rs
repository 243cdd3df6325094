//! Explicit read cache shared by services within one dashboard session.
//!
//! # Responsibility
//! - Memoize list/fetch results per entity kind.
//! - Drop entries when a mutation touches that entity kind.
//!
//! # Invariants
//! - A key is either absent or holds the last successfully fetched value.
//! - Failed fetches are never cached.
//! - Single-threaded: interior mutability through `RefCell`, no locking.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Cache key, one per queried entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Profile,
    Bio,
    Skills,
    Certificates,
    Projects,
    PortfolioFiles,
    Contacts,
    Analytics,
}

impl QueryKey {
    pub fn label(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Bio => "bio",
            Self::Skills => "skills",
            Self::Certificates => "certificates",
            Self::Projects => "projects",
            Self::PortfolioFiles => "portfolio_files",
            Self::Contacts => "contacts",
            Self::Analytics => "analytics",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: RefCell<HashMap<QueryKey, serde_json::Value>>,
    stats: Cell<CacheStats>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key` or runs `fetch` and caches its
    /// successful result.
    ///
    /// An entry that no longer decodes as `T` counts as a miss.
    pub fn get_or_fetch<T, E, F>(&self, key: QueryKey, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        let cached = self.entries.borrow().get(&key).cloned();
        if let Some(value) = cached {
            match serde_json::from_value::<T>(value) {
                Ok(hit) => {
                    self.bump(|stats| stats.hits += 1);
                    return Ok(hit);
                }
                Err(err) => {
                    warn!(
                        "event=cache_decode module=cache status=error key={} error={}",
                        key.label(),
                        err
                    );
                    self.entries.borrow_mut().remove(&key);
                }
            }
        }

        self.bump(|stats| stats.misses += 1);
        let fresh = fetch()?;
        match serde_json::to_value(&fresh) {
            Ok(value) => {
                self.entries.borrow_mut().insert(key, value);
            }
            Err(err) => warn!(
                "event=cache_store module=cache status=error key={} error={}",
                key.label(),
                err
            ),
        }
        Ok(fresh)
    }

    /// Drops the entry for `key` so the next read observes the store.
    pub fn invalidate(&self, key: QueryKey) {
        if self.entries.borrow_mut().remove(&key).is_some() {
            debug!("event=cache_invalidate module=cache key={}", key.label());
        }
        self.bump(|stats| stats.invalidations += 1);
    }

    pub fn contains(&self, key: QueryKey) -> bool {
        self.entries.borrow().contains_key(&key)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.get()
    }

    fn bump(&self, update: impl FnOnce(&mut CacheStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }
}

#[cfg(test)]
mod tests {
    use super::{QueryCache, QueryKey};

    #[test]
    fn second_read_is_served_from_cache() {
        let cache = QueryCache::new();
        let mut calls = 0;
        let first: Result<Vec<String>, ()> = cache.get_or_fetch(QueryKey::Skills, || {
            calls += 1;
            Ok(vec!["Analytics".to_string()])
        });
        let second: Result<Vec<String>, ()> = cache.get_or_fetch(QueryKey::Skills, || {
            calls += 1;
            Ok(Vec::new())
        });

        assert_eq!(first.unwrap(), second.unwrap());
        assert_eq!(calls, 1);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn invalidate_forces_refetch() {
        let cache = QueryCache::new();
        let _: Result<u32, ()> = cache.get_or_fetch(QueryKey::Bio, || Ok(1));
        cache.invalidate(QueryKey::Bio);
        assert!(!cache.contains(QueryKey::Bio));

        let value: Result<u32, ()> = cache.get_or_fetch(QueryKey::Bio, || Ok(2));
        assert_eq!(value.unwrap(), 2);
    }

    #[test]
    fn failed_fetch_is_not_cached() {
        let cache = QueryCache::new();
        let failed: Result<u32, &str> = cache.get_or_fetch(QueryKey::Contacts, || Err("offline"));
        assert!(failed.is_err());
        assert!(!cache.contains(QueryKey::Contacts));
    }
}
