//! In-session request cache and in-flight deduplication.
//!
//! Entries are keyed by the full request input so a result can never be
//! served for a different query or coordinate pair. Nothing is persisted.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::time::{Duration, Instant};

use crate::types::Coordinates;

/// Hashable identity of a coordinate pair (exact bit pattern)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateKey {
    latitude_bits: u64,
    longitude_bits: u64,
}

impl From<Coordinates> for CoordinateKey {
    fn from(coordinates: Coordinates) -> Self {
        Self {
            latitude_bits: coordinates.latitude.to_bits(),
            longitude_bits: coordinates.longitude.to_bits(),
        }
    }
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct RequestCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    in_flight: HashSet<K>,
    ttl: Option<Duration>,
}

impl<K, V> RequestCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// `ttl` of `None` keeps entries for the whole session.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            in_flight: HashSet::new(),
            ttl,
        }
    }

    /// Fresh cached value for `key`, if any
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &K, now: Instant) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| &entry.value)
    }

    /// Store a result and clear the in-flight mark for `key`.
    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    /// Store a result as of `now`. Expired entries are dropped first.
    pub fn insert_at(&mut self, key: K, value: V, now: Instant) {
        self.in_flight.remove(&key);
        if let Some(ttl) = self.ttl {
            self.entries
                .retain(|_, entry| now.saturating_duration_since(entry.stored_at) < ttl);
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
            },
        );
    }

    /// Mark a request as started. Returns false if one is already running.
    pub fn begin(&mut self, key: K) -> bool {
        self.in_flight.insert(key)
    }

    /// Clear the in-flight mark without storing anything (failed requests).
    pub fn abandon(&mut self, key: &K) {
        self.in_flight.remove(key);
    }

    fn is_expired(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.saturating_duration_since(entry.stored_at) >= ttl)
    }
}
