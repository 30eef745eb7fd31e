//! Bounded in-memory cache with per-entry metadata and an explicit eviction policy.
//!
//! Entries carry their insertion instant (for TTL and FIFO) and a monotonically
//! increasing access tick (for LRU). Eviction scans for a single victim; capacities
//! here are small enough that a linear scan is fine.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Evict the entry that was read or written least recently.
    Lru,
    /// Evict the entry that was inserted first.
    Fifo,
}

impl EvictionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionPolicy::Lru => "lru",
            EvictionPolicy::Fifo => "fifo",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    last_access: u64,
}

#[derive(Debug)]
pub struct BoundedCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    capacity: usize,
    ttl: Option<Duration>,
    policy: EvictionPolicy,
    tick: u64,
    stats: CacheStats,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// A zero-capacity cache accepts inserts but stores nothing.
    pub fn new(capacity: usize, ttl: Option<Duration>, policy: EvictionPolicy) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            capacity,
            ttl,
            policy,
            tick: 0,
            stats: CacheStats::default(),
        }
    }

    /// Returns a clone of the cached value. Expired entries are dropped and count as misses.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            None => {
                self.stats.misses += 1;
                return None;
            }
            Some(entry) => self.is_expired(entry, now),
        };

        if expired {
            self.entries.remove(key);
            self.stats.misses += 1;
            return None;
        }

        self.tick += 1;
        let tick = self.tick;
        let entry = self.entries.get_mut(key)?;
        entry.last_access = tick;
        self.stats.hits += 1;
        Some(entry.value.clone())
    }

    /// Inserts or replaces a value. Evicts one entry per the policy when full.
    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }

        let now = Instant::now();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.purge_expired();
            if self.entries.len() >= self.capacity {
                self.evict_one();
            }
        }

        self.tick += 1;
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
                last_access: self.tick,
            },
        );
    }

    #[allow(dead_code)]
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|e| e.value)
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let Some(ttl) = self.ttl else {
            return 0;
        };
        let now = Instant::now();
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.duration_since(entry.inserted_at) < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[allow(dead_code)]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn is_expired(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        self.ttl
            .map(|ttl| now.duration_since(entry.inserted_at) >= ttl)
            .unwrap_or(false)
    }

    fn evict_one(&mut self) {
        let victim = match self.policy {
            EvictionPolicy::Lru => self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_access)
                .map(|(k, _)| k.clone()),
            EvictionPolicy::Fifo => self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| k.clone()),
        };

        if let Some(key) = victim {
            self.entries.remove(&key);
            self.stats.evictions += 1;
            tracing::debug!("Cache evicted one entry ({:?})", self.policy);
        }
    }
}
