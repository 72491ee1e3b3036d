//! Download cache for registry bundles

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// How long downloaded bundles stay fresh
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Key/value store for downloaded bytes
pub trait Cache: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn put(&self, key: &str, value: Vec<u8>, ttl: Duration);
}

/// In-memory cache with per-entry expiry
#[derive(Debug, Default)]
pub struct TimedCache {
    entries: Mutex<HashMap<String, (Instant, Vec<u8>)>>,
}

impl TimedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until the next sweep
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for TimedCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut entries = self.entries.lock().ok()?;
        let (expires, value) = entries.get(key)?;
        if *expires > Instant::now() {
            return Some(value.clone());
        }
        tracing::debug!("Cache entry for {} expired", key);
        entries.remove(key);
        None
    }

    fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        if let Ok(mut entries) = self.entries.lock() {
            let now = Instant::now();
            entries.retain(|_, (expires, _)| *expires > now);
            entries.insert(key.to_string(), (now + ttl, value));
        }
    }
}

/// Cache that never stores anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl Cache for NoCache {
    fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    fn put(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_cache_roundtrip() {
        let cache = TimedCache::new();
        cache.put("a", vec![1, 2, 3], DEFAULT_TTL);
        assert_eq!(cache.get("a"), Some(vec![1, 2, 3]));
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_timed_cache_expires() {
        let cache = TimedCache::new();
        cache.put("a", vec![1], Duration::ZERO);
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_put_sweeps_expired_entries() {
        let cache = TimedCache::new();
        cache.put("stale-1", vec![1], Duration::ZERO);
        cache.put("stale-2", vec![2], Duration::ZERO);
        cache.put("fresh", vec![3], DEFAULT_TTL);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("fresh"), Some(vec![3]));
    }

    #[test]
    fn test_no_cache() {
        let cache = NoCache;
        cache.put("a", vec![1], DEFAULT_TTL);
        assert_eq!(cache.get("a"), None);
    }
}
