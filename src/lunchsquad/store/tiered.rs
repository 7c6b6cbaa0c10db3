use super::backend::StorageBackend;
use crate::error::{LunchError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeSet;
use tracing::{debug, error, warn};

/// Where the last write of a value ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persisted {
    /// Both tiers accepted the write.
    Durable,
    /// The durable tier failed; the value only lives in the cache.
    CacheOnly,
    /// Neither tier accepted the write; the value only lives in memory.
    NotSaved,
}

/// Result of a layered lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Cache(T),
    /// Found in the durable tier and copied back into the cache.
    Durable(T),
    Miss,
}

impl<T> Fetched<T> {
    pub fn into_value(self) -> Option<T> {
        match self {
            Fetched::Cache(v) | Fetched::Durable(v) => Some(v),
            Fetched::Miss => None,
        }
    }
}

/// A fast cache tier in front of a durable tier.
///
/// Reads try the cache first and fall back to the durable tier, repairing the
/// cache on the way. Writes go to both. A failed write marks that key stale
/// at the tier that failed: until a write to that tier succeeds again,
/// lookups never return its old copy.
pub struct Tiered<C, D> {
    cache: C,
    durable: D,
    stale_cache: RefCell<BTreeSet<String>>,
    stale_durable: RefCell<BTreeSet<String>>,
}

impl<C: StorageBackend, D: StorageBackend> Tiered<C, D> {
    pub fn new(cache: C, durable: D) -> Self {
        Self {
            cache,
            durable,
            stale_cache: RefCell::new(BTreeSet::new()),
            stale_durable: RefCell::new(BTreeSet::new()),
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn durable(&self) -> &D {
        &self.durable
    }

    /// True once a durable write for `key` has failed and not yet been redone.
    pub fn durable_stale(&self, key: &str) -> bool {
        self.stale_durable.borrow().contains(key)
    }

    /// True once a cache write for `key` has failed and not yet been redone.
    pub fn cache_stale(&self, key: &str) -> bool {
        self.stale_cache.borrow().contains(key)
    }

    /// Layered lookup with decoding. A value that does not decode counts as a
    /// miss at that tier.
    pub fn fetch<T: DeserializeOwned>(&self, key: &str) -> Fetched<T> {
        if self.cache_stale(key) {
            debug!(key, "cache copy is stale, not reading it");
        } else {
            match self.cache.load(key) {
                Ok(Some(raw)) => match serde_json::from_value::<T>(raw) {
                    Ok(value) => {
                        debug!(key, "cache hit");
                        return Fetched::Cache(value);
                    }
                    Err(e) => warn!(key, error = %e, "cached value does not decode, ignoring"),
                },
                Ok(None) => debug!(key, "cache miss"),
                Err(e) => warn!(key, error = %e, "cache read failed"),
            }
        }

        if self.durable_stale(key) {
            debug!(key, "durable copy is stale, not reading it");
            return Fetched::Miss;
        }

        let raw = match self.durable.load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "durable miss");
                return Fetched::Miss;
            }
            Err(e) => {
                warn!(key, error = %e, "durable read failed");
                return Fetched::Miss;
            }
        };

        match serde_json::from_value::<T>(raw.clone()) {
            Ok(value) => {
                match self.cache.save(key, &raw) {
                    Ok(()) => {
                        self.stale_cache.borrow_mut().remove(key);
                        debug!(key, "read-repair: copied durable value into cache");
                    }
                    Err(e) => warn!(key, error = %e, "read-repair failed"),
                }
                Fetched::Durable(value)
            }
            Err(e) => {
                warn!(key, error = %e, "durable value does not decode, ignoring");
                Fetched::Miss
            }
        }
    }

    /// Write to both tiers. Never fails; the outcome says how far the value got.
    pub fn write_through(&self, key: &str, value: &Value) -> Persisted {
        let durable_ok = match self.durable.save(key, value) {
            Ok(()) => {
                self.stale_durable.borrow_mut().remove(key);
                true
            }
            Err(e) => {
                warn!(key, error = %e, "durable write failed, keeping value in cache only");
                self.stale_durable.borrow_mut().insert(key.to_string());
                false
            }
        };

        let cache_ok = match self.cache.save(key, value) {
            Ok(()) => {
                self.stale_cache.borrow_mut().remove(key);
                true
            }
            Err(e) => {
                warn!(key, error = %e, "cache write failed, ignoring cached copy until rewritten");
                self.stale_cache.borrow_mut().insert(key.to_string());
                match self.cache.delete(key) {
                    Ok(_) => debug!(key, "dropped outdated cache entry"),
                    Err(e) => warn!(key, error = %e, "could not drop outdated cache entry"),
                }
                false
            }
        };

        match (durable_ok, cache_ok) {
            (true, _) => Persisted::Durable,
            (false, true) => Persisted::CacheOnly,
            (false, false) => {
                error!(key, "write failed on both tiers, value is only in memory");
                Persisted::NotSaved
            }
        }
    }
}

impl<C: StorageBackend, D: StorageBackend> StorageBackend for Tiered<C, D> {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.fetch::<Value>(key).into_value())
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        match self.write_through(key, value) {
            Persisted::NotSaved => Err(LunchError::Store(format!(
                "Could not save {} to any storage tier",
                key
            ))),
            _ => Ok(()),
        }
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let durable = match self.durable.delete(key) {
            Ok(removed) => {
                self.stale_durable.borrow_mut().remove(key);
                Some(removed)
            }
            Err(e) => {
                warn!(key, error = %e, "durable delete failed");
                self.stale_durable.borrow_mut().insert(key.to_string());
                None
            }
        };
        let cache = match self.cache.delete(key) {
            Ok(removed) => {
                self.stale_cache.borrow_mut().remove(key);
                Some(removed)
            }
            Err(e) => {
                warn!(key, error = %e, "cache delete failed");
                self.stale_cache.borrow_mut().insert(key.to_string());
                None
            }
        };
        match (cache, durable) {
            (None, None) => Err(LunchError::Store(format!("Could not delete {}", key))),
            (c, d) => Ok(c.unwrap_or(false) || d.unwrap_or(false)),
        }
    }

    fn list_keys(&self) -> Result<BTreeSet<String>> {
        let mut keys = self.cache.list_keys()?;
        match self.durable.list_keys() {
            Ok(durable) => keys.extend(durable),
            Err(e) => warn!(error = %e, "could not list durable keys"),
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use serde_json::json;

    fn tiers() -> Tiered<MemBackend, MemBackend> {
        crate::logging::init_test();
        Tiered::new(MemBackend::new(), MemBackend::new())
    }

    #[test]
    fn test_read_repair_fills_cache() {
        let t = tiers();
        t.durable().save("s.orders", &json!([1])).unwrap();

        assert_eq!(t.fetch::<Vec<u8>>("s.orders"), Fetched::Durable(vec![1]));
        assert_eq!(t.cache().load("s.orders").unwrap(), Some(json!([1])));
        assert_eq!(t.fetch::<Vec<u8>>("s.orders"), Fetched::Cache(vec![1]));
    }

    #[test]
    fn test_undecodable_cache_falls_through() {
        let t = tiers();
        t.cache().save("s.orders", &json!("garbage")).unwrap();
        t.durable().save("s.orders", &json!([2])).unwrap();

        assert_eq!(t.fetch::<Vec<u8>>("s.orders"), Fetched::Durable(vec![2]));
        // repaired over the bad entry
        assert_eq!(t.cache().load("s.orders").unwrap(), Some(json!([2])));
    }

    #[test]
    fn test_miss_on_both_tiers() {
        let t = tiers();
        assert_eq!(t.fetch::<Vec<u8>>("s.orders"), Fetched::Miss);
        t.durable().save("s.orders", &json!({"not": "a list"})).unwrap();
        assert_eq!(t.fetch::<Vec<u8>>("s.orders"), Fetched::Miss);
    }

    #[test]
    fn test_write_through_outcomes() {
        let t = tiers();
        assert_eq!(t.write_through("k", &json!(1)), Persisted::Durable);
        assert_eq!(t.durable().load("k").unwrap(), Some(json!(1)));

        t.durable().set_simulate_write_error(true);
        assert_eq!(t.write_through("k", &json!(2)), Persisted::CacheOnly);
        assert!(t.durable_stale("k"));

        t.cache().set_simulate_write_error(true);
        assert_eq!(t.write_through("k", &json!(3)), Persisted::NotSaved);
        assert!(t.save("k", &json!(3)).is_err());

        t.cache().set_simulate_write_error(false);
        t.durable().set_simulate_write_error(false);
        assert_eq!(t.write_through("k", &json!(4)), Persisted::Durable);
        assert!(!t.durable_stale("k"));
    }

    #[test]
    fn test_stale_durable_copy_is_never_read_back() {
        let t = tiers();
        assert_eq!(t.write_through("k", &json!([1])), Persisted::Durable);
        t.durable().set_simulate_write_error(true);
        assert_eq!(t.write_through("k", &json!([1, 2])), Persisted::CacheOnly);

        // cache lost, durable still holds the old list
        t.cache().delete("k").unwrap();
        assert_eq!(t.fetch::<Vec<u8>>("k"), Fetched::Miss);
    }

    #[test]
    fn test_cache_failure_still_counts_as_durable() {
        let t = tiers();
        t.write_through("k", &json!(1));
        t.cache().set_simulate_write_error(true);
        assert_eq!(t.write_through("k", &json!(2)), Persisted::Durable);
        assert_eq!(t.durable().load("k").unwrap(), Some(json!(2)));
        assert!(!t.durable_stale("k"));
    }

    #[test]
    fn test_outdated_cache_entry_is_skipped_until_rewritten() {
        let t = tiers();
        t.write_through("k", &json!([1]));

        // save and delete both fail, so the old entry stays in the cache
        t.cache().set_simulate_write_error(true);
        assert_eq!(t.write_through("k", &json!([1, 2])), Persisted::Durable);
        assert!(t.cache_stale("k"));
        assert_eq!(t.cache().load("k").unwrap(), Some(json!([1])));
        assert_eq!(t.fetch::<Vec<u8>>("k"), Fetched::Durable(vec![1, 2]));

        t.cache().set_simulate_write_error(false);
        assert_eq!(t.fetch::<Vec<u8>>("k"), Fetched::Durable(vec![1, 2]));
        assert!(!t.cache_stale("k"));
        assert_eq!(t.fetch::<Vec<u8>>("k"), Fetched::Cache(vec![1, 2]));
    }

    #[test]
    fn test_nothing_is_read_back_after_both_tiers_fail() {
        let t = tiers();
        t.write_through("k", &json!([1]));

        t.cache().set_simulate_write_error(true);
        t.durable().set_simulate_write_error(true);
        assert_eq!(t.write_through("k", &json!([1, 2])), Persisted::NotSaved);
        assert_eq!(t.fetch::<Vec<u8>>("k"), Fetched::Miss);
    }

    #[test]
    fn test_delete_and_list_keys() {
        let t = tiers();
        t.write_through("a.orders", &json!([]));
        t.durable().save("b.votes", &json!({})).unwrap();

        let keys: Vec<String> = t.list_keys().unwrap().into_iter().collect();
        assert_eq!(keys, vec!["a.orders".to_string(), "b.votes".to_string()]);

        assert!(t.delete("a.orders").unwrap());
        assert!(!t.delete("a.orders").unwrap());
        assert_eq!(t.load("a.orders").unwrap(), None);
    }
}
