use crate::error::Result;
use serde_json::Value;
use std::collections::BTreeSet;

/// Abstract interface for raw key-value storage.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while OrderStore handles the "what" (validation, stamping, hooks).
///
/// Methods take `&self`; implementations use interior mutability since
/// lunchsquad is single-threaded.
pub trait StorageBackend {
    /// Returns Ok(None) if nothing is stored under `key`.
    /// Returns Err only on actual I/O or decode errors.
    fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value.
    /// MUST NOT leave a partially written value behind.
    fn save(&self, key: &str, value: &Value) -> Result<()>;

    /// Returns whether something was actually removed.
    fn delete(&self, key: &str) -> Result<bool>;

    fn list_keys(&self) -> Result<BTreeSet<String>>;
}

impl<T: StorageBackend + ?Sized> StorageBackend for &T {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        (**self).save(key, value)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        (**self).delete(key)
    }

    fn list_keys(&self) -> Result<BTreeSet<String>> {
        (**self).list_keys()
    }
}
