use super::backend::StorageBackend;
use super::tiered::{Fetched, Persisted, Tiered};
use crate::catalog::Catalog;
use crate::error::{IndexError, Result, SchemaError};
use crate::model::{Candidate, Order};
use crate::presenter::{self, DisplayRow, OrderFilter, SortKey};
use crate::validate;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, warn};

/// Runs after `clear` with the store's backend, e.g. to drop related keys.
pub type ClearHook = Box<dyn FnMut(&dyn StorageBackend) -> Result<()>>;

/// The authoritative in-memory order list and its persistence.
///
/// Every mutation writes the whole list through both tiers under
/// `"{session}.orders"`. Storage failures never fail an operation; they are
/// logged and reported through [`OrderStore::durability`].
pub struct OrderStore<C, D> {
    backend: Tiered<C, D>,
    catalog: Catalog,
    key: String,
    orders: Vec<Order>,
    persisted: Persisted,
    on_clear: Vec<ClearHook>,
}

impl<C: StorageBackend, D: StorageBackend> OrderStore<C, D> {
    /// Create the store and load the session's orders.
    pub fn open(backend: Tiered<C, D>, catalog: Catalog, session: &str) -> Self {
        let mut store = Self {
            backend,
            catalog,
            key: format!("{}.orders", session),
            orders: Vec::new(),
            persisted: Persisted::Durable,
            on_clear: Vec::new(),
        };
        store.load();
        store
    }

    /// Reload from storage: cache first, then the durable tier, else empty.
    ///
    /// A tier whose last write failed is not read. When that leaves nothing
    /// to read, the in-memory list is kept rather than replaced by an
    /// outdated copy.
    pub fn load(&mut self) -> &[Order] {
        match self.backend.fetch::<Vec<Order>>(&self.key) {
            Fetched::Cache(orders) | Fetched::Durable(orders) => self.orders = orders,
            Fetched::Miss if self.backend.durable_stale(&self.key) => {
                debug!(key = %self.key, "durable copy is stale, keeping in-memory orders");
            }
            Fetched::Miss => self.orders = Vec::new(),
        }
        &self.orders
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn backend(&self) -> &Tiered<C, D> {
        &self.backend
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Where the last write ended up.
    pub fn durability(&self) -> Persisted {
        self.persisted
    }

    pub fn on_clear(&mut self, hook: ClearHook) {
        self.on_clear.push(hook);
    }

    /// Validate, stamp and append a new order.
    pub fn add(&mut self, candidate: &Candidate) -> Result<Order> {
        let meal = validate::check(candidate, &self.catalog)?;

        let now = Utc::now();
        let created_at = match self.orders.last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        };
        let order = Order::new(candidate.submitter.trim(), created_at, meal);
        self.orders.push(order.clone());
        self.persist();
        Ok(order)
    }

    /// Remove the order at a 0-based index.
    pub fn remove_at(&mut self, index: usize) -> Result<Order> {
        if index >= self.orders.len() {
            return Err(IndexError::OutOfBounds {
                index,
                len: self.orders.len(),
            }
            .into());
        }
        let removed = self.orders.remove(index);
        self.persist();
        Ok(removed)
    }

    /// Remove several orders at once. Out-of-range indices are skipped.
    /// Returns how many orders were removed.
    pub fn remove_many(&mut self, indices: &[usize]) -> usize {
        let mut targets: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.orders.len())
            .collect();
        targets.sort_unstable_by(|a, b| b.cmp(a));
        targets.dedup();

        for &i in &targets {
            self.orders.remove(i);
        }
        if !targets.is_empty() {
            self.persist();
        }
        targets.len()
    }

    /// Drop every order, then run the on-clear hooks. Returns how many orders
    /// were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.orders.len();
        self.orders.clear();
        self.persist();

        for hook in self.on_clear.iter_mut() {
            if let Err(e) = hook(&self.backend) {
                warn!(error = %e, "on-clear hook failed");
            }
        }
        count
    }

    /// Replace the whole list. Nothing changes unless every record is well
    /// formed and the timestamps never decrease.
    pub fn replace_all(&mut self, orders: Vec<Order>) -> Result<()> {
        for (index, order) in orders.iter().enumerate() {
            order
                .check_shape(&self.catalog)
                .map_err(|reason| SchemaError::InvalidRecord { index, reason })?;
            if index > 0 && order.created_at < orders[index - 1].created_at {
                return Err(SchemaError::InvalidRecord {
                    index,
                    reason: "createdAt is earlier than the previous record".to_string(),
                }
                .into());
            }
        }
        self.orders = orders;
        self.persist();
        Ok(())
    }

    /// Parse a JSON array of orders and replace the list with it.
    pub fn import_json(&mut self, payload: &str) -> Result<usize> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| SchemaError::Malformed(e.to_string()))?;
        let Value::Array(items) = value else {
            return Err(SchemaError::NotAnArray.into());
        };

        let orders = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<Order>(item).map_err(|e| SchemaError::InvalidRecord {
                    index,
                    reason: e.to_string(),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let count = orders.len();
        self.replace_all(orders)?;
        Ok(count)
    }

    pub fn project(&self, sort: SortKey) -> Vec<DisplayRow> {
        presenter::project(&self.orders, &self.catalog, sort)
    }

    pub fn project_filtered(&self, sort: SortKey, filter: &OrderFilter) -> Vec<DisplayRow> {
        presenter::project_filtered(&self.orders, &self.catalog, sort, filter)
    }

    fn persist(&mut self) {
        self.persisted = match serde_json::to_value(&self.orders) {
            Ok(value) => self.backend.write_through(&self.key, &value),
            Err(e) => {
                error!(error = %e, "could not serialize orders");
                Persisted::NotSaved
            }
        };
    }
}
