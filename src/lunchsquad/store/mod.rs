//! # Storage Layer
//!
//! Orders and votes are stored as JSON values under session-scoped keys
//! (`{session}.orders`, `{session}.votes`) in a [`StorageBackend`].
//!
//! ## Two Tiers
//!
//! [`Tiered`] puts a fast cache in front of a durable backend:
//!
//! - **Reads** try the cache, then the durable tier. A durable hit is copied
//!   back into the cache (read-repair). A value that does not decode counts
//!   as a miss at that tier.
//! - **Writes** go to both tiers before the operation returns
//!   (write-through). A durable failure is logged and the value stays in the
//!   cache; the key is then marked stale so the old durable copy is never
//!   read back over newer data. A failed cache write marks the cached copy
//!   stale the same way.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one pretty-printed `{key}.json` per key, written atomically.
//! - [`mem_backend::MemBackend`]: in-memory, with write-failure simulation for tests.
//!
//! ## Storage Layout
//!
//! ```text
//! $LUNCHSQUAD_HOME/
//! ├── config.json
//! ├── default.orders.json      # durable tier
//! ├── default.votes.json
//! └── cache/default/
//!     └── default.orders.json  # cache tier
//! ```
//!
//! ## Limitations
//!
//! There is one writer per process and no conflict detection. When several
//! processes share a data directory, the last write wins.

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod order_store;
pub mod tiered;

pub use backend::StorageBackend;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
pub use order_store::{ClearHook, OrderStore};
pub use tiered::{Fetched, Persisted, Tiered};
