//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every lunchsquad operation, whichever UI drives it.
//!
//! The facade:
//! - **Dispatches** to the matching `commands::*` function
//! - **Normalizes inputs**, e.g. turning the 1-based positions a user typed
//!   into store indices
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no terminal I/O and no formatting.
//!
//! `LunchApi<C, D>` is generic over the two storage tiers, so the same code
//! runs on `FsBackend` in production and on `MemBackend` in tests.

use crate::commands::{self, CmdResult, LunchPaths};
use crate::config::LunchConfig;
use crate::error::Result;
use crate::export::ExportFormat;
use crate::index;
use crate::model::{Candidate, Kind};
use crate::presenter::{OrderFilter, SortKey};
use crate::store::{OrderStore, StorageBackend, Tiered};
use crate::votes::VoteTally;
use std::path::Path;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, MessageLevel, StatusReport};

pub struct LunchApi<C, D> {
    store: OrderStore<C, D>,
    config: LunchConfig,
    paths: LunchPaths,
}

impl<C: StorageBackend, D: StorageBackend> LunchApi<C, D> {
    /// Open the configured session on the given tiers. Clearing orders also
    /// resets that session's votes.
    pub fn new(cache: C, durable: D, config: LunchConfig, paths: LunchPaths) -> Self {
        let mut store = OrderStore::open(
            Tiered::new(cache, durable),
            config.catalog.clone(),
            &config.session,
        );
        store.on_clear(VoteTally::reset_hook(&config.session));
        Self {
            store,
            config,
            paths,
        }
    }

    pub fn add_order(&mut self, candidate: &Candidate) -> Result<CmdResult> {
        commands::add::run(&mut self.store, candidate)
    }

    pub fn list_orders(&self, sort: SortKey, filter: &OrderFilter) -> Result<CmdResult> {
        commands::list::run(&self.store, sort, filter)
    }

    /// Remove orders by the 1-based positions shown in listings (`3`, `2-4`).
    pub fn remove_orders<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult> {
        let selectors = index::parse_selectors(selectors)?;
        let indices = index::resolve(&selectors, self.store.len())?;
        commands::remove::run(&mut self.store, &indices)
    }

    pub fn clear_orders(&mut self) -> Result<CmdResult> {
        commands::clear::run(&mut self.store)
    }

    pub fn import_orders(&mut self, path: &Path) -> Result<CmdResult> {
        commands::import::run(&mut self.store, path)
    }

    pub fn export_orders(&self, format: ExportFormat, dir: &Path) -> Result<CmdResult> {
        commands::export::run(&self.store, format, dir, &self.config.font_paths)
    }

    pub fn vote(&mut self, voter: &str, kind: Kind) -> Result<CmdResult> {
        commands::vote::cast(&self.store, &self.config.session, voter, kind)
    }

    pub fn votes(&self) -> Result<CmdResult> {
        commands::vote::show(&self.store, &self.config.session)
    }

    pub fn status(&self) -> Result<CmdResult> {
        commands::status::run(&self.store, &self.paths, &self.config.session)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn store(&self) -> &OrderStore<C, D> {
        &self.store
    }

    pub fn paths(&self) -> &LunchPaths {
        &self.paths
    }

    pub fn current_config(&self) -> &LunchConfig {
        &self.config
    }
}
