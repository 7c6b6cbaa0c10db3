//! # Lunchsquad Architecture
//!
//! Lunchsquad collects a team's lunch orders for three restaurants, lets the
//! team review and vote on them, and exports the list for whoever places the
//! order. It is a **library with a CLI client**. The CLI is one way to drive
//! it, not the application itself.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders results, owns stdout/stderr    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (1-based positions → store indices)    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One function per operation, returns CmdResult            │
//! │  - Validation, presentation and export live beside it       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - StorageBackend trait, FsBackend and MemBackend           │
//! │  - Tiered cache + durable store, OrderStore on top          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments and returns Rust types.
//! It never prints, never exits the process and never assumes a terminal.
//! Diagnostics go through `tracing`; only the binary installs a subscriber.
//!
//! ## Testing Strategy
//!
//! 1. **Commands and domain modules**: unit tests against `MemBackend`.
//! 2. **API**: dispatch and input normalization.
//! 3. **CLI**: argument parsing and rendering, plus end-to-end runs of the
//!    binary in `tests/` with `LUNCHSQUAD_HOME` pointed at a temp dir.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Storage backends, the two-tier store and the order list
//! - [`model`]: Orders, meals and form input
//! - [`catalog`]: Restaurant option sets and display labels
//! - [`validate`]: Business rules for new orders
//! - [`presenter`]: Display rows, sorting and filtering
//! - [`report`]: Grouped text and image reports
//! - [`export`]: JSON, CSV, text and PNG export
//! - [`votes`]: Restaurant vote tally
//! - [`index`]: Position selectors (`3`, `2-4`)
//! - [`config`]: Configuration management
//! - [`init`]: Directory resolution and wiring
//! - [`logging`]: `tracing` subscriber setup
//! - [`error`]: Error types
//! - `cli`: Argument parsing and terminal rendering for the binary (not part of the lib API)

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod index;
pub mod init;
pub mod logging;
pub mod model;
pub mod presenter;
pub mod report;
pub mod store;
pub mod validate;
pub mod votes;
