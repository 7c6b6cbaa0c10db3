use crate::config::LunchConfig;
use crate::model::Order;
use crate::presenter::DisplayRow;
use crate::store::Persisted;
use crate::votes::VoteTally;
use std::path::PathBuf;

pub mod add;
pub mod clear;
pub mod config;
pub mod export;
pub mod import;
pub mod list;
pub mod remove;
pub mod status;
pub mod vote;

/// Where lunchsquad keeps its files.
#[derive(Debug, Clone)]
pub struct LunchPaths {
    /// Durable tier and `config.json`.
    pub data: PathBuf,
    /// Fast tier, one subdirectory per session.
    pub cache: PathBuf,
}

impl LunchPaths {
    pub fn session_cache(&self, session: &str) -> PathBuf {
        self.cache.join(session)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Snapshot for `status`.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub session: String,
    pub order_count: usize,
    /// (restaurant label, orders) in kind order.
    pub per_restaurant: Vec<(String, usize)>,
    pub last_order: Option<String>,
    pub leading_vote: Option<String>,
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_orders: Vec<Order>,
    pub listed_rows: Vec<DisplayRow>,
    pub tally: Option<VoteTally>,
    pub exported: Option<PathBuf>,
    pub status: Option<StatusReport>,
    pub config: Option<LunchConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_orders(mut self, orders: Vec<Order>) -> Self {
        self.affected_orders = orders;
        self
    }

    pub fn with_listed_rows(mut self, rows: Vec<DisplayRow>) -> Self {
        self.listed_rows = rows;
        self
    }

    pub fn with_tally(mut self, tally: VoteTally) -> Self {
        self.tally = Some(tally);
        self
    }

    pub fn with_config(mut self, config: LunchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Tell the user when their change did not reach durable storage.
    pub fn note_durability(&mut self, persisted: Persisted) {
        match persisted {
            Persisted::Durable => {}
            Persisted::CacheOnly => self.add_message(CmdMessage::warning(
                "Saved to the local cache only; durable storage is unavailable.",
            )),
            Persisted::NotSaved => self.add_message(CmdMessage::warning(
                "Could not save anywhere; this change will be lost when lunchsquad exits.",
            )),
        }
    }
}
