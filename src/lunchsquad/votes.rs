//! Restaurant vote for the day.
//!
//! One vote per person; voting again moves the vote. The tally lives next to
//! the orders under `"{session}.votes"` and is dropped whenever the orders
//! are cleared (see [`VoteTally::reset_hook`]).

use crate::error::{Result, ValidationError};
use crate::model::Kind;
use crate::store::{ClearHook, Persisted, StorageBackend, Tiered};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::error;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteTally {
    votes: BTreeMap<String, Kind>,
}

pub fn votes_key(session: &str) -> String {
    format!("{}.votes", session)
}

impl VoteTally {
    pub fn load<C: StorageBackend, D: StorageBackend>(backend: &Tiered<C, D>, session: &str) -> Self {
        backend
            .fetch::<VoteTally>(&votes_key(session))
            .into_value()
            .unwrap_or_default()
    }

    pub fn save<C: StorageBackend, D: StorageBackend>(
        &self,
        backend: &Tiered<C, D>,
        session: &str,
    ) -> Persisted {
        match serde_json::to_value(self) {
            Ok(value) => backend.write_through(&votes_key(session), &value),
            Err(e) => {
                error!(error = %e, "could not serialize votes");
                Persisted::NotSaved
            }
        }
    }

    /// Record a vote. Returns the voter's previous choice, if any.
    pub fn cast(&mut self, voter: &str, kind: Kind) -> std::result::Result<Option<Kind>, ValidationError> {
        let voter = voter.trim();
        if voter.is_empty() {
            return Err(ValidationError::MissingField("voter"));
        }
        Ok(self.votes.insert(voter.to_string(), kind))
    }

    pub fn votes(&self) -> &BTreeMap<String, Kind> {
        &self.votes
    }

    pub fn total(&self) -> usize {
        self.votes.len()
    }

    /// Votes per restaurant, in kind order, including zeros.
    pub fn counts(&self) -> Vec<(Kind, usize)> {
        Kind::ALL
            .iter()
            .map(|&kind| (kind, self.votes.values().filter(|&&k| k == kind).count()))
            .collect()
    }

    /// The restaurant with the most votes; ties go to the earlier kind.
    pub fn leader(&self) -> Option<Kind> {
        let mut best: Option<(Kind, usize)> = None;
        for (kind, count) in self.counts() {
            if count == 0 {
                continue;
            }
            match best {
                Some((_, top)) if top >= count => {}
                _ => best = Some((kind, count)),
            }
        }
        best.map(|(kind, _)| kind)
    }

    /// On-clear hook that deletes the session's tally.
    pub fn reset_hook(session: &str) -> ClearHook {
        let key = votes_key(session);
        Box::new(move |backend: &dyn StorageBackend| -> Result<()> {
            backend.delete(&key)?;
            Ok(())
        })
    }
}
