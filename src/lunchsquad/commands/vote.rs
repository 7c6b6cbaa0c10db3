use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Kind;
use crate::store::{OrderStore, StorageBackend};
use crate::votes::VoteTally;

pub fn cast<C: StorageBackend, D: StorageBackend>(
    store: &OrderStore<C, D>,
    session: &str,
    voter: &str,
    kind: Kind,
) -> Result<CmdResult> {
    let mut tally = VoteTally::load(store.backend(), session);
    let previous = tally.cast(voter, kind)?;
    let persisted = tally.save(store.backend(), session);

    let label = store.catalog().restaurant_label(kind);
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(match previous {
        Some(old) if old != kind => format!(
            "{} changed their vote from {} to {}",
            voter.trim(),
            store.catalog().restaurant_label(old),
            label
        ),
        _ => format!("{} voted for {}", voter.trim(), label),
    }));
    result.note_durability(persisted);
    Ok(result.with_tally(tally))
}

pub fn show<C: StorageBackend, D: StorageBackend>(
    store: &OrderStore<C, D>,
    session: &str,
) -> Result<CmdResult> {
    let tally = VoteTally::load(store.backend(), session);
    let mut result = CmdResult::default();
    if tally.total() == 0 {
        result.add_message(CmdMessage::info("No votes yet."));
    }
    Ok(result.with_tally(tally))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::store::{MemBackend, Tiered};

    #[test]
    fn test_cast_and_change_vote() {
        let store = OrderStore::open(
            Tiered::new(MemBackend::new(), MemBackend::new()),
            Catalog::default(),
            "default",
        );
        let first = cast(&store, "default", "Anna", Kind::Kebab).unwrap();
        assert_eq!(first.messages[0].content, "Anna voted for Döner");

        let second = cast(&store, "default", "Anna", Kind::Deli).unwrap();
        assert_eq!(
            second.messages[0].content,
            "Anna changed their vote from Döner to Edeka"
        );

        let shown = show(&store, "default").unwrap();
        let tally = shown.tally.unwrap();
        assert_eq!(tally.total(), 1);
        assert_eq!(tally.leader(), Some(Kind::Deli));
    }

    #[test]
    fn test_blank_voter_rejected() {
        let store = OrderStore::open(
            Tiered::new(MemBackend::new(), MemBackend::new()),
            Catalog::default(),
            "default",
        );
        assert!(cast(&store, "default", " ", Kind::Kebab).is_err());
        assert!(show(&store, "default").unwrap().messages[0].content == "No votes yet.");
    }
}
