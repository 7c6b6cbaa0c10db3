use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{OrderStore, StorageBackend};

pub fn run<C: StorageBackend, D: StorageBackend>(store: &mut OrderStore<C, D>) -> Result<CmdResult> {
    let count = store.clear();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(match count {
        0 => "The order list was already empty. Votes were reset.".to_string(),
        1 => "Cleared 1 order and reset the votes.".to_string(),
        n => format!("Cleared {} orders and reset the votes.", n),
    }));
    result.note_durability(store.durability());
    Ok(result)
}
