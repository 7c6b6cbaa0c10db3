use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::presenter;
use crate::store::{OrderStore, StorageBackend};

/// Remove orders by 0-based index. The indices must already be valid.
pub fn run<C: StorageBackend, D: StorageBackend>(
    store: &mut OrderStore<C, D>,
    indices: &[usize],
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let removed = match indices {
        [] => Vec::new(),
        [single] => vec![store.remove_at(*single)?],
        many => {
            let mut picked: Vec<usize> = many.to_vec();
            picked.sort_unstable();
            picked.dedup();
            let orders: Vec<_> = picked
                .iter()
                .filter_map(|&i| store.orders().get(i).cloned())
                .collect();
            store.remove_many(&picked);
            orders
        }
    };

    for order in &removed {
        let (summary, _) = presenter::describe(&order.meal, store.catalog());
        result.add_message(CmdMessage::success(format!(
            "Removed {}'s order: {}",
            order.submitter, summary
        )));
    }
    if removed.is_empty() {
        result.add_message(CmdMessage::info("Nothing to remove."));
    } else {
        result.note_durability(store.durability());
    }
    Ok(result.with_affected_orders(removed))
}
