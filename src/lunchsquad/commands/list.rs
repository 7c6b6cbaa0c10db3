use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::presenter::{OrderFilter, SortKey};
use crate::store::{OrderStore, StorageBackend};

pub fn run<C: StorageBackend, D: StorageBackend>(
    store: &OrderStore<C, D>,
    sort: SortKey,
    filter: &OrderFilter,
) -> Result<CmdResult> {
    let rows = store.project_filtered(sort, filter);
    let mut result = CmdResult::default();
    if rows.is_empty() {
        let msg = if store.is_empty() {
            "No orders yet."
        } else {
            "No orders match the filter."
        };
        result.add_message(CmdMessage::info(msg));
    }
    Ok(result.with_listed_rows(rows))
}
