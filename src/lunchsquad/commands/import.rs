use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{OrderStore, StorageBackend};
use std::fs;
use std::path::Path;

/// Replace the order list with the contents of a JSON export.
pub fn run<C: StorageBackend, D: StorageBackend>(
    store: &mut OrderStore<C, D>,
    path: &Path,
) -> Result<CmdResult> {
    let payload = fs::read_to_string(path)?;
    let count = store.import_json(&payload)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Imported {} orders from {}",
        count,
        path.display()
    )));
    result.note_durability(store.durability());
    Ok(result.with_affected_orders(store.orders().to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::error::{LunchError, SchemaError};
    use crate::model::Candidate;
    use crate::store::{MemBackend, Tiered};
    use tempfile::tempdir;

    fn store() -> OrderStore<MemBackend, MemBackend> {
        OrderStore::open(
            Tiered::new(MemBackend::new(), MemBackend::new()),
            Catalog::default(),
            "default",
        )
    }

    #[test]
    fn test_import_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lunch_orders.json");
        fs::write(
            &path,
            r#"[{"submitter":"Zoë","createdAt":"2026-10-18T10:00:00Z","kind":"mealA","itemNumber":5}]"#,
        )
        .unwrap();

        let mut store = store();
        store.add(&Candidate::numbered("Old", "1")).unwrap();
        let result = run(&mut store, &path).unwrap();
        assert!(result.messages[0].content.starts_with("Imported 1 orders from"));
        assert_eq!(store.orders()[0].submitter, "Zoë");
    }

    #[test]
    fn test_rejected_file_leaves_orders() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"submitter":"x"}"#).unwrap();

        let mut store = store();
        store.add(&Candidate::numbered("Old", "1")).unwrap();
        let err = run(&mut store, &path).unwrap_err();
        assert!(matches!(err, LunchError::Schema(SchemaError::NotAnArray)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let mut store = store();
        let err = run(&mut store, Path::new("/no/such/file.json")).unwrap_err();
        assert!(matches!(err, LunchError::Io(_)));
    }
}
