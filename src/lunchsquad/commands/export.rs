use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::export::{self, ExportContext, ExportFormat};
use crate::store::{OrderStore, StorageBackend};
use std::path::{Path, PathBuf};

pub fn run<C: StorageBackend, D: StorageBackend>(
    store: &OrderStore<C, D>,
    format: ExportFormat,
    dir: &Path,
    font_paths: &[PathBuf],
) -> Result<CmdResult> {
    let ctx = ExportContext::new(font_paths);
    let bytes = export::export(store.orders(), store.catalog(), format, &ctx)?;
    let path = export::write_to(dir, format, &bytes)?;

    let mut result = CmdResult::default();
    if store.is_empty() {
        result.add_message(CmdMessage::warning("There are no orders yet."));
    }
    result.add_message(CmdMessage::success(format!(
        "Exported {} orders to {}",
        store.len(),
        path.display()
    )));
    result.exported = Some(path);
    Ok(result)
}
