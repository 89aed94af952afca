//! `performance.json`: the combined measurement records.

use std::path::{Path, PathBuf};

use crate::json::{self, ExportError, Layout};
use crate::table::Table;

pub const PERFORMANCE_FILE: &str = "performance.json";
pub const ID_COLUMN: &str = "id";

/// Rewrite every `id` cell as text. Returns `false` when the table has no `id` column.
pub fn stringify_ids(table: &mut Table) -> bool {
    table.update_column(ID_COLUMN, |cell| cell.stringify())
}

/// Normalise `id` and write the table's records to `dir/performance.json`.
pub fn export_performance(table: &mut Table, dir: &Path) -> Result<PathBuf, ExportError> {
    if !stringify_ids(table) {
        log::debug!("no `{ID_COLUMN}` column; records are written unchanged");
    }
    let path = dir.join(PERFORMANCE_FILE);
    json::write_file(&path, table, Layout::Records)?;
    log::debug!("wrote {} records to {}", table.len(), path.display());
    Ok(path)
}
