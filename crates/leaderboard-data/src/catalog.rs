//! `model.json`: one catalog entry per distinct `model_id`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cell::Cell;
use crate::json::{self, ExportError, Layout};
use crate::table::Table;

pub const MODEL_FILE: &str = "model.json";
pub const MODEL_ID_COLUMN: &str = "model_id";

/// Value of every metadata field the spreadsheets do not provide.
pub const PLACEHOLDER: &str = "-";

/// A model as the leaderboard UI expects it.
///
/// Field order is the on-disk member order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelEntry {
    pub name: Cell,
    pub citation: String,
    pub slides: String,
    pub patches: String,
    pub parameters: String,
    pub architecture: String,
    pub pretraining_strategy: String,
    pub pretraining_data_source: String,
    pub stain: String,
    pub released_date: String,
    pub publication: String,
    pub rank: i64,
}

impl ModelEntry {
    /// An entry with placeholder metadata and rank `0`.
    pub fn new(name: Cell) -> Self {
        let placeholder = || PLACEHOLDER.to_string();
        Self {
            name,
            citation: placeholder(),
            slides: placeholder(),
            patches: placeholder(),
            parameters: placeholder(),
            architecture: placeholder(),
            pretraining_strategy: placeholder(),
            pretraining_data_source: placeholder(),
            stain: placeholder(),
            released_date: placeholder(),
            publication: placeholder(),
            rank: 0,
        }
    }

    /// Identity used for de-duplication and rank lookups.
    pub fn key(&self) -> Option<String> {
        self.name.text_form()
    }
}

/// Collect distinct `model_id` values in first-occurrence order.
///
/// Returns `None` when the table has no `model_id` column. Values are compared by their
/// text form, so `7` and `"7"` are the same model. All null cells (including the padding of
/// sheets without a `model_id` column) share one entry whose `name` is `null`.
pub fn build_catalog(table: &Table) -> Option<Vec<ModelEntry>> {
    let column = table.column(MODEL_ID_COLUMN)?;

    let mut seen: HashSet<Option<String>> = HashSet::new();
    let mut models = Vec::new();
    for cell in column {
        if seen.insert(cell.text_form()) {
            models.push(ModelEntry::new(cell.clone()));
        }
    }
    Some(models)
}

pub fn export_catalog(models: &[ModelEntry], dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(MODEL_FILE);
    json::write_file(&path, models, Layout::Records)?;
    log::debug!("wrote {} models to {}", models.len(), path.display());
    Ok(path)
}
