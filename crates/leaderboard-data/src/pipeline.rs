//! End-to-end conversion: workbook in, `performance.json` and `model.json` out.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::{self, MODEL_FILE};
use crate::json::ExportError;
use crate::loader::{self, LoadError, LoadOptions};
use crate::performance::{self, PERFORMANCE_FILE};
use crate::rank::{self, RankError};
use crate::table::Table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub input: PathBuf,
    pub rank_file: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub load: LoadOptions,
}

impl PipelineOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            rank_file: None,
            out_dir: PathBuf::from("."),
            load: LoadOptions::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// What happened to the optional rank merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankOutcome {
    Merged { matched: usize },
    MissingColumns,
    Failed { detail: String },
}

impl RankOutcome {
    pub fn message(&self) -> String {
        match self {
            RankOutcome::Merged { .. } => "✅ Rank data merged into model.json".to_string(),
            RankOutcome::MissingColumns => "⚠️  Rank file does not contain 'model_id' and 'rank' columns. Skipping rank merge.".to_string(),
            RankOutcome::Failed { detail } => {
                format!("⚠️  Error reading rank file: {detail}. Skipping rank merge.")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogReport {
    pub path: PathBuf,
    pub models: usize,
    /// `None` when no rank file was supplied.
    pub rank: Option<RankOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub performance_path: PathBuf,
    pub records: usize,
    /// `None` when the input has no `model_id` column.
    pub catalog: Option<CatalogReport>,
}

impl Report {
    /// User-facing summary lines, in the order they are printed.
    pub fn messages(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(catalog) = &self.catalog {
            if let Some(rank) = &catalog.rank {
                lines.push(rank.message());
            }
            lines.push(format!("Model data has been written to {MODEL_FILE}"));
        }
        lines.push(format!("JSON data has been written to {PERFORMANCE_FILE}"));
        lines
    }
}

/// Run the full conversion.
///
/// Loading the input workbook and writing either output are fatal. Every rank-file problem
/// is reported through [`RankOutcome`] and leaves all ranks at `0`.
pub fn run(options: &PipelineOptions) -> Result<Report, PipelineError> {
    let sheets = loader::load_workbook(&options.input, &options.load)?;
    let mut table = Table::concat(sheets.iter().map(|sheet| &sheet.table));
    log::debug!(
        "combined {} sheets into {} rows x {} columns",
        sheets.len(),
        table.len(),
        table.columns().len()
    );

    let performance_path = performance::export_performance(&mut table, &options.out_dir)?;

    let catalog = match catalog::build_catalog(&table) {
        Some(mut models) => {
            let rank = options.rank_file.as_deref().map(|path| {
                match rank::load_rank_table(path, &options.load)
                    .and_then(|ranks| rank::merge_ranks(&mut models, &ranks))
                {
                    Ok(matched) => RankOutcome::Merged { matched },
                    Err(RankError::MissingColumns) => RankOutcome::MissingColumns,
                    Err(err) => RankOutcome::Failed {
                        detail: err.to_string(),
                    },
                }
            });
            match &rank {
                Some(RankOutcome::Merged { matched }) => {
                    log::debug!("merged ranks for {matched} of {} models", models.len());
                }
                Some(outcome) => log::warn!("rank merge skipped: {outcome:?}"),
                None => {}
            }

            let path = catalog::export_catalog(&models, &options.out_dir)?;
            Some(CatalogReport {
                path,
                models: models.len(),
                rank,
            })
        }
        None => {
            log::debug!("no `model_id` column; skipping {MODEL_FILE}");
            None
        }
    };

    Ok(Report {
        performance_path,
        records: table.len(),
        catalog,
    })
}
