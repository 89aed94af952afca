//! Workbook loading.
//!
//! Each sheet's used range is read as a table whose first row is the header. Header and
//! cell normalisation follow the conventions the leaderboard's historical conversions used,
//! so re-running the converter on the same workbook yields the same JSON.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader};
use thiserror::Error;

use crate::cell::Cell;
use crate::table::Table;

/// Text values that read as null when [`LoadOptions::na_markers`] is enabled.
pub const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Treat [`NA_MARKERS`] text cells as null.
    pub na_markers: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { na_markers: true }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open workbook `{path}`: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("failed to read sheet `{sheet}` of `{path}`: {source}")]
    Sheet {
        path: PathBuf,
        sheet: String,
        #[source]
        source: calamine::Error,
    },
    #[error("workbook `{path}` has no sheets")]
    NoSheets { path: PathBuf },
}

/// A named sheet and its contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub table: Table,
}

/// Load every sheet of a workbook, in workbook order.
pub fn load_workbook(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<Vec<Sheet>, LoadError> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|source| LoadError::Sheet {
                path: path.to_path_buf(),
                sheet: name.clone(),
                source,
            })?;
        let table = table_from_range(&range, options);
        log::debug!(
            "loaded sheet `{name}` from {}: {} columns, {} rows",
            path.display(),
            table.columns().len(),
            table.len()
        );
        sheets.push(Sheet { name, table });
    }
    Ok(sheets)
}

/// Load only the first (default) sheet of a workbook.
pub fn load_first_sheet(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<Sheet, LoadError> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let Some(name) = workbook.sheet_names().into_iter().next() else {
        return Err(LoadError::NoSheets {
            path: path.to_path_buf(),
        });
    };
    let range = workbook
        .worksheet_range(&name)
        .map_err(|source| LoadError::Sheet {
            path: path.to_path_buf(),
            sheet: name.clone(),
            source,
        })?;
    let table = table_from_range(&range, options);
    Ok(Sheet { name, table })
}

/// Convert a sheet's used range into a table.
///
/// The first row becomes the header (see [`header_names`]). Rows whose cells are all null
/// are dropped.
pub fn table_from_range(range: &Range<Data>, options: &LoadOptions) -> Table {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Table::default();
    };

    let mut table = Table::new(header_names(header));
    for row in rows {
        let cells: Vec<Cell> = row.iter().map(|v| convert_value(v, options)).collect();
        if cells.iter().all(Cell::is_null) {
            continue;
        }
        table.push_row(cells);
    }
    table
}

/// Derive unique column names from a header row.
///
/// Blank header cells become `Unnamed: {col}`; repeated names get `.1`, `.2`, ... suffixes,
/// skipping any suffixed name that is already taken.
pub fn header_names(header: &[Data]) -> Vec<String> {
    let raw = header.iter().enumerate().map(|(col, value)| {
        let name = match value {
            Data::Empty => None,
            Data::String(s) if s.is_empty() => None,
            other => convert_value(other, &LoadOptions { na_markers: false }).text_form(),
        };
        name.unwrap_or_else(|| {
            log::warn!("blank header cell in column {col}; naming it `Unnamed: {col}`");
            format!("Unnamed: {col}")
        })
    });

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(header.len());
    for mut name in raw {
        let mut count = counts.get(&name).copied().unwrap_or(0);
        while count > 0 {
            counts.insert(name.clone(), count + 1);
            name = format!("{name}.{count}");
            count = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), count + 1);
        names.push(name);
    }
    names
}

fn convert_value(value: &Data, options: &LoadOptions) -> Cell {
    match value {
        Data::Empty => Cell::Null,
        Data::Bool(v) => Cell::Bool(*v),
        Data::Int(v) => Cell::Int(*v),
        Data::Float(v) => Cell::number(*v),
        Data::String(v) => convert_text(v, options),
        Data::Error(e) => convert_text(&e.to_string(), options),
        Data::DateTime(v) if v.is_duration() => Cell::duration_days(v.as_f64()),
        Data::DateTime(v) => Cell::date_serial(v.as_f64()),
        Data::DateTimeIso(v) | Data::DurationIso(v) => Cell::text(v.as_str()),
    }
}

fn convert_text(value: &str, options: &LoadOptions) -> Cell {
    if options.na_markers && NA_MARKERS.contains(&value) {
        Cell::Null
    } else {
        Cell::text(value)
    }
}
