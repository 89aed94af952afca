//! Optional rank merge from a second workbook.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::catalog::{ModelEntry, MODEL_ID_COLUMN};
use crate::cell::Cell;
use crate::loader::{self, LoadError, LoadOptions};
use crate::table::Table;

pub const RANK_COLUMN: &str = "rank";

#[derive(Debug, Error)]
pub enum RankError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("rank file does not contain 'model_id' and 'rank' columns")]
    MissingColumns,
    #[error("invalid rank {value:?} for model `{model}`")]
    InvalidRank { model: String, value: String },
}

/// `model_id -> rank` as read from a rank sheet.
///
/// Values are kept as cells until they are merged; only ranks that match a catalog entry are
/// ever coerced to integers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankTable {
    ranks: HashMap<String, Cell>,
}

impl RankTable {
    /// Build the mapping from a table with `model_id` and `rank` columns.
    ///
    /// Rows with a null `model_id` are ignored; a repeated `model_id` keeps its last rank.
    pub fn from_table(table: &Table) -> Result<Self, RankError> {
        let (Some(ids), Some(ranks)) = (table.column(MODEL_ID_COLUMN), table.column(RANK_COLUMN))
        else {
            return Err(RankError::MissingColumns);
        };

        let ranks = ids
            .zip(ranks)
            .filter_map(|(id, rank)| Some((id.text_form()?, rank.clone())))
            .collect();
        Ok(Self { ranks })
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Integer rank for `model`, or `Ok(None)` when the model is not listed.
    pub fn rank_of(&self, model: &str) -> Result<Option<i64>, RankError> {
        let Some(cell) = self.ranks.get(model) else {
            return Ok(None);
        };
        coerce_rank(cell)
            .map(Some)
            .ok_or_else(|| RankError::InvalidRank {
                model: model.to_string(),
                value: cell.text_form().unwrap_or_default(),
            })
    }
}

impl<K: Into<String>, V: Into<Cell>> FromIterator<(K, V)> for RankTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            ranks: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Read the first sheet of `path` as a rank table.
pub fn load_rank_table(path: &Path, options: &LoadOptions) -> Result<RankTable, RankError> {
    let sheet = loader::load_first_sheet(path, options)?;
    log::debug!(
        "rank sheet `{}` of {} has {} rows",
        sheet.name,
        path.display(),
        sheet.table.len()
    );
    RankTable::from_table(&sheet.table)
}

/// Set each model's rank from `ranks`; unlisted models get `0`.
///
/// All ranks are resolved before any is assigned, so on error the models are unchanged.
/// Returns how many models were found in the rank table.
pub fn merge_ranks(models: &mut [ModelEntry], ranks: &RankTable) -> Result<usize, RankError> {
    let resolved = models
        .iter()
        .map(|model| match model.key() {
            Some(key) => ranks.rank_of(&key),
            None => Ok(None),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut matched = 0;
    for (model, rank) in models.iter_mut().zip(resolved) {
        if rank.is_some() {
            matched += 1;
        }
        model.rank = rank.unwrap_or(0);
    }
    Ok(matched)
}

fn coerce_rank(cell: &Cell) -> Option<i64> {
    match cell {
        Cell::Null => Some(0),
        Cell::Bool(v) => Some(i64::from(*v)),
        Cell::Int(v) => Some(*v),
        Cell::Float(v) if v.is_nan() => Some(0),
        Cell::Float(v) if v.is_finite() => Some(v.trunc() as i64),
        Cell::Float(_) => None,
        Cell::Text(v) => v.trim().parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog(names: &[&str]) -> Vec<ModelEntry> {
        names.iter().map(|n| ModelEntry::new(Cell::text(*n))).collect()
    }

    fn ranks_of(models: &[ModelEntry]) -> Vec<i64> {
        models.iter().map(|m| m.rank).collect()
    }

    #[test]
    fn merges_matching_ranks_and_defaults_the_rest() {
        let mut models = catalog(&["modelA", "modelB", "modelC"]);
        let ranks: RankTable = [("modelA", 3i64), ("modelB", 7)].into_iter().collect();

        let matched = merge_ranks(&mut models, &ranks).expect("merge");
        assert_eq!(matched, 2);
        assert_eq!(ranks_of(&models), vec![3, 7, 0]);
    }

    #[test]
    fn rank_values_are_coerced_to_integers() {
        let mut models = catalog(&["a", "b", "c", "d", "e"]);
        let ranks: RankTable = [
            ("a", Cell::Float(2.9)),
            ("b", Cell::text(" 4 ")),
            ("c", Cell::Null),
            ("d", Cell::Bool(true)),
            ("e", Cell::Int(-1)),
        ]
        .into_iter()
        .collect();

        merge_ranks(&mut models, &ranks).expect("merge");
        assert_eq!(ranks_of(&models), vec![2, 4, 0, 1, -1]);
    }

    #[test]
    fn invalid_rank_leaves_models_untouched() {
        let mut models = catalog(&["a", "b"]);
        models[0].rank = 5;
        let ranks: RankTable = [("a", Cell::Int(1)), ("b", Cell::text("first"))]
            .into_iter()
            .collect();

        let err = merge_ranks(&mut models, &ranks).expect_err("text rank should fail");
        assert!(matches!(err, RankError::InvalidRank { ref model, .. } if model == "b"));
        assert_eq!(ranks_of(&models), vec![5, 0]);
    }

    #[test]
    fn invalid_rank_for_unlisted_model_is_ignored() {
        let mut models = catalog(&["a"]);
        let ranks: RankTable = [("a", Cell::Int(5)), ("zzz", Cell::text("n/a"))]
            .into_iter()
            .collect();
        merge_ranks(&mut models, &ranks).expect("merge");
        assert_eq!(ranks_of(&models), vec![5]);
    }

    #[test]
    fn from_table_requires_both_columns() {
        let table = Table::from_rows(&["model_id", "score"], [vec![Cell::text("a"), Cell::Int(1)]]);
        assert!(matches!(
            RankTable::from_table(&table),
            Err(RankError::MissingColumns)
        ));
    }

    #[test]
    fn from_table_keeps_last_duplicate_and_skips_null_ids() {
        let table = Table::from_rows(
            &["rank", "model_id"],
            [
                vec![Cell::Int(1), Cell::text("a")],
                vec![Cell::Int(9), Cell::Null],
                vec![Cell::Int(2), Cell::text("a")],
                vec![Cell::Int(3), Cell::Int(42)],
            ],
        );
        let ranks = RankTable::from_table(&table).unwrap();
        assert_eq!(ranks.len(), 2);
        assert_eq!(ranks.rank_of("a").unwrap(), Some(2));
        assert_eq!(ranks.rank_of("42").unwrap(), Some(3));
        assert_eq!(ranks.rank_of("b").unwrap(), None);
    }

    #[test]
    fn missing_columns_message() {
        assert_eq!(
            RankError::MissingColumns.to_string(),
            "rank file does not contain 'model_id' and 'rank' columns"
        );
    }
}
