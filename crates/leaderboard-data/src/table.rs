//! Column-ordered tables and the multi-sheet combiner.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::cell::Cell;

/// A rectangular table: named columns plus rows of cells in column order.
///
/// Every row has exactly `columns().len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from string headers and rows (mostly useful in tests).
    pub fn from_rows<C, R>(columns: &[&str], rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = Cell>,
    {
        let mut table = Self::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row.into_iter().collect());
        }
        table
    }

    /// Append a row, padding with nulls (or truncating) to the table width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Null);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate over the cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Apply `f` to every cell of a column. Returns `false` if the column does not exist.
    pub fn update_column(&mut self, name: &str, mut f: impl FnMut(&mut Cell)) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        for row in &mut self.rows {
            f(&mut row[idx]);
        }
        true
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        self.rows.iter().map(move |cells| Record {
            columns: &self.columns,
            cells,
        })
    }

    /// Concatenate tables in order.
    ///
    /// The result's columns are the union of all input columns in first-seen order; a row
    /// gets [`Cell::Null`] for every column its source table lacks. Row order is preserved
    /// within and across tables.
    pub fn concat<'a>(tables: impl IntoIterator<Item = &'a Table>) -> Table {
        let tables: Vec<&Table> = tables.into_iter().collect();

        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for table in &tables {
            for column in &table.columns {
                if !positions.contains_key(column.as_str()) {
                    positions.insert(column.as_str(), columns.len());
                    columns.push(column.clone());
                }
            }
        }

        let width = columns.len();
        let total: usize = tables.iter().map(|t| t.len()).sum();
        let mut rows = Vec::with_capacity(total);
        for table in &tables {
            let targets: Vec<usize> = table
                .columns
                .iter()
                .map(|c| positions[c.as_str()])
                .collect();
            for source in &table.rows {
                let mut row = vec![Cell::Null; width];
                for (cell, &target) in source.iter().zip(&targets) {
                    row[target] = cell.clone();
                }
                rows.push(row);
            }
        }

        Table { columns, rows }
    }
}

/// One row viewed as a `column -> cell` object, in column order.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

/// A table serializes as an array of records.
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for record in self.records() {
            seq.serialize_element(&record)?;
        }
        seq.end()
    }
}
