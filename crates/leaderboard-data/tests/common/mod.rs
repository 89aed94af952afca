#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;

/// A fixture cell.
#[derive(Debug, Clone, Copy)]
pub enum Val {
    S(&'static str),
    N(f64),
    B(bool),
    Blank,
}

pub struct SheetFixture {
    pub name: &'static str,
    pub header: Vec<&'static str>,
    pub rows: Vec<Vec<Val>>,
}

pub fn sheet(name: &'static str, header: &[&'static str], rows: Vec<Vec<Val>>) -> SheetFixture {
    SheetFixture {
        name,
        header: header.to_vec(),
        rows,
    }
}

/// Write `sheets` as an `.xlsx` workbook at `dir/file_name`.
pub fn write_workbook(dir: &Path, file_name: &str, sheets: &[SheetFixture]) -> PathBuf {
    let mut workbook = Workbook::new();
    for fixture in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(fixture.name).expect("set sheet name");
        for (col, name) in fixture.header.iter().enumerate() {
            if !name.is_empty() {
                worksheet
                    .write_string(0, col as u16, *name)
                    .expect("write header");
            }
        }
        for (r, row) in fixture.rows.iter().enumerate() {
            let row_idx = r as u32 + 1;
            for (c, value) in row.iter().enumerate() {
                let col_idx = c as u16;
                match *value {
                    Val::S(s) => {
                        worksheet.write_string(row_idx, col_idx, s).expect("write string");
                    }
                    Val::N(n) => {
                        worksheet.write_number(row_idx, col_idx, n).expect("write number");
                    }
                    Val::B(b) => {
                        worksheet.write_boolean(row_idx, col_idx, b).expect("write bool");
                    }
                    Val::Blank => {}
                }
            }
        }
    }

    let path = dir.join(file_name);
    workbook.save(&path).expect("save workbook");
    path
}

pub fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("read {}: {e}", path.display()));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("parse {}: {e}", path.display()))
}

/// The two-sheet benchmark used across tests.
pub fn two_sheet_benchmark(dir: &Path) -> PathBuf {
    write_workbook(
        dir,
        "bench.xlsx",
        &[
            sheet(
                "Sheet1",
                &["id", "model_id", "score"],
                vec![vec![Val::N(1.0), Val::S("A"), Val::N(0.9)]],
            ),
            sheet(
                "Sheet2",
                &["id", "model_id", "score"],
                vec![vec![Val::N(2.0), Val::S("B"), Val::N(0.8)]],
            ),
        ],
    )
}

pub const PLACEHOLDER_FIELDS: [&str; 10] = [
    "citation",
    "slides",
    "patches",
    "parameters",
    "architecture",
    "pretraining_strategy",
    "pretraining_data_source",
    "stain",
    "released_date",
    "publication",
];
