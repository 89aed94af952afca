//! Benchmark spreadsheet conversion for the leaderboard.
//!
//! A benchmark workbook holds one sheet per task family. [`pipeline::run`] combines every
//! sheet into a single record list (`performance.json`) and derives the model catalog
//! (`model.json`) from the distinct `model_id` values, optionally taking ranks from a second
//! workbook.

pub mod build_meta;
pub mod catalog;
pub mod cell;
pub mod cli;
pub mod json;
pub mod loader;
pub mod performance;
pub mod pipeline;
pub mod rank;
pub mod table;

pub use catalog::{build_catalog, ModelEntry};
pub use cell::Cell;
pub use loader::{load_workbook, LoadOptions, Sheet};
pub use pipeline::{run, PipelineOptions, Report};
pub use rank::{merge_ranks, RankTable};
pub use table::Table;
