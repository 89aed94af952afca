//! Scalar cell values shared by the loader, the combined table and the JSON exporters.

use serde::Serialize;

/// Epoch offset (in days) between the 1900 spreadsheet date system and 1970-01-01.
const UNIX_EPOCH_SERIAL: f64 = 25_569.0;
const MS_PER_DAY: f64 = 86_400_000.0;

/// A single value in a table row.
///
/// Serializes to the matching JSON scalar; [`Cell::Null`] becomes `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Build a numeric cell, collapsing integral values into [`Cell::Int`].
    ///
    /// Spreadsheets store every number as a double; columns of whole numbers (ids, counts,
    /// ranks) should still come out as `101` rather than `101.0`.
    pub fn number(value: f64) -> Self {
        // `i64::MAX as f64` rounds up to 2^63, so the upper bound must be exclusive.
        if value.is_finite()
            && value.fract() == 0.0
            && value >= i64::MIN as f64
            && value < i64::MAX as f64
        {
            Cell::Int(value as i64)
        } else {
            Cell::Float(value)
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Convert a 1900-system date serial into epoch milliseconds.
    pub fn date_serial(serial: f64) -> Self {
        // Serials below 60 precede the phantom 1900-02-29 and are one day early.
        let serial = if serial < 60.0 { serial + 1.0 } else { serial };
        Cell::Int(((serial - UNIX_EPOCH_SERIAL) * MS_PER_DAY).round() as i64)
    }

    /// Convert a duration expressed in days into milliseconds.
    pub fn duration_days(days: f64) -> Self {
        Cell::Int((days * MS_PER_DAY).round() as i64)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Text representation used for `id` coercion and for model identity.
    ///
    /// Returns `None` for [`Cell::Null`].
    pub fn text_form(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Bool(true) => Some("True".to_string()),
            Cell::Bool(false) => Some("False".to_string()),
            Cell::Int(v) => Some(v.to_string()),
            Cell::Float(v) if v.is_nan() => Some("nan".to_string()),
            Cell::Float(v) if v.is_infinite() => {
                Some(if *v > 0.0 { "inf" } else { "-inf" }.to_string())
            }
            Cell::Float(v) => Some(float_text(*v)),
            Cell::Text(v) => Some(v.clone()),
        }
    }

    /// Replace the value with its text form in place. Null stays null.
    pub fn stringify(&mut self) {
        if let Some(text) = self.text_form() {
            *self = Cell::Text(text);
        }
    }
}

/// Shortest round-trip digits; exponent notation (`1e+20`, `1.5e-07`) below `1e-4` and
/// from `1e16` up.
fn float_text(value: f64) -> String {
    let sci = format!("{value:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return value.to_string();
    };
    match exp.parse::<i32>() {
        Ok(exp) if !(-4..16).contains(&exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
        _ => value.to_string(),
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::number(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}
