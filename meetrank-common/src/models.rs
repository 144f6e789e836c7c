//! Tabular data contract shared by every meetrank data source and sink
//!
//! Rows arrive untyped: a cell may hold text, a number, or nothing at all.
//! Typing happens later, in the normalizer, never at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column headers of the result tables (bulk source and persisted store)
pub const RESULT_COLUMNS: [&str; 5] = ["First_Name", "Last_Name", "Category", "Gender", "Result"];

/// Column headers of the national record table
pub const REFERENCE_COLUMNS: [&str; 3] = ["Category", "Gender", "Record"];

/// One untyped tabular cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

/// Outcome of numeric coercion
///
/// `Discard` marks a row for silent exclusion; it is not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced {
    Value(f64),
    Discard,
}

impl Coerced {
    pub fn value(self) -> Option<f64> {
        match self {
            Coerced::Value(v) => Some(v),
            Coerced::Discard => None,
        }
    }
}

impl CellValue {
    /// Cell content as text; numbers render in their shortest form ("11", "11.25")
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
        }
    }

    /// Coerce the cell to a finite, non-negative measurement
    ///
    /// Text is trimmed before parsing. Empty text, non-numeric text, NaN,
    /// infinities and negative values all yield `Coerced::Discard`. A
    /// negative zero comes out as `0.0` so it orders equal to zero.
    pub fn coerce_number(&self) -> Coerced {
        let parsed = match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
        };

        match parsed {
            Some(v) if v == 0.0 => Coerced::Value(0.0),
            Some(v) if v.is_finite() && v > 0.0 => Coerced::Value(v),
            _ => Coerced::Discard,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// One row of a result table, exactly as read from a source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResultRow {
    #[serde(rename = "First_Name", alias = "first_name", default)]
    pub first_name: Option<CellValue>,
    #[serde(rename = "Last_Name", alias = "last_name", default)]
    pub last_name: Option<CellValue>,
    #[serde(rename = "Category", alias = "category", default)]
    pub category: Option<CellValue>,
    #[serde(rename = "Gender", alias = "gender", default)]
    pub gender: Option<CellValue>,
    #[serde(rename = "Result", alias = "result", default)]
    pub result: Option<CellValue>,
}

impl RawResultRow {
    /// Build a fully populated row
    pub fn new(
        first_name: impl Into<CellValue>,
        last_name: impl Into<CellValue>,
        category: impl Into<CellValue>,
        gender: impl Into<CellValue>,
        result: impl Into<CellValue>,
    ) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            category: Some(category.into()),
            gender: Some(gender.into()),
            result: Some(result.into()),
        }
    }

    /// Cells as text in `RESULT_COLUMNS` order (missing cells are `None`)
    pub fn text_cells(&self) -> [Option<String>; 5] {
        [
            self.first_name.as_ref().map(CellValue::as_text),
            self.last_name.as_ref().map(CellValue::as_text),
            self.category.as_ref().map(CellValue::as_text),
            self.gender.as_ref().map(CellValue::as_text),
            self.result.as_ref().map(CellValue::as_text),
        ]
    }
}

/// One row of the national record table, exactly as read from a source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReferenceRow {
    #[serde(rename = "Category", alias = "category", default)]
    pub category: Option<CellValue>,
    #[serde(rename = "Gender", alias = "gender", default)]
    pub gender: Option<CellValue>,
    #[serde(rename = "Record", alias = "record", default)]
    pub record: Option<CellValue>,
}

impl RawReferenceRow {
    pub fn new(
        category: impl Into<CellValue>,
        gender: impl Into<CellValue>,
        record: impl Into<CellValue>,
    ) -> Self {
        Self {
            category: Some(category.into()),
            gender: Some(gender.into()),
            record: Some(record.into()),
        }
    }

    /// Cells as text in `REFERENCE_COLUMNS` order
    pub fn text_cells(&self) -> [Option<String>; 3] {
        [
            self.category.as_ref().map(CellValue::as_text),
            self.gender.as_ref().map(CellValue::as_text),
            self.record.as_ref().map(CellValue::as_text),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_numeric_text_with_padding() {
        let cell = CellValue::from(" 11.25 ");
        assert_eq!(cell.coerce_number(), Coerced::Value(11.25));
    }

    #[test]
    fn test_coerce_rejects_garbage_and_non_finite() {
        for text in ["", "   ", "DNF", "11,25", "NaN", "inf", "-inf"] {
            assert_eq!(
                CellValue::from(text).coerce_number(),
                Coerced::Discard,
                "{:?} should be discarded",
                text
            );
        }
        assert_eq!(CellValue::Number(f64::NAN).coerce_number(), Coerced::Discard);
    }

    #[test]
    fn test_coerce_rejects_negative() {
        assert_eq!(CellValue::Number(-1.0).coerce_number(), Coerced::Discard);
        assert_eq!(CellValue::from("-0.5").coerce_number(), Coerced::Discard);
    }

    #[test]
    fn test_negative_zero_coerces_to_zero() {
        for cell in [CellValue::from("-0"), CellValue::from(" -0.0 "), CellValue::Number(-0.0)] {
            let value = cell.coerce_number().value().unwrap();
            assert_eq!(value, 0.0);
            assert!(value.is_sign_positive(), "{:?} kept its sign", cell);
        }
    }

    #[test]
    fn test_number_cells_pass_through() {
        assert_eq!(CellValue::Number(10.5).coerce_number().value(), Some(10.5));
        assert_eq!(CellValue::Number(11.0).as_text(), "11");
    }

    #[test]
    fn test_row_deserializes_mixed_cells_by_column_name() {
        let json = r#"{"First_Name":"Alice","Last_Name":"Smith","Category":"U12","Gender":"female","Result":11.25}"#;
        let row: RawResultRow = serde_json::from_str(json).unwrap();

        assert_eq!(row.first_name, Some(CellValue::from("Alice")));
        assert_eq!(row.result, Some(CellValue::Number(11.25)));
    }

    #[test]
    fn test_row_missing_column_is_none() {
        let json = r#"{"First_Name":"Alice","Category":"U12","Gender":"Female","Result":"11.25"}"#;
        let row: RawResultRow = serde_json::from_str(json).unwrap();

        assert!(row.last_name.is_none());
        assert_eq!(row.result, Some(CellValue::from("11.25")));
    }
}
