//! Per-column type inference.
//!
//! A column gets one type from all of its non-missing cells, and every cell
//! of the column is converted with it. Integer columns holding a missing
//! cell are widened to float, so `1` becomes `1.0` next to a `null`.
//! Floats are rounded to [`FLOAT_DECIMALS`] decimal places.

use serde_json::{Number, Value};

use super::Table;

/// Decimal places kept on float values.
pub const FLOAT_DECIMALS: usize = 10;

/// Inferred type of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Every cell missing.
    Empty,
    Integer,
    Float,
    Boolean,
    Text,
}

/// Infer the type of every column of `table`.
pub fn infer_columns(table: &Table) -> Vec<ColumnType> {
    (0..table.headers.len())
        .map(|idx| infer_column(table.column(idx)))
        .collect()
}

/// Infer a column type from its cells.
pub fn infer_column<'a>(cells: impl Iterator<Item = Option<&'a str>>) -> ColumnType {
    let mut has_missing = false;
    let mut seen = 0usize;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;

    for cell in cells {
        let Some(cell) = cell else {
            has_missing = true;
            continue;
        };
        seen += 1;

        if all_int && parse_int(cell).is_none() {
            all_int = false;
        }
        if all_float && parse_float(cell).is_none() {
            all_float = false;
        }
        if all_bool && parse_bool(cell).is_none() {
            all_bool = false;
        }
        if !all_int && !all_float && !all_bool {
            return ColumnType::Text;
        }
    }

    match seen {
        0 => ColumnType::Empty,
        _ if all_int && has_missing => ColumnType::Float,
        _ if all_int => ColumnType::Integer,
        _ if all_float => ColumnType::Float,
        _ if all_bool => ColumnType::Boolean,
        _ => ColumnType::Text,
    }
}

/// Convert one cell with its column type.
pub fn convert_cell(cell: Option<&str>, column_type: ColumnType) -> Value {
    let Some(cell) = cell else {
        return Value::Null;
    };

    match column_type {
        ColumnType::Empty => Value::Null,
        ColumnType::Integer => parse_int(cell).map(Value::from).unwrap_or(Value::Null),
        ColumnType::Float => parse_float(cell)
            .map(round_float)
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ColumnType::Boolean => parse_bool(cell).map(Value::Bool).unwrap_or(Value::Null),
        ColumnType::Text => Value::String(cell.to_string()),
    }
}

fn parse_int(cell: &str) -> Option<i64> {
    cell.trim().parse::<i64>().ok()
}

fn parse_float(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    // str::parse also takes these spellings; the reader keeps them as text
    match trimmed.trim_start_matches(['+', '-']).to_ascii_lowercase().as_str() {
        "nan" | "infinity" => None,
        _ => trimmed.parse::<f64>().ok(),
    }
}

fn round_float(value: f64) -> f64 {
    format!("{:.*}", FLOAT_DECIMALS, value)
        .parse()
        .unwrap_or(value)
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell {
        "True" | "TRUE" | "true" => Some(true),
        "False" | "FALSE" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn infer(cells: &[Option<&str>]) -> ColumnType {
        infer_column(cells.iter().copied())
    }

    #[test]
    fn test_integer_column() {
        assert_eq!(infer(&[Some("1"), Some("-2"), Some("30")]), ColumnType::Integer);
        assert_eq!(convert_cell(Some("30"), ColumnType::Integer), json!(30));
    }

    #[test]
    fn test_integer_with_missing_widens_to_float() {
        assert_eq!(infer(&[Some("1"), None]), ColumnType::Float);
        assert_eq!(convert_cell(Some("1"), ColumnType::Float), json!(1.0));
        assert_eq!(convert_cell(None, ColumnType::Float), Value::Null);
    }

    #[test]
    fn test_float_column() {
        assert_eq!(infer(&[Some("1.5"), Some("2"), Some("1e3")]), ColumnType::Float);
        assert_eq!(convert_cell(Some("1e3"), ColumnType::Float), json!(1000.0));
    }

    #[test]
    fn test_float_rounded_to_ten_decimals() {
        assert_eq!(
            convert_cell(Some("0.123456789012345"), ColumnType::Float),
            json!(0.123456789)
        );
        assert_eq!(convert_cell(Some("-2.00000000004"), ColumnType::Float), json!(-2.0));
        assert_eq!(convert_cell(Some("0.25"), ColumnType::Float), json!(0.25));
    }

    #[test]
    fn test_infinite_float_is_null() {
        assert_eq!(infer(&[Some("inf"), Some("1.0")]), ColumnType::Float);
        assert_eq!(convert_cell(Some("inf"), ColumnType::Float), Value::Null);
    }

    #[test]
    fn test_word_spellings_are_text() {
        assert_eq!(infer(&[Some("infinity"), Some("1")]), ColumnType::Text);
        assert_eq!(infer(&[Some("e"), Some("1")]), ColumnType::Text);
    }

    #[test]
    fn test_boolean_column() {
        assert_eq!(infer(&[Some("True"), Some("false"), None]), ColumnType::Boolean);
        assert_eq!(convert_cell(Some("TRUE"), ColumnType::Boolean), json!(true));
        assert_eq!(convert_cell(None, ColumnType::Boolean), Value::Null);
    }

    #[test]
    fn test_mixed_column_is_text() {
        assert_eq!(infer(&[Some("1"), Some("x")]), ColumnType::Text);
        assert_eq!(convert_cell(Some("1"), ColumnType::Text), json!("1"));
    }

    #[test]
    fn test_all_missing_column() {
        assert_eq!(infer(&[None, None]), ColumnType::Empty);
        assert_eq!(infer(&[]), ColumnType::Empty);
    }

    #[test]
    fn test_text_kept_verbatim() {
        assert_eq!(convert_cell(Some(" padded "), ColumnType::Text), json!(" padded "));
    }
}
