//! Parsed CSV rows and the scalar values they hold.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A single cell after type inference.
///
/// Serialises untagged, so a row maps directly onto a GeoJSON `properties`
/// object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Empty cell.
    Null,
    /// `true`/`false` token.
    Bool(bool),
    /// Numeric literal; integers stay integral.
    Number(Number),
    /// Anything else, verbatim.
    Text(String),
}

impl CellValue {
    /// Infer a typed value from raw CSV text.
    ///
    /// Empty cells become [`CellValue::Null`], `true`/`false` in lower or
    /// upper case become booleans, decimal literals (optionally signed,
    /// with an exponent) become numbers. Everything else is kept as text.
    ///
    /// # Examples
    ///
    /// ```
    /// use csvgeo_core::CellValue;
    ///
    /// assert_eq!(CellValue::infer(""), CellValue::Null);
    /// assert_eq!(CellValue::infer("TRUE"), CellValue::Bool(true));
    /// assert_eq!(CellValue::infer("-122"), CellValue::Number((-122).into()));
    /// assert_eq!(CellValue::infer("0x10"), CellValue::Text("0x10".to_owned()));
    /// ```
    #[must_use]
    pub fn infer(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Null;
        }
        if let Some(flag) = parse_bool(raw) {
            return Self::Bool(flag);
        }
        parse_number(raw).map_or_else(|| Self::Text(raw.to_owned()), Self::Number)
    }

    /// Numeric view of the value, accepting numeric text as well.
    ///
    /// Non-finite results are rejected.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => number.as_f64(),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
            Self::Null | Self::Bool(_) => None,
        }
        .filter(|value| value.is_finite())
    }

    /// Integer view of the value, used for feature identifiers.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(number) => number.as_i64(),
            Self::Null | Self::Bool(_) | Self::Text(_) => None,
        }
    }

    /// Whether the cell was empty.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" | "TRUE" => Some(true),
        "false" | "FALSE" => Some(false),
        _ => None,
    }
}

fn parse_number(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if !is_decimal_literal(trimmed) {
        return None;
    }
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Some(Number::from(integer));
    }
    trimmed.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Accepts `-?(digits.?|.digits|digits.digits)([eE][-+]?digits)?`.
fn is_decimal_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };
    is_mantissa(mantissa) && exponent.is_none_or(is_exponent)
}

fn is_mantissa(text: &str) -> bool {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    (!whole.is_empty() || !fraction.is_empty()) && all_digits(whole) && all_digits(fraction)
}

fn is_exponent(text: &str) -> bool {
    let digits = text
        .strip_prefix(['-', '+'])
        .unwrap_or(text);
    !digits.is_empty() && all_digits(digits)
}

fn all_digits(text: &str) -> bool {
    text.bytes().all(|byte| byte.is_ascii_digit())
}

/// One parsed CSV record keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, CellValue>);

impl Row {
    /// Create an empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set a column value, returning the previous value if any.
    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) -> Option<CellValue> {
        self.0.insert(column.into(), value)
    }

    /// Look up a column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.0.get(column)
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate columns in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.0.iter().map(|(column, value)| (column.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(column, value)| (column.into(), value))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", CellValue::Number(1.into()))]
    #[case("-122", CellValue::Number((-122).into()))]
    #[case("007", CellValue::Number(7.into()))]
    #[case(" 42 ", CellValue::Number(42.into()))]
    #[case("true", CellValue::Bool(true))]
    #[case("FALSE", CellValue::Bool(false))]
    #[case("False", CellValue::Text("False".to_owned()))]
    #[case("True", CellValue::Text("True".to_owned()))]
    #[case("", CellValue::Null)]
    #[case("yes", CellValue::Text("yes".to_owned()))]
    #[case("+5", CellValue::Text("+5".to_owned()))]
    #[case("1.2.3", CellValue::Text("1.2.3".to_owned()))]
    #[case(".", CellValue::Text(".".to_owned()))]
    #[case("NaN", CellValue::Text("NaN".to_owned()))]
    #[case("inf", CellValue::Text("inf".to_owned()))]
    #[case("2024-01-01", CellValue::Text("2024-01-01".to_owned()))]
    #[case("1e", CellValue::Text("1e".to_owned()))]
    fn infers_scalar_types(#[case] raw: &str, #[case] expected: CellValue) {
        assert_eq!(CellValue::infer(raw), expected);
    }

    #[rstest]
    #[case("37.5", 37.5)]
    #[case(".5", 0.5)]
    #[case("5.", 5.0)]
    #[case("-1.5e2", -150.0)]
    #[case("1E+3", 1000.0)]
    fn infers_floating_point_literals(#[case] raw: &str, #[case] expected: f64) {
        let value = CellValue::infer(raw);
        assert!(matches!(value, CellValue::Number(_)), "got {value:?}");
        assert_eq!(value.as_f64(), Some(expected));
    }

    #[rstest]
    fn integer_literals_serialise_without_fraction() {
        let row: Row = [("id", CellValue::infer("12")), ("score", CellValue::infer("0.25"))]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&row).expect("row should serialise");

        assert_eq!(json, r#"{"id":12,"score":0.25}"#);
    }

    #[rstest]
    fn numeric_text_is_readable_as_float() {
        assert_eq!(CellValue::Text(" -121.5 ".to_owned()).as_f64(), Some(-121.5));
        assert_eq!(CellValue::Text("north".to_owned()).as_f64(), None);
        assert_eq!(CellValue::Text("inf".to_owned()).as_f64(), None);
        assert_eq!(CellValue::Bool(true).as_f64(), None);
        assert_eq!(CellValue::Null.as_f64(), None);
    }

    #[rstest]
    fn null_cells_serialise_as_json_null() {
        let mut row = Row::new();
        row.insert("name", CellValue::Null);

        assert!(row.get("name").is_some_and(CellValue::is_null));
        assert_eq!(
            serde_json::to_value(&row).expect("row should serialise"),
            serde_json::json!({ "name": null })
        );
    }
}
