//! Cell values and the error sentinels that flow through column stores.
//!
//! A column store never holds a "null". Every absent or unusable cell carries
//! an [`ErrorValue`] naming why it is absent, so downstream consumers can
//! report the reason instead of guessing.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Why a cell holds no usable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorValue {
    NaNButShouldBeNumber,
    DroppedForTesting,
    InvalidOnALogAxis,
    UndefinedButShouldBeNumber,
    NullButShouldBeNumber,
    BlankButShouldBeNumber,
    UndefinedButShouldBeString,
    NullButShouldBeString,
    MissingValuePlaceholder,
    DivideByZeroError,
    NoValueWithinTolerance,
    NoMatchingValueAfterJoin,
    ValueTooLow,
    NoValueToCompareAgainst,
    FilteredValue,
    NoValueForInterpolation,
    InvalidQuarterValue,
    InvalidNegativeValue,
}

impl ErrorValue {
    pub const ALL: [ErrorValue; 18] = [
        ErrorValue::NaNButShouldBeNumber,
        ErrorValue::DroppedForTesting,
        ErrorValue::InvalidOnALogAxis,
        ErrorValue::UndefinedButShouldBeNumber,
        ErrorValue::NullButShouldBeNumber,
        ErrorValue::BlankButShouldBeNumber,
        ErrorValue::UndefinedButShouldBeString,
        ErrorValue::NullButShouldBeString,
        ErrorValue::MissingValuePlaceholder,
        ErrorValue::DivideByZeroError,
        ErrorValue::NoValueWithinTolerance,
        ErrorValue::NoMatchingValueAfterJoin,
        ErrorValue::ValueTooLow,
        ErrorValue::NoValueToCompareAgainst,
        ErrorValue::FilteredValue,
        ErrorValue::NoValueForInterpolation,
        ErrorValue::InvalidQuarterValue,
        ErrorValue::InvalidNegativeValue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NaNButShouldBeNumber => "NaNButShouldBeNumber",
            Self::DroppedForTesting => "DroppedForTesting",
            Self::InvalidOnALogAxis => "InvalidOnALogAxis",
            Self::UndefinedButShouldBeNumber => "UndefinedButShouldBeNumber",
            Self::NullButShouldBeNumber => "NullButShouldBeNumber",
            Self::BlankButShouldBeNumber => "BlankButShouldBeNumber",
            Self::UndefinedButShouldBeString => "UndefinedButShouldBeString",
            Self::NullButShouldBeString => "NullButShouldBeString",
            Self::MissingValuePlaceholder => "MissingValuePlaceholder",
            Self::DivideByZeroError => "DivideByZeroError",
            Self::NoValueWithinTolerance => "NoValueWithinTolerance",
            Self::NoMatchingValueAfterJoin => "NoMatchingValueAfterJoin",
            Self::ValueTooLow => "ValueTooLow",
            Self::NoValueToCompareAgainst => "NoValueToCompareAgainst",
            Self::FilteredValue => "FilteredValue",
            Self::NoValueForInterpolation => "NoValueForInterpolation",
            Self::InvalidQuarterValue => "InvalidQuarterValue",
            Self::InvalidNegativeValue => "InvalidNegativeValue",
        }
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|value| value.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("Unknown error value: {s}"))
    }
}

/// One parsed cell of a column store.
///
/// Dates, days, years and quarters are stored as [`CellValue::Integer`]
/// ordinals; their column type decides how they are displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Number(f64),
    Integer(i64),
    Text(String),
    Boolean(bool),
    Error(ErrorValue),
}

impl CellValue {
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    pub fn is_valid(&self) -> bool {
        !self.is_error()
    }

    pub fn error(&self) -> Option<ErrorValue> {
        match self {
            CellValue::Error(err) => Some(*err),
            _ => None,
        }
    }

    /// Numeric view of the cell. Text and booleans are not numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Integral view of the cell; a float only qualifies when it has no fraction.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(value) => Some(*value),
            CellValue::Number(value) if value.fract() == 0.0 && value.is_finite() => {
                Some(*value as i64)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Plain string rendering used for keys (entity names, choice values).
    /// Error cells render as the empty string.
    pub fn to_key_string(&self) -> String {
        match self {
            CellValue::Number(value) => value.to_string(),
            CellValue::Integer(value) => value.to_string(),
            CellValue::Text(value) => value.clone(),
            CellValue::Boolean(value) => value.to_string(),
            CellValue::Error(_) => String::new(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<ErrorValue> for CellValue {
    fn from(value: ErrorValue) -> Self {
        CellValue::Error(value)
    }
}

/// Total ordering used by sorts: numbers before booleans before text,
/// error cells always last. NaN never reaches a store.
pub fn compare_cells(left: &CellValue, right: &CellValue) -> Ordering {
    fn rank(value: &CellValue) -> u8 {
        match value {
            CellValue::Number(_) | CellValue::Integer(_) => 0,
            CellValue::Boolean(_) => 1,
            CellValue::Text(_) => 2,
            CellValue::Error(_) => 3,
        }
    }
    match (left, right) {
        (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
        (CellValue::Boolean(a), CellValue::Boolean(b)) => a.cmp(b),
        (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
        (CellValue::Error(_), CellValue::Error(_)) => Ordering::Equal,
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            _ => rank(left).cmp(&rank(right)),
        },
    }
}
