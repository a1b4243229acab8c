//! Legend bins for color scales.

use grapher_model::CellValue;
use serde::{Deserialize, Serialize};

/// One bin of a color legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Bin {
    Numeric {
        min: f64,
        max: f64,
        closed_start: bool,
        closed_end: bool,
        label: Option<String>,
    },
    Categorical {
        value: String,
        label: Option<String>,
    },
}

impl Bin {
    /// A numeric bin `[min, max)`, the usual shape of all but the last bin.
    pub fn numeric(min: f64, max: f64) -> Self {
        Bin::Numeric {
            min,
            max,
            closed_start: true,
            closed_end: false,
            label: None,
        }
    }

    pub fn categorical(value: impl Into<String>) -> Self {
        Bin::Categorical {
            value: value.into(),
            label: None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Bin::Numeric {
                label: Some(label), ..
            }
            | Bin::Categorical {
                label: Some(label), ..
            } => label.clone(),
            Bin::Numeric {
                min,
                max,
                closed_start,
                closed_end,
                ..
            } => format!(
                "{}{min}, {max}{}",
                if *closed_start { '[' } else { '(' },
                if *closed_end { ']' } else { ')' }
            ),
            Bin::Categorical { value, .. } => value.clone(),
        }
    }
}

/// Whether `value` falls into `bin`. Error cells fall into no bin.
pub fn bin_contains(bin: &Bin, value: &CellValue) -> bool {
    match bin {
        Bin::Numeric {
            min,
            max,
            closed_start,
            closed_end,
            ..
        } => value.as_f64().is_some_and(|number| {
            let above = if *closed_start { number >= *min } else { number > *min };
            let below = if *closed_end { number <= *max } else { number < *max };
            above && below
        }),
        Bin::Categorical { value: category, .. } => {
            value.is_valid() && value.to_key_string() == *category
        }
    }
}

/// Bins are equal when they cover the same values. Labels do not count.
pub fn bins_equal(left: &Bin, right: &Bin) -> bool {
    match (left, right) {
        (
            Bin::Numeric {
                min: min_a,
                max: max_a,
                closed_start: start_a,
                closed_end: end_a,
                ..
            },
            Bin::Numeric {
                min: min_b,
                max: max_b,
                closed_start: start_b,
                closed_end: end_b,
                ..
            },
        ) => min_a == min_b && max_a == max_b && start_a == start_b && end_a == end_b,
        (Bin::Categorical { value: a, .. }, Bin::Categorical { value: b, .. }) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use grapher_model::ErrorValue;

    use super::*;

    #[test]
    fn test_numeric_bounds() {
        let bin = Bin::numeric(0.0, 10.0);
        assert!(bin_contains(&bin, &CellValue::Number(0.0)));
        assert!(!bin_contains(&bin, &CellValue::Number(10.0)));
        assert!(!bin_contains(&bin, &CellValue::Error(ErrorValue::ValueTooLow)));
        assert_eq!(bin.label(), "[0, 10)");
    }

    #[test]
    fn test_categorical_and_equality() {
        let asia = Bin::categorical("Asia");
        assert!(bin_contains(&asia, &CellValue::Text("Asia".into())));
        let labelled = Bin::Categorical {
            value: "Asia".into(),
            label: Some("Asian countries".into()),
        };
        assert!(bins_equal(&asia, &labelled));
        assert!(!bins_equal(&asia, &Bin::numeric(0.0, 1.0)));
        assert_eq!(labelled.label(), "Asian countries");
    }
}
