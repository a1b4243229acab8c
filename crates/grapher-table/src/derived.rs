//! Column definition transforms.
//!
//! A [`ColumnDef`] may carry a `transform` expression such as
//! `divideBy gdp population`. The column's values are then computed from
//! other columns of the table instead of being read from the data.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use grapher_model::{
    CellValue, ColumnDef, ColumnTypeName, ErrorValue, GrapherError, Result, TransformRecord,
};
use tracing::{debug, warn};

use crate::owid::{EntitySeries, series_from};
use crate::rolling::{RollingAlignment, rolling_values};
use crate::table::CoreTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    EqualTo,
    NotEqualTo,
}

impl FromStr for Comparison {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "isGreaterThan" | ">" => Ok(Self::GreaterThan),
            "isGreaterThanOrEqual" | ">=" => Ok(Self::GreaterThanOrEqual),
            "isLessThan" | "<" => Ok(Self::LessThan),
            "isLessThanOrEqual" | "<=" => Ok(Self::LessThanOrEqual),
            "isEqualTo" | "==" | "=" => Ok(Self::EqualTo),
            "isNotEqualTo" | "!=" => Ok(Self::NotEqualTo),
            other => Err(format!("unknown comparison `{other}`")),
        }
    }
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GreaterThan => "isGreaterThan",
            Self::GreaterThanOrEqual => "isGreaterThanOrEqual",
            Self::LessThan => "isLessThan",
            Self::LessThanOrEqual => "isLessThanOrEqual",
            Self::EqualTo => "isEqualTo",
            Self::NotEqualTo => "isNotEqualTo",
        }
    }

    /// Numeric comparison when both sides are numbers, string equality
    /// otherwise. Ordering operators never hold for text.
    fn holds(self, value: &CellValue, operand: &str) -> bool {
        match (value.as_f64(), operand.parse::<f64>()) {
            (Some(left), Ok(right)) => match self {
                Self::GreaterThan => left > right,
                Self::GreaterThanOrEqual => left >= right,
                Self::LessThan => left < right,
                Self::LessThanOrEqual => left <= right,
                Self::EqualTo => left == right,
                Self::NotEqualTo => left != right,
            },
            _ => match self {
                Self::EqualTo => value.to_key_string() == operand,
                Self::NotEqualTo => value.to_key_string() != operand,
                _ => false,
            },
        }
    }
}

/// A parsed column transform expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnTransform {
    Duplicate {
        source: String,
    },
    MultiplyBy {
        source: String,
        factor: f64,
    },
    DivideBy {
        numerator: String,
        denominator: String,
    },
    Subtract {
        minuend: String,
        subtrahend: String,
    },
    AsPercentageOf {
        numerator: String,
        denominator: String,
    },
    /// Cumulative sum in row order. Error cells keep their error and do
    /// not reset the total.
    RunningTotal {
        source: String,
    },
    RollingAverage {
        time: String,
        entity: String,
        source: String,
        window: usize,
    },
    /// Change in percent against the value `window` time units earlier.
    PercentChange {
        time: String,
        entity: String,
        source: String,
        window: i64,
    },
    /// Keeps values satisfying the comparison; others become
    /// [`ErrorValue::FilteredValue`].
    Where {
        source: String,
        comparison: Comparison,
        operand: String,
    },
}

impl ColumnTransform {
    pub fn parse(expression: &str) -> Result<Self> {
        let invalid = |message: String| GrapherError::InvalidTransform {
            expression: expression.to_string(),
            message,
        };
        let words: Vec<&str> = expression.split_whitespace().collect();
        let Some((&name, args)) = words.split_first() else {
            return Err(invalid("empty expression".to_string()));
        };
        let arity = |count: usize| {
            if args.len() == count {
                Ok(())
            } else {
                Err(invalid(format!("{name} takes {count} arguments, got {}", args.len())))
            }
        };
        let owned = |idx: usize| args[idx].to_string();

        let transform = match name {
            "duplicate" => {
                arity(1)?;
                Self::Duplicate { source: owned(0) }
            }
            "multiplyBy" => {
                arity(2)?;
                let factor = args[1]
                    .parse::<f64>()
                    .map_err(|_| invalid(format!("factor `{}` is not a number", args[1])))?;
                Self::MultiplyBy {
                    source: owned(0),
                    factor,
                }
            }
            "divideBy" => {
                arity(2)?;
                Self::DivideBy {
                    numerator: owned(0),
                    denominator: owned(1),
                }
            }
            "subtract" => {
                arity(2)?;
                Self::Subtract {
                    minuend: owned(0),
                    subtrahend: owned(1),
                }
            }
            "asPercentageOf" => {
                arity(2)?;
                Self::AsPercentageOf {
                    numerator: owned(0),
                    denominator: owned(1),
                }
            }
            "runningTotal" => {
                arity(1)?;
                Self::RunningTotal { source: owned(0) }
            }
            "rollingAverage" => {
                arity(4)?;
                let window = args[3]
                    .parse::<usize>()
                    .map_err(|_| invalid(format!("window `{}` is not a count", args[3])))?;
                Self::RollingAverage {
                    time: owned(0),
                    entity: owned(1),
                    source: owned(2),
                    window,
                }
            }
            "percentChange" => {
                arity(4)?;
                let window = args[3]
                    .parse::<i64>()
                    .map_err(|_| invalid(format!("window `{}` is not a number", args[3])))?;
                Self::PercentChange {
                    time: owned(0),
                    entity: owned(1),
                    source: owned(2),
                    window,
                }
            }
            "where" => {
                if args.len() < 3 {
                    return Err(invalid(format!("where takes 3 arguments, got {}", args.len())));
                }
                let comparison = args[1].parse::<Comparison>().map_err(invalid)?;
                Self::Where {
                    source: owned(0),
                    comparison,
                    // operands may contain spaces
                    operand: args[2..].join(" "),
                }
            }
            other => return Err(invalid(format!("unknown transform `{other}`"))),
        };
        Ok(transform)
    }

    /// Slugs the transform reads.
    pub fn source_slugs(&self) -> Vec<&str> {
        match self {
            Self::Duplicate { source }
            | Self::MultiplyBy { source, .. }
            | Self::RunningTotal { source }
            | Self::Where { source, .. } => vec![source.as_str()],
            Self::DivideBy {
                numerator,
                denominator,
            }
            | Self::AsPercentageOf {
                numerator,
                denominator,
            } => vec![numerator.as_str(), denominator.as_str()],
            Self::Subtract {
                minuend,
                subtrahend,
            } => vec![minuend.as_str(), subtrahend.as_str()],
            Self::RollingAverage {
                time,
                entity,
                source,
                ..
            }
            | Self::PercentChange {
                time,
                entity,
                source,
                ..
            } => vec![time.as_str(), entity.as_str(), source.as_str()],
        }
    }

    /// Type of the computed column when its definition names none.
    pub fn default_type(&self, table: &CoreTable) -> ColumnTypeName {
        match self {
            Self::Duplicate { source } | Self::Where { source, .. } => table
                .column_def(source)
                .map_or(ColumnTypeName::Numeric, ColumnDef::resolved_type),
            Self::AsPercentageOf { .. } => ColumnTypeName::Percentage,
            Self::PercentChange { .. } => ColumnTypeName::PercentChangeOverTime,
            Self::DivideBy { .. } => ColumnTypeName::Ratio,
            _ => ColumnTypeName::Numeric,
        }
    }

    /// Computes the column. Fails only when a referenced slug is missing.
    pub fn evaluate(&self, table: &CoreTable) -> Result<Vec<CellValue>> {
        for slug in self.source_slugs() {
            table.column_def(slug)?;
        }
        let computed = match self {
            Self::Duplicate { source } => column_values(table, source)?.to_vec(),
            Self::MultiplyBy { source, factor } => column_values(table, source)?
                .iter()
                .map(|value| numeric(value, |number| CellValue::Number(number * factor)))
                .collect(),
            Self::DivideBy {
                numerator,
                denominator,
            } => binary(
                column_values(table, numerator)?,
                column_values(table, denominator)?,
                |a, b| divide(a, b, 1.0),
            ),
            Self::AsPercentageOf {
                numerator,
                denominator,
            } => binary(
                column_values(table, numerator)?,
                column_values(table, denominator)?,
                |a, b| divide(a, b, 100.0),
            ),
            Self::Subtract {
                minuend,
                subtrahend,
            } => binary(
                column_values(table, minuend)?,
                column_values(table, subtrahend)?,
                |a, b| CellValue::Number(a - b),
            ),
            Self::RunningTotal { source } => {
                let mut total = 0.0;
                column_values(table, source)?
                    .iter()
                    .map(|value| {
                        numeric(value, |number| {
                            total += number;
                            CellValue::Number(total)
                        })
                    })
                    .collect()
            }
            Self::RollingAverage {
                time,
                entity,
                source,
                window,
            } => rolling_values(
                column_values(table, source)?,
                &series_by(table, entity, time)?,
                *window,
                RollingAlignment::Right,
            ),
            Self::PercentChange {
                time,
                entity,
                source,
                window,
            } => percent_change(
                column_values(table, source)?,
                &series_by(table, entity, time)?,
                *window,
            ),
            Self::Where {
                source,
                comparison,
                operand,
            } => column_values(table, source)?
                .iter()
                .map(|value| match value {
                    CellValue::Error(_) => value.clone(),
                    _ if comparison.holds(value, operand) => value.clone(),
                    _ => CellValue::Error(ErrorValue::FilteredValue),
                })
                .collect(),
        };
        Ok(computed)
    }
}

impl fmt::Display for ColumnTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { source } => write!(f, "duplicate {source}"),
            Self::MultiplyBy { source, factor } => write!(f, "multiplyBy {source} {factor}"),
            Self::DivideBy {
                numerator,
                denominator,
            } => write!(f, "divideBy {numerator} {denominator}"),
            Self::Subtract {
                minuend,
                subtrahend,
            } => write!(f, "subtract {minuend} {subtrahend}"),
            Self::AsPercentageOf {
                numerator,
                denominator,
            } => write!(f, "asPercentageOf {numerator} {denominator}"),
            Self::RunningTotal { source } => write!(f, "runningTotal {source}"),
            Self::RollingAverage {
                time,
                entity,
                source,
                window,
            } => write!(f, "rollingAverage {time} {entity} {source} {window}"),
            Self::PercentChange {
                time,
                entity,
                source,
                window,
            } => write!(f, "percentChange {time} {entity} {source} {window}"),
            Self::Where {
                source,
                comparison,
                operand,
            } => write!(f, "where {source} {} {operand}", comparison.as_str()),
        }
    }
}

fn column_values<'t>(table: &'t CoreTable, slug: &str) -> Result<&'t [CellValue]> {
    Ok(table.column(slug)?.values())
}

fn numeric<F>(value: &CellValue, compute: F) -> CellValue
where
    F: FnOnce(f64) -> CellValue,
{
    match value {
        CellValue::Error(_) => value.clone(),
        _ => value
            .as_f64()
            .map_or(CellValue::Error(ErrorValue::NaNButShouldBeNumber), compute),
    }
}

/// Row-wise combination. The left operand's error wins over the right's.
fn binary<F>(left: &[CellValue], right: &[CellValue], compute: F) -> Vec<CellValue>
where
    F: Fn(f64, f64) -> CellValue,
{
    left.iter()
        .zip(right)
        .map(|(a, b)| match (a, b) {
            (CellValue::Error(_), _) => a.clone(),
            (_, CellValue::Error(_)) => b.clone(),
            _ => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => compute(a, b),
                _ => CellValue::Error(ErrorValue::NaNButShouldBeNumber),
            },
        })
        .collect()
}

fn divide(numerator: f64, denominator: f64, scale: f64) -> CellValue {
    if denominator == 0.0 {
        CellValue::Error(ErrorValue::DivideByZeroError)
    } else {
        CellValue::Number(numerator / denominator * scale)
    }
}

/// Series keyed by explicit entity and time slugs rather than the table's
/// well-known ones.
fn series_by(table: &CoreTable, entity_slug: &str, time_slug: &str) -> Result<Vec<EntitySeries>> {
    let entities = table.column(entity_slug)?.values();
    let times = table.column(time_slug)?.values();
    Ok(series_from(entities, times))
}

fn percent_change(values: &[CellValue], series: &[EntitySeries], window: i64) -> Vec<CellValue> {
    let mut out = values.to_vec();
    for entity in series {
        let mut by_time: HashMap<i64, usize> = HashMap::with_capacity(entity.rows.len());
        for &(time, row) in &entity.rows {
            by_time.entry(time).or_insert(row);
        }
        for &(time, row) in &entity.rows {
            if values[row].is_error() {
                continue;
            }
            let base = time
                .checked_sub(window)
                .and_then(|base_time| by_time.get(&base_time))
                .and_then(|&base_row| values[base_row].as_f64());
            out[row] = match (values[row].as_f64(), base) {
                (_, None) => CellValue::Error(ErrorValue::NoValueToCompareAgainst),
                (Some(_), Some(base)) if base == 0.0 => {
                    CellValue::Error(ErrorValue::DivideByZeroError)
                }
                (Some(number), Some(base)) => CellValue::Number((number - base) / base * 100.0),
                (None, Some(_)) => CellValue::Error(ErrorValue::NaNButShouldBeNumber),
            };
        }
    }
    out
}

impl CoreTable {
    /// Adds or replaces the column `def` describes by evaluating its
    /// transform expression.
    ///
    /// A bad expression or a missing source slug does not fail the table:
    /// the column is filled with [`ErrorValue::MissingValuePlaceholder`]
    /// and a warning is logged. Fails only when `def` has no transform.
    pub fn add_transform_column(&self, def: &ColumnDef) -> Result<CoreTable> {
        let expression = def.transform.as_deref().ok_or_else(|| GrapherError::InvalidTransform {
            expression: String::new(),
            message: format!("column {} has no transform", def.slug),
        })?;

        let evaluated = ColumnTransform::parse(expression)
            .and_then(|transform| Ok((transform.evaluate(self)?, transform)));
        let (values, column_type) = match evaluated {
            Ok((values, transform)) => {
                debug!(slug = %def.slug, transform = %transform, "computed transform column");
                let column_type = def
                    .column_type
                    .unwrap_or_else(|| transform.default_type(self));
                (values, column_type)
            }
            Err(err) => {
                warn!(
                    slug = %def.slug,
                    expression,
                    error = %err,
                    "column transform failed; filling with placeholders"
                );
                (
                    vec![CellValue::Error(ErrorValue::MissingValuePlaceholder); self.row_count()],
                    def.resolved_type(),
                )
            }
        };

        let def = def.clone().with_type(column_type);
        let params = vec![def.slug.clone(), expression.to_string()];
        self.derive(
            TransformRecord::new("transformColumn", params, self.row_count()),
            self.columns_with(def, values),
            self.row_count(),
        )
    }
}
