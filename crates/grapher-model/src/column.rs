//! Column schema types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Semantic type of a column, as named in column definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnTypeName {
    String,
    Categorical,
    Region,
    Continent,
    SeriesAnnotation,
    EntityName,
    EntityCode,
    EntityId,
    Color,
    Boolean,
    NumberOrString,
    Numeric,
    Integer,
    Currency,
    Percentage,
    DecimalPercentage,
    RelativePercentage,
    PercentChangeOverTime,
    Population,
    PopulationDensity,
    Age,
    Ratio,
    Year,
    Day,
    Date,
    Quarter,
    Time,
}

impl ColumnTypeName {
    pub const ALL: [ColumnTypeName; 27] = [
        ColumnTypeName::String,
        ColumnTypeName::Categorical,
        ColumnTypeName::Region,
        ColumnTypeName::Continent,
        ColumnTypeName::SeriesAnnotation,
        ColumnTypeName::EntityName,
        ColumnTypeName::EntityCode,
        ColumnTypeName::EntityId,
        ColumnTypeName::Color,
        ColumnTypeName::Boolean,
        ColumnTypeName::NumberOrString,
        ColumnTypeName::Numeric,
        ColumnTypeName::Integer,
        ColumnTypeName::Currency,
        ColumnTypeName::Percentage,
        ColumnTypeName::DecimalPercentage,
        ColumnTypeName::RelativePercentage,
        ColumnTypeName::PercentChangeOverTime,
        ColumnTypeName::Population,
        ColumnTypeName::PopulationDensity,
        ColumnTypeName::Age,
        ColumnTypeName::Ratio,
        ColumnTypeName::Year,
        ColumnTypeName::Day,
        ColumnTypeName::Date,
        ColumnTypeName::Quarter,
        ColumnTypeName::Time,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Categorical => "Categorical",
            Self::Region => "Region",
            Self::Continent => "Continent",
            Self::SeriesAnnotation => "SeriesAnnotation",
            Self::EntityName => "EntityName",
            Self::EntityCode => "EntityCode",
            Self::EntityId => "EntityId",
            Self::Color => "Color",
            Self::Boolean => "Boolean",
            Self::NumberOrString => "NumberOrString",
            Self::Numeric => "Numeric",
            Self::Integer => "Integer",
            Self::Currency => "Currency",
            Self::Percentage => "Percentage",
            Self::DecimalPercentage => "DecimalPercentage",
            Self::RelativePercentage => "RelativePercentage",
            Self::PercentChangeOverTime => "PercentChangeOverTime",
            Self::Population => "Population",
            Self::PopulationDensity => "PopulationDensity",
            Self::Age => "Age",
            Self::Ratio => "Ratio",
            Self::Year => "Year",
            Self::Day => "Day",
            Self::Date => "Date",
            Self::Quarter => "Quarter",
            Self::Time => "Time",
        }
    }

    /// True for types whose valid cells are numbers (including time ordinals).
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Numeric
                | Self::Integer
                | Self::Currency
                | Self::Percentage
                | Self::DecimalPercentage
                | Self::RelativePercentage
                | Self::PercentChangeOverTime
                | Self::Population
                | Self::PopulationDensity
                | Self::Age
                | Self::Ratio
                | Self::EntityId
        ) || self.is_time()
    }

    pub fn is_time(&self) -> bool {
        matches!(
            self,
            Self::Year | Self::Day | Self::Date | Self::Quarter | Self::Time
        )
    }
}

impl fmt::Display for ColumnTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnTypeName {
    type Err = String;

    /// Case-insensitive; also accepts the lowercase spellings used in
    /// hand-written `columns` blocks.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("Unknown column type: {s}"))
    }
}

/// Static schema for one column.
///
/// Definitions are values: a transform that changes a column's type or unit
/// builds a new definition instead of editing the old one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub slug: String,
    /// `None` asks the table to detect the type from the data.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub column_type: Option<ColumnTypeName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_decimal_places: Option<u8>,
    /// Column transform expression, e.g. `divideBy gdp population`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    /// Interpolation tolerance in time units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<i64>,
    /// Slug this column was derived from, when produced by a transform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_slug: Option<String>,
}

impl ColumnDef {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_type(mut self, column_type: ColumnTypeName) -> Self {
        self.column_type = Some(column_type);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn with_short_unit(mut self, short_unit: impl Into<String>) -> Self {
        self.short_unit = Some(short_unit.into());
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: impl Into<String>) -> Self {
        self.transform = Some(transform.into());
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: i64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    #[must_use]
    pub fn with_source_slug(mut self, source: impl Into<String>) -> Self {
        self.source_slug = Some(source.into());
        self
    }

    /// The type the column is stored as; undetected columns are strings.
    pub fn resolved_type(&self) -> ColumnTypeName {
        self.column_type.unwrap_or(ColumnTypeName::String)
    }

    /// Display name, falling back to the slug.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_type_parses_case_insensitively() {
        assert_eq!(
            "numeric".parse::<ColumnTypeName>().unwrap(),
            ColumnTypeName::Numeric
        );
        assert_eq!(
            " Quarter ".parse::<ColumnTypeName>().unwrap(),
            ColumnTypeName::Quarter
        );
        assert!("Currencyish".parse::<ColumnTypeName>().is_err());
    }

    #[test]
    fn time_types_are_numeric() {
        assert!(ColumnTypeName::Year.is_numeric());
        assert!(ColumnTypeName::Quarter.is_time());
        assert!(!ColumnTypeName::EntityName.is_numeric());
    }

    #[test]
    fn display_name_falls_back_to_slug() {
        let def = ColumnDef::new("gdp");
        assert_eq!(def.display_name(), "gdp");
        assert_eq!(def.with_name("GDP").display_name(), "GDP");
    }
}
