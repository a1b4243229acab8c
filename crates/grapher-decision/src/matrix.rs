//! Resolving a choice state to one configuration row.

use std::collections::{BTreeMap, HashSet};

use grapher_model::{GrapherError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::dimension::{ChoiceKind, Dimension, parse_choice_header};
use crate::state::ChoiceState;

/// Payload field marking the row a fresh session starts from.
pub const DEFAULT_VIEW_FIELD: &str = "defaultView";

/// One authored configuration: its choice cells and everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRow {
    /// Position in author order.
    pub index: usize,
    /// Non-blank choice cells by dimension name. A dimension missing here
    /// does not apply to the row.
    pub choices: BTreeMap<String, String>,
    /// Payload cells by header.
    pub fields: BTreeMap<String, String>,
}

impl DecisionRow {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            choices: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_choice(mut self, dimension: impl Into<String>, value: impl Into<String>) -> Self {
        self.choices.insert(dimension.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn choice(&self, dimension: &str) -> Option<&str> {
        self.choices.get(dimension).map(String::as_str)
    }

    /// A payload cell, with blank cells reported as absent.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Whether a payload field holds a `true` flag.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.field(name)?.to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

/// Outcome of resolving a choice state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'m> {
    /// The first row, in author order, matching the state.
    Resolved {
        /// The state actually matched, after unavailable values were replaced.
        state: ChoiceState,
        row: &'m DecisionRow,
    },
    /// Nothing in the matrix matches.
    NoMatchingRow,
}

impl<'m> Resolution<'m> {
    pub fn row(&self) -> Option<&'m DecisionRow> {
        match self {
            Resolution::Resolved { row, .. } => Some(row),
            Resolution::NoMatchingRow => None,
        }
    }

    pub fn state(&self) -> Option<&ChoiceState> {
        match self {
            Resolution::Resolved { state, .. } => Some(state),
            Resolution::NoMatchingRow => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }
}

/// One option of a dimension and whether choosing it can resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionAvailability {
    pub value: String,
    pub available: bool,
}

/// What a choice control should show for the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceAvailability {
    pub name: String,
    pub kind: ChoiceKind,
    pub selected: Option<String>,
    pub options: Vec<OptionAvailability>,
    /// No option applies under the current state.
    pub hidden: bool,
}

/// Ordered dimensions and ordered rows. Row order is precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionMatrix {
    dimensions: Vec<Dimension>,
    rows: Vec<DecisionRow>,
}

impl DecisionMatrix {
    /// Builds a matrix from explicit dimensions and rows.
    ///
    /// Fails on repeated dimension names and on rows choosing a dimension
    /// that was not declared. Row values outside a radio or dropdown
    /// dimension's options are appended to them.
    pub fn new(mut dimensions: Vec<Dimension>, mut rows: Vec<DecisionRow>) -> Result<Self> {
        let mut seen = HashSet::new();
        for dim in &dimensions {
            if !seen.insert(dim.name.as_str()) {
                return Err(GrapherError::DuplicateDimension(dim.name.clone()));
            }
        }

        for row in &mut rows {
            let mut normalized = BTreeMap::new();
            for (name, cell) in &row.choices {
                let dim = dimensions
                    .iter_mut()
                    .find(|dim| &dim.name == name)
                    .ok_or_else(|| GrapherError::UnknownDimension(name.clone()))?;
                let Some(value) = dim.normalize(cell) else {
                    continue;
                };
                if !dim.has_option(&value) {
                    match dim.kind {
                        ChoiceKind::Checkbox => {
                            warn!(dimension = %name, value = %value, row = row.index, "checkbox value is neither true nor false");
                        }
                        ChoiceKind::Radio | ChoiceKind::Dropdown => dim.options.push(value.clone()),
                    }
                }
                normalized.insert(name.clone(), value);
            }
            row.choices = normalized;
        }

        debug!(
            dimensions = dimensions.len(),
            rows = rows.len(),
            "decision matrix built"
        );
        Ok(Self { dimensions, rows })
    }

    /// Builds a matrix from a header row plus data rows.
    ///
    /// Headers ending in ` Radio`, ` Dropdown` or ` Checkbox` become
    /// dimensions whose options are their distinct values in order of first
    /// appearance. Every other header is a payload field.
    pub fn from_matrix(matrix: &[Vec<String>]) -> Result<Self> {
        let Some((header, body)) = matrix.split_first() else {
            return Self::new(Vec::new(), Vec::new());
        };

        let mut dimensions = Vec::new();
        let columns: Vec<Option<String>> = header
            .iter()
            .map(|cell| {
                parse_choice_header(cell).map(|(name, kind)| {
                    dimensions.push(Dimension::new(name.clone(), kind, Vec::new()));
                    name
                })
            })
            .collect();

        let rows = body
            .iter()
            .enumerate()
            .map(|(index, cells)| {
                let mut row = DecisionRow::new(index);
                for ((column, dimension), cell) in header.iter().zip(&columns).zip(cells) {
                    match dimension {
                        Some(name) if !cell.trim().is_empty() => {
                            row.choices.insert(name.clone(), cell.clone());
                        }
                        Some(_) => {}
                        None => {
                            row.fields.insert(column.trim().to_string(), cell.clone());
                        }
                    }
                }
                row
            })
            .collect();

        Self::new(dimensions, rows)
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimension(&self, name: &str) -> Result<&Dimension> {
        self.dimensions
            .iter()
            .find(|dim| dim.name == name)
            .ok_or_else(|| GrapherError::UnknownDimension(name.to_string()))
    }

    pub fn rows(&self) -> &[DecisionRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A row agrees with the state on `dims` when each of its cells there is
    /// blank or equal to the selected value. A set cell never matches an
    /// unset dimension.
    fn agrees(row: &DecisionRow, dims: &[Dimension], state: &ChoiceState) -> bool {
        dims.iter().all(|dim| match (row.choice(&dim.name), state.get(&dim.name)) {
            (None, _) => true,
            (Some(cell), Some(selected)) => cell == selected,
            (Some(_), None) => false,
        })
    }

    /// Rows agreeing with `state` on every dimension before `position` whose
    /// cell at `position` is exactly `value`.
    fn rows_with<'s>(
        &'s self,
        state: &'s ChoiceState,
        position: usize,
        value: &'s str,
    ) -> impl Iterator<Item = &'s DecisionRow> + 's {
        let earlier = &self.dimensions[..position];
        let name = &self.dimensions[position].name;
        self.rows.iter().filter(move |row| {
            row.choice(name) == Some(value) && Self::agrees(row, earlier, state)
        })
    }

    fn available_at(&self, state: &ChoiceState, position: usize) -> Vec<&str> {
        self.dimensions[position]
            .options
            .iter()
            .map(String::as_str)
            .filter(|&option| self.rows_with(state, position, option).next().is_some())
            .collect()
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.dimensions
            .iter()
            .position(|dim| dim.name == name)
            .ok_or_else(|| GrapherError::UnknownDimension(name.to_string()))
    }

    /// Whether choosing `value` for `dimension` can still resolve given the
    /// selections of the dimensions declared before it.
    pub fn is_option_available(
        &self,
        state: &ChoiceState,
        dimension: &str,
        value: &str,
    ) -> Result<bool> {
        let position = self.position(dimension)?;
        Ok(self.rows_with(state, position, value).next().is_some())
    }

    /// Options of `dimension` that can still resolve, in author order.
    pub fn available_options(&self, state: &ChoiceState, dimension: &str) -> Result<Vec<&str>> {
        let position = self.position(dimension)?;
        let constrained = self.constrain(state);
        Ok(self.available_at(&constrained, position))
    }

    /// Repairs `state` so it resolves.
    ///
    /// Dimensions are visited in declaration order. A selection that is
    /// still available is kept; otherwise the first available option is
    /// taken. A dimension with no available option is unset. Names that are
    /// not dimensions are dropped.
    pub fn constrain(&self, state: &ChoiceState) -> ChoiceState {
        let mut constrained = ChoiceState::new();
        for (position, dim) in self.dimensions.iter().enumerate() {
            let available = self.available_at(&constrained, position);
            let wanted = state.get(&dim.name);
            let pick = wanted
                .filter(|value| available.contains(value))
                .or_else(|| available.first().copied());
            match pick {
                Some(value) => {
                    if wanted.is_some_and(|wanted| wanted != value) {
                        debug!(dimension = %dim.name, wanted = ?wanted, chosen = %value, "choice unavailable, falling back");
                    }
                    let value = value.to_string();
                    constrained.set(dim.name.clone(), value);
                }
                None => trace!(dimension = %dim.name, "dimension does not apply"),
            }
        }
        constrained
    }

    /// Resolves `state` without repairing it.
    pub fn resolve_exact<'m>(&'m self, state: &ChoiceState) -> Resolution<'m> {
        match self
            .rows
            .iter()
            .find(|row| Self::agrees(row, &self.dimensions, state))
        {
            Some(row) => Resolution::Resolved {
                state: state.clone(),
                row,
            },
            None => Resolution::NoMatchingRow,
        }
    }

    /// Repairs `state` with [`DecisionMatrix::constrain`] and returns the
    /// first matching row in author order.
    pub fn resolve<'m>(&'m self, state: &ChoiceState) -> Resolution<'m> {
        let resolution = self.resolve_exact(&self.constrain(state));
        match resolution.row() {
            Some(row) => trace!(row = row.index, "choice state resolved"),
            None => debug!(rows = self.rows.len(), "no matching configuration"),
        }
        resolution
    }

    /// Choices of the row flagged `defaultView`, or of the first row,
    /// repaired to a resolvable state.
    pub fn default_state(&self) -> ChoiceState {
        let row = self
            .rows
            .iter()
            .find(|row| row.flag(DEFAULT_VIEW_FIELD) == Some(true))
            .or_else(|| self.rows.first());
        match row {
            Some(row) => self.constrain(&row.choices.iter().collect()),
            None => ChoiceState::new(),
        }
    }

    /// Per dimension: the selection, which options can resolve and whether
    /// the control applies at all.
    pub fn choices_with_availability(&self, state: &ChoiceState) -> Vec<ChoiceAvailability> {
        let constrained = self.constrain(state);
        self.dimensions
            .iter()
            .enumerate()
            .map(|(position, dim)| {
                let available = self.available_at(&constrained, position);
                ChoiceAvailability {
                    name: dim.name.clone(),
                    kind: dim.kind,
                    selected: constrained.get(&dim.name).map(str::to_string),
                    options: dim
                        .options
                        .iter()
                        .map(|value| OptionAvailability {
                            value: value.clone(),
                            available: available.contains(&value.as_str()),
                        })
                        .collect(),
                    hidden: available.is_empty(),
                }
            })
            .collect()
    }

    /// Encodes the set dimensions as `Name=Value` pairs joined by `&`, in
    /// declaration order.
    pub fn to_query(&self, state: &ChoiceState) -> String {
        self.dimensions
            .iter()
            .filter_map(|dim| state.get(&dim.name).map(|value| format!("{}={value}", dim.name)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Decodes [`DecisionMatrix::to_query`] output. Pairs naming unknown
    /// dimensions are skipped.
    pub fn state_from_query(&self, query: &str) -> ChoiceState {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = ChoiceState::new();
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let Some((name, value)) = pair.split_once('=') else {
                debug!(pair, "query pair without value");
                continue;
            };
            match self.dimension(name) {
                Ok(dim) => {
                    if let Some(value) = dim.normalize(value) {
                        state.set(name, value);
                    }
                }
                Err(_) => debug!(name, "query names unknown dimension"),
            }
        }
        state
    }
}
