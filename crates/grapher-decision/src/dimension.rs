//! Choice dimensions and their header syntax.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a dimension is presented to the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceKind {
    Radio,
    Dropdown,
    Checkbox,
}

impl ChoiceKind {
    pub const ALL: [ChoiceKind; 3] = [ChoiceKind::Radio, ChoiceKind::Dropdown, ChoiceKind::Checkbox];

    /// Header suffix, without the separating space.
    pub fn suffix(self) -> &'static str {
        match self {
            ChoiceKind::Radio => "Radio",
            ChoiceKind::Dropdown => "Dropdown",
            ChoiceKind::Checkbox => "Checkbox",
        }
    }
}

impl fmt::Display for ChoiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Values a checkbox dimension can take.
pub const CHECKBOX_OPTIONS: [&str; 2] = ["true", "false"];

/// A named categorical axis of the decision matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub kind: ChoiceKind,
    /// Allowed values in author order.
    pub options: Vec<String>,
}

impl Dimension {
    pub fn new(name: impl Into<String>, kind: ChoiceKind, options: Vec<String>) -> Self {
        let options = match kind {
            ChoiceKind::Checkbox => CHECKBOX_OPTIONS.iter().map(|value| (*value).to_string()).collect(),
            ChoiceKind::Radio | ChoiceKind::Dropdown => options,
        };
        Self {
            name: name.into(),
            kind,
            options,
        }
    }

    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::new(name, ChoiceKind::Checkbox, Vec::new())
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|option| option == value)
    }

    /// Brings a cell into the dimension's canonical spelling.
    ///
    /// Checkbox cells are compared case-insensitively; other kinds are only
    /// trimmed. Blank cells normalise to `None`.
    pub fn normalize(&self, cell: &str) -> Option<String> {
        let cell = cell.trim();
        if cell.is_empty() {
            return None;
        }
        match self.kind {
            ChoiceKind::Checkbox => Some(cell.to_ascii_lowercase()),
            ChoiceKind::Radio | ChoiceKind::Dropdown => Some(cell.to_string()),
        }
    }
}

/// Splits a `"<Name> Radio"` style header into its dimension name and kind.
///
/// The suffix match is case-insensitive. Headers without a recognised
/// suffix, or with nothing before it, are payload columns.
pub fn parse_choice_header(header: &str) -> Option<(String, ChoiceKind)> {
    let header = header.trim();
    let (name, suffix) = header.rsplit_once(' ')?;
    let kind = ChoiceKind::ALL
        .into_iter()
        .find(|kind| kind.suffix().eq_ignore_ascii_case(suffix))?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice_header() {
        assert_eq!(
            parse_choice_header("Gas Radio"),
            Some(("Gas".to_string(), ChoiceKind::Radio))
        );
        assert_eq!(
            parse_choice_header("Per capita checkbox"),
            Some(("Per capita".to_string(), ChoiceKind::Checkbox))
        );
        assert_eq!(
            parse_choice_header("Metric DROPDOWN"),
            Some(("Metric".to_string(), ChoiceKind::Dropdown))
        );
        assert_eq!(parse_choice_header("yVariableIds"), None);
        assert_eq!(parse_choice_header(" Radio"), None);
        assert_eq!(parse_choice_header("Radiogram"), None);
    }

    #[test]
    fn test_checkbox_options_are_fixed() {
        let dim = Dimension::new("Relative", ChoiceKind::Checkbox, vec!["yes".to_string()]);
        assert_eq!(dim.options, vec!["true", "false"]);
        assert_eq!(dim.normalize(" TRUE "), Some("true".to_string()));
        assert_eq!(dim.normalize("  "), None);
    }
}
