//! View state that survives a choice change when the new row allows it.

use crate::matrix::DecisionRow;

/// A presentation field kept apart from row matching.
///
/// After a choice change resolves to a new row, the current value is kept
/// if that row supports it and reset to the row's default otherwise.
pub trait StickyField {
    /// Values the row offers, in display order.
    fn supported(&self, row: &DecisionRow) -> Vec<&'static str>;

    /// Value a fresh view of the row starts with.
    fn default_for(&self, row: &DecisionRow) -> &'static str;

    fn carry_over(&self, current: Option<&str>, row: &DecisionRow) -> &'static str {
        current
            .and_then(|current| {
                self.supported(row)
                    .into_iter()
                    .find(|value| *value == current)
            })
            .unwrap_or_else(|| self.default_for(row))
    }
}

/// The chart/map/table tab of a grapher view.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrapherTab;

impl GrapherTab {
    pub const CHART: &'static str = "chart";
    pub const MAP: &'static str = "map";
    pub const TABLE: &'static str = "table";

    /// Payload field naming the row's initial tab.
    pub const FIELD: &'static str = "tab";
}

impl StickyField for GrapherTab {
    fn supported(&self, row: &DecisionRow) -> Vec<&'static str> {
        let mut tabs = Vec::with_capacity(3);
        if row.flag("hasChartTab") != Some(false) {
            tabs.push(Self::CHART);
        }
        if row.flag("hasMapTab") == Some(true) {
            tabs.push(Self::MAP);
        }
        tabs.push(Self::TABLE);
        tabs
    }

    fn default_for(&self, row: &DecisionRow) -> &'static str {
        let supported = self.supported(row);
        row.field(Self::FIELD)
            .and_then(|wanted| supported.iter().copied().find(|tab| tab.eq_ignore_ascii_case(wanted)))
            .or_else(|| supported.first().copied())
            .unwrap_or(Self::TABLE)
    }
}
