//! A reader's walk through a decision matrix.

use grapher_model::{ResolverOptions, Result};
use tracing::debug;

use crate::matrix::{DecisionMatrix, DecisionRow, Resolution};
use crate::state::ChoiceState;
use crate::sticky::{GrapherTab, StickyField};

/// Current choices and tab over a borrowed matrix.
///
/// The state is always the repaired one, so it resolves whenever the
/// matrix has any row that can match.
#[derive(Debug, Clone)]
pub struct ExplorerSession<'m> {
    matrix: &'m DecisionMatrix,
    options: ResolverOptions,
    state: ChoiceState,
    tab: Option<&'static str>,
}

impl<'m> ExplorerSession<'m> {
    /// Starts from the matrix's default view.
    pub fn new(matrix: &'m DecisionMatrix, options: ResolverOptions) -> Self {
        Self::with_state(matrix, options, &matrix.default_state())
    }

    /// Starts from `state`, repaired if it does not resolve.
    pub fn with_state(
        matrix: &'m DecisionMatrix,
        options: ResolverOptions,
        state: &ChoiceState,
    ) -> Self {
        let mut session = Self {
            matrix,
            options,
            state: matrix.constrain(state),
            tab: None,
        };
        session.tab = session.row().map(|row| GrapherTab.default_for(row));
        session
    }

    pub fn matrix(&self) -> &'m DecisionMatrix {
        self.matrix
    }

    pub fn state(&self) -> &ChoiceState {
        &self.state
    }

    /// Active tab, or `None` when nothing resolves.
    pub fn tab(&self) -> Option<&'static str> {
        self.tab
    }

    pub fn resolution(&self) -> Resolution<'m> {
        self.matrix.resolve_exact(&self.state)
    }

    pub fn row(&self) -> Option<&'m DecisionRow> {
        self.resolution().row()
    }

    /// Selects `value` for `dimension` and resolves again.
    ///
    /// Other dimensions fall back to their first available option when the
    /// new combination has no row. The tab is kept when the new row offers
    /// it and `preserve_tab` is set; otherwise it resets to the row's default.
    pub fn set_choice(&mut self, dimension: &str, value: &str) -> Result<Resolution<'m>> {
        let matrix = self.matrix;
        let dim = matrix.dimension(dimension)?;
        let mut next = self.state.clone();
        match dim.normalize(value) {
            Some(value) => next.set(dimension, value),
            None => {
                next.remove(dimension);
            }
        }

        let resolution = matrix.resolve(&next);
        self.state = match resolution.state() {
            Some(state) => state.clone(),
            None => matrix.constrain(&next),
        };

        let previous = self.tab;
        let preserve_tab = self.options.preserve_tab;
        self.tab = resolution.row().map(|row| {
            if preserve_tab {
                GrapherTab.carry_over(previous, row)
            } else {
                GrapherTab.default_for(row)
            }
        });
        debug!(dimension, value, tab = ?self.tab, resolved = resolution.is_resolved(), "choice changed");
        Ok(resolution)
    }

    /// Switches the tab if the current row offers it.
    pub fn set_tab(&mut self, tab: &str) -> bool {
        let Some(row) = self.row() else {
            return false;
        };
        match GrapherTab.supported(row).into_iter().find(|supported| *supported == tab) {
            Some(supported) => {
                self.tab = Some(supported);
                true
            }
            None => false,
        }
    }
}
