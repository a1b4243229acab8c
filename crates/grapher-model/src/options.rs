//! Configuration options for table construction and choice resolution.

use serde::{Deserialize, Serialize};

/// Which neighbour tolerance interpolation may borrow a value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToleranceStrategy {
    /// Nearest known time on either side; an exact tie goes to the earlier time.
    #[default]
    Closest,
    /// Only known times at or before the target.
    Backwards,
    /// Only known times at or after the target.
    Forwards,
}

/// Options controlling table construction and transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableOptions {
    /// Number of non-empty cells sampled when detecting a column's type.
    pub sample_size: usize,
    /// Share of sampled cells a candidate type must accept (strictly more than).
    pub detection_threshold: f64,
    /// Tolerance used when neither the call nor the column sets one.
    pub tolerance: i64,
    pub tolerance_strategy: ToleranceStrategy,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            sample_size: 20,
            detection_threshold: 0.5,
            tolerance: 0,
            tolerance_strategy: ToleranceStrategy::Closest,
        }
    }
}

impl TableOptions {
    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size.max(1);
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: i64) -> Self {
        self.tolerance = tolerance.max(0);
        self
    }

    #[must_use]
    pub fn with_tolerance_strategy(mut self, strategy: ToleranceStrategy) -> Self {
        self.tolerance_strategy = strategy;
        self
    }
}

/// Options controlling decision-matrix sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverOptions {
    /// Keep the active chart tab across a choice change when the newly
    /// resolved row still offers it.
    pub preserve_tab: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self { preserve_tab: true }
    }
}
