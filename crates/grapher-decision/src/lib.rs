//! Decision matrix resolution for explorers and multi-dimensional pages.
//!
//! A [`DecisionMatrix`] maps a combination of categorical choices to one
//! authored configuration row. Rows are matched in author order, so the
//! first matching row wins. A state that matches nothing is repaired by
//! falling back, dimension by dimension, to the first option that can
//! still resolve.
//!
//! - **dimension**: choice axes and the `"<Name> Radio"` header syntax
//! - **matrix**: matching, availability and repair
//! - **session**: a reader's current choices plus the sticky chart tab
//! - **catalog**: catalog path lookup for indicator fields
//!
//! # Example
//!
//! ```
//! use grapher_decision::{ChoiceState, DecisionMatrix};
//!
//! let rows: Vec<Vec<String>> = [
//!     ["Gas Radio", "Count Radio", "yVariableIds"],
//!     ["CO₂", "Per capita", "1"],
//!     ["CO₂", "Per country", "2"],
//! ]
//! .iter()
//! .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
//! .collect();
//! let matrix = DecisionMatrix::from_matrix(&rows)?;
//!
//! let state = ChoiceState::new().with("Gas", "All GHGs").with("Count", "Per capita");
//! let row = matrix.resolve(&state).row().expect("resolves");
//! assert_eq!(row.field("yVariableIds"), Some("1"));
//! # Ok::<(), grapher_model::GrapherError>(())
//! ```

mod catalog;
mod dimension;
mod matrix;
mod session;
mod state;
mod sticky;

// === Dimensions ===
pub use dimension::{CHECKBOX_OPTIONS, ChoiceKind, Dimension, parse_choice_header};

// === Matching ===
pub use matrix::{
    ChoiceAvailability, DEFAULT_VIEW_FIELD, DecisionMatrix, DecisionRow, OptionAvailability,
    Resolution,
};
pub use state::ChoiceState;

// === Sessions ===
pub use session::ExplorerSession;
pub use sticky::{GrapherTab, StickyField};

// === Catalog paths ===
pub use catalog::{
    INDICATOR_FIELDS, collect_catalog_paths, is_catalog_path, resolve_catalog_paths,
    resolve_row_catalog_paths,
};
