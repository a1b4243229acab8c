//! Immutable column-store tables.
//!
//! A [`CoreTable`] holds typed columns of equal length. Every transform is a
//! method returning a new table; the receiver is never changed, and column
//! stores a transform leaves alone are shared between generations.
//!
//! - **table**: construction from matrices, JSON rows and delimited text
//! - **select**: column editing, row selection, filtering and sorting
//! - **owid**: entity/time keyed operations, grid completion and joins
//! - **interpolation**: linear and tolerance fills per entity
//! - **rolling**: rolling averages per entity
//! - **percent**: share and relative-change derivations
//! - **derived**: column definition transform expressions
//! - **bins**: legend bins
//!
//! # Example
//!
//! ```
//! use grapher_model::{CellValue, TableOptions};
//! use grapher_table::CoreTable;
//!
//! let table = CoreTable::from_delimited(
//!     "entityName,year,gdp\nFrance,2000,1\nFrance,2002,3",
//!     &[],
//!     TableOptions::default(),
//! )?;
//! let filled = table
//!     .complete_entity_time_with(&[2001])?
//!     .interpolate_linear("gdp")?;
//! assert_eq!(filled.get("gdp", 1)?, &CellValue::Number(2.0));
//! assert_eq!(table.row_count(), 2);
//! # Ok::<(), grapher_model::GrapherError>(())
//! ```

mod bins;
mod column;
mod derived;
mod interpolation;
mod owid;
mod percent;
mod rolling;
mod select;
mod table;

pub use bins::{Bin, bin_contains, bins_equal};
pub use column::ColumnView;
pub use derived::{ColumnTransform, Comparison};
pub use interpolation::ToleranceWindow;
pub use rolling::RollingAlignment;
pub use select::{SortKey, SortOrder};
pub use table::{CoreTable, RowRef};
