//! Column type registry.
//!
//! Each [`ColumnTypeName`](grapher_model::ColumnTypeName) has a static
//! [`ColumnType`] implementation that parses raw input into typed cells and
//! renders cells for display and for CSV output.
//!
//! # Example
//!
//! ```
//! use grapher_columns::{RawCell, column_type, format_for_csv};
//! use grapher_model::{CellValue, ColumnTypeName};
//!
//! let quarter = column_type(ColumnTypeName::Quarter);
//! let parsed = quarter.parse(RawCell::Text("2020-Q3"));
//! assert_eq!(parsed, CellValue::Integer(8082));
//! assert_eq!(format_for_csv(ColumnTypeName::Quarter, &parsed), "2020-Q3");
//! ```

mod detect;
mod format;
mod numeric;
mod raw;
mod registry;
mod text;
mod time;

pub use detect::{DETECTION_ORDER, DetectionScore, detect_column_type, detect_for_slug};
pub use format::{DEFAULT_DECIMAL_PLACES, FormatOptions, format_number, with_short_unit};
pub use raw::RawCell;
pub use registry::{ColumnType, column_type, format_for_csv, format_value, parse_cell};
pub use time::{
    date_for_offset, day_offset, decode_quarter, encode_quarter, format_quarter, parse_quarter,
    zero_day,
};
