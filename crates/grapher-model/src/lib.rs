//! Shared value types for the grapher table engine.
//!
//! - **value**: parsed cells and the [`ErrorValue`] sentinels
//! - **column**: column types and definitions
//! - **options**: table and resolver configuration
//! - **lineage**: transform provenance records
//! - **slugs**: well-known column slugs

pub mod column;
pub mod error;
pub mod lineage;
pub mod options;
pub mod slugs;
pub mod value;

pub use column::{ColumnDef, ColumnTypeName};
pub use error::{GrapherError, Result};
pub use lineage::TransformRecord;
pub use options::{ResolverOptions, TableOptions, ToleranceStrategy};
pub use value::{CellValue, ErrorValue, compare_cells};
