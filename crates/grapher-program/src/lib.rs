//! Explorer program text.
//!
//! A program is tab-separated text of top-level `key<TAB>value` lines and
//! keyword lines followed by indented rows. Parsing never fails and keeps
//! every line, so an edited program writes back everything it did not touch.
//!
//! - **parser**: line classification into scalars, blocks, comments and blanks
//! - **block**: `graphers`, `table` and `columns` blocks plus opaque ones
//! - **program**: typed scalars, editing, decision matrix and inline tables
//! - **cache**: parsed programs keyed by slug and source fingerprint
//!
//! # Example
//!
//! ```
//! use grapher_program::ExplorerProgram;
//!
//! let text = "explorerTitle\tCO₂\ngraphers\n\tGas Radio\tyVariableIds\n\tCO₂\t1";
//! let program = ExplorerProgram::parse("co2", text);
//! assert_eq!(program.explorer_title(), Some("CO₂"));
//! assert_eq!(program.decision_matrix()?.rows().len(), 1);
//! assert_eq!(program.to_text(), text);
//! # Ok::<(), grapher_model::GrapherError>(())
//! ```

mod block;
mod cache;
mod parser;
mod program;

// === Parsing ===
pub use block::{Block, BlockKind};
pub use parser::{COMMENT_PREFIX, ProgramNode};

// === Programs ===
pub use program::{
    ENTITY_TYPE, EXPLORER_SUBTITLE, EXPLORER_TITLE, ExplorerProgram, HAS_MAP_TAB, IS_PUBLISHED,
    PICKER_COLUMN_SLUGS, SELECTION, TAB,
};

// === Cache ===
pub use cache::{ProgramCache, fingerprint};
