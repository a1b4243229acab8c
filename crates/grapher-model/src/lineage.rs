use std::fmt;

use serde::{Deserialize, Serialize};

/// One step in the chain of transforms that produced a table generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRecord {
    pub name: String,
    pub params: Vec<String>,
    pub row_count: usize,
}

impl TransformRecord {
    pub fn new(name: impl Into<String>, params: Vec<String>, row_count: usize) -> Self {
        Self {
            name: name.into(),
            params,
            row_count,
        }
    }
}

impl fmt::Display for TransformRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) -> {} rows",
            self.name,
            self.params.join(", "),
            self.row_count
        )
    }
}
