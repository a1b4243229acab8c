//! A parsed explorer program.

use grapher_decision::DecisionMatrix;
use grapher_model::{ColumnDef, Result, TableOptions};
use grapher_table::CoreTable;
use tracing::debug;

use crate::block::{Block, BlockKind};
use crate::parser::{ProgramNode, parse_nodes};

pub const EXPLORER_TITLE: &str = "explorerTitle";
pub const EXPLORER_SUBTITLE: &str = "explorerSubtitle";
pub const IS_PUBLISHED: &str = "isPublished";
pub const SELECTION: &str = "selection";
pub const ENTITY_TYPE: &str = "entityType";
pub const PICKER_COLUMN_SLUGS: &str = "pickerColumnSlugs";
pub const HAS_MAP_TAB: &str = "hasMapTab";
pub const TAB: &str = "tab";

/// Program text split into lines plus the nodes parsed from them.
///
/// The lines are the source of truth: [`ExplorerProgram::to_text`] returns
/// them unchanged, and edits rewrite lines before parsing again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerProgram {
    slug: String,
    lines: Vec<String>,
    nodes: Vec<ProgramNode>,
}

impl ExplorerProgram {
    pub fn parse(slug: impl Into<String>, text: &str) -> Self {
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        let nodes = parse_nodes(&lines);
        Self {
            slug: slug.into(),
            lines,
            nodes,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn nodes(&self) -> &[ProgramNode] {
        &self.nodes
    }

    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.nodes.iter().filter_map(|node| match node {
            ProgramNode::Block(block) => Some(block),
            _ => None,
        })
    }

    /// First block of the given kind.
    pub fn block(&self, kind: &BlockKind) -> Option<&Block> {
        self.blocks().find(|block| &block.kind == kind)
    }

    /// All cells after `key` on its first scalar line.
    pub fn scalar_values(&self, key: &str) -> Option<&[String]> {
        self.nodes.iter().find_map(|node| match node {
            ProgramNode::Scalar {
                key: node_key,
                values,
                ..
            } if node_key == key => Some(values.as_slice()),
            _ => None,
        })
    }

    /// First non-blank cell after `key`.
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.scalar_values(key)?
            .iter()
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
    }

    fn flag(&self, key: &str) -> bool {
        self.scalar(key)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }

    /// Non-blank cells after `key`, each split on whitespace when `split`.
    fn list(&self, key: &str, split: bool) -> Vec<String> {
        let Some(values) = self.scalar_values(key) else {
            return Vec::new();
        };
        values
            .iter()
            .flat_map(|value| {
                if split {
                    value.split_whitespace().map(str::to_string).collect::<Vec<_>>()
                } else {
                    vec![value.trim().to_string()]
                }
            })
            .filter(|value| !value.is_empty())
            .collect()
    }

    pub fn explorer_title(&self) -> Option<&str> {
        self.scalar(EXPLORER_TITLE)
    }

    pub fn explorer_subtitle(&self) -> Option<&str> {
        self.scalar(EXPLORER_SUBTITLE)
    }

    pub fn is_published(&self) -> bool {
        self.flag(IS_PUBLISHED)
    }

    /// Entities selected when the explorer opens, one per cell.
    pub fn selection(&self) -> Vec<String> {
        self.list(SELECTION, false)
    }

    pub fn entity_type(&self) -> Option<&str> {
        self.scalar(ENTITY_TYPE)
    }

    pub fn picker_column_slugs(&self) -> Vec<String> {
        self.list(PICKER_COLUMN_SLUGS, true)
    }

    pub fn has_map_tab(&self) -> bool {
        self.flag(HAS_MAP_TAB)
    }

    pub fn tab(&self) -> Option<&str> {
        self.scalar(TAB)
    }

    /// Sets a scalar, rewriting its line in place or adding a line after
    /// the last scalar. Everything else keeps its text.
    ///
    /// Line breaks in `key` or `value` become spaces so the edit stays on
    /// one line.
    pub fn set_scalar(&mut self, key: &str, value: &str) {
        let key = single_line(key);
        let value = single_line(value);
        let line = format!("{key}\t{value}");
        let existing = self.nodes.iter().find_map(|node| match node {
            ProgramNode::Scalar {
                line: index,
                key: node_key,
                ..
            } if *node_key == key => Some(*index),
            _ => None,
        });
        match existing {
            Some(index) => self.lines[index] = line,
            None => {
                let position = self
                    .nodes
                    .iter()
                    .filter(|node| matches!(node, ProgramNode::Scalar { .. }))
                    .map(|node| node.line() + 1)
                    .last()
                    .unwrap_or(0);
                self.lines.insert(position, line);
            }
        }
        self.nodes = parse_nodes(&self.lines);
        debug!(program = %self.slug, key = %key, "scalar set");
    }

    /// The decision matrix of the `graphers` block. A program without one
    /// yields an empty matrix.
    pub fn decision_matrix(&self) -> Result<DecisionMatrix> {
        match self.block(&BlockKind::Graphers) {
            Some(block) => DecisionMatrix::from_matrix(&block.matrix()),
            None => DecisionMatrix::from_matrix(&[]),
        }
    }

    /// Definitions from the `columns` block for `table_slug`.
    pub fn column_defs(&self, table_slug: Option<&str>) -> Vec<ColumnDef> {
        self.blocks()
            .find(|block| block.kind == BlockKind::Columns && block.table_slug() == table_slug)
            .map(Block::column_defs)
            .unwrap_or_default()
    }

    /// Builds the inline `table` block for `table_slug`, typed by the
    /// matching `columns` block.
    ///
    /// Returns `Ok(None)` when there is no such block or it only points at
    /// remote data.
    pub fn inline_table(
        &self,
        table_slug: Option<&str>,
        options: TableOptions,
    ) -> Result<Option<CoreTable>> {
        let Some(block) = self.blocks().find(|block| {
            block.kind == BlockKind::Table
                && block.table_slug() == table_slug
                && !block.rows.is_empty()
        }) else {
            return Ok(None);
        };
        let defs = self.column_defs(table_slug);
        CoreTable::from_matrix(&block.matrix(), &defs, options).map(Some)
    }
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_scalars() {
        let program = ExplorerProgram::parse(
            "co2",
            "explorerTitle\tCO₂\nisPublished\tTRUE\nselection\tFrance\tGermany\npickerColumnSlugs\tgdp population\thasMapTab",
        );
        assert_eq!(program.explorer_title(), Some("CO₂"));
        assert!(program.is_published());
        assert_eq!(program.selection(), vec!["France", "Germany"]);
        assert_eq!(program.picker_column_slugs(), vec!["gdp", "population", "hasMapTab"]);
        assert!(!program.has_map_tab());
        assert_eq!(program.tab(), None);
    }

    #[test]
    fn test_set_scalar_rewrites_in_place() {
        let mut program = ExplorerProgram::parse("co2", "explorerTitle\tOld\n## keep\ngraphers\n\tGas Radio");
        program.set_scalar(EXPLORER_TITLE, "New");
        assert_eq!(program.to_text(), "explorerTitle\tNew\n## keep\ngraphers\n\tGas Radio");
        program.set_scalar(TAB, "map");
        assert_eq!(program.to_text(), "explorerTitle\tNew\ntab\tmap\n## keep\ngraphers\n\tGas Radio");
        assert_eq!(program.tab(), Some("map"));
    }

    #[test]
    fn test_set_scalar_on_program_without_scalars() {
        let mut program = ExplorerProgram::parse("co2", "graphers\n\tGas Radio");
        program.set_scalar(IS_PUBLISHED, "true");
        assert_eq!(program.to_text(), "isPublished\ttrue\ngraphers\n\tGas Radio");
    }

    #[test]
    fn test_set_scalar_keeps_value_on_one_line() {
        let mut program = ExplorerProgram::parse("co2", "explorerTitle\tOld\ngraphers\n\tGas Radio");
        program.set_scalar(EXPLORER_SUBTITLE, "first\nsecond\r\nthird");
        assert_eq!(
            program.to_text(),
            "explorerTitle\tOld\nexplorerSubtitle\tfirst second  third\ngraphers\n\tGas Radio"
        );
        assert_eq!(program.explorer_subtitle(), Some("first second  third"));
        assert_eq!(program.nodes().len(), 3);
        assert_eq!(program.nodes()[2].line(), 2);
    }
}
