//! Line classification and block grouping.
//!
//! Programs are tab-separated. A line whose first cell is empty belongs to
//! the block opened by the nearest keyword line above it. Parsing never
//! fails: anything it cannot place is kept as an orphan line.

use tracing::{debug, trace};

use crate::block::{Block, BlockKind};

/// Prefix of a comment line.
pub const COMMENT_PREFIX: &str = "##";

/// One top-level element of a program, pointing back at its source lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramNode {
    /// `key<TAB>value...` on a single line.
    Scalar {
        line: usize,
        key: String,
        values: Vec<String>,
    },
    Block(Block),
    Comment { line: usize },
    Blank { line: usize },
    /// An indented line with no keyword line above it.
    Orphan { line: usize },
}

impl ProgramNode {
    /// Index of the node's first line.
    pub fn line(&self) -> usize {
        match self {
            ProgramNode::Scalar { line, .. }
            | ProgramNode::Comment { line }
            | ProgramNode::Blank { line }
            | ProgramNode::Orphan { line } => *line,
            ProgramNode::Block(block) => block.line,
        }
    }
}

/// Cells of one line, ignoring a trailing carriage return.
pub(crate) fn cells(line: &str) -> Vec<String> {
    line.trim_end_matches('\r')
        .split('\t')
        .map(str::to_string)
        .collect()
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_indented(line: &str) -> bool {
    line.starts_with('\t')
}

pub(crate) fn parse_nodes(lines: &[String]) -> Vec<ProgramNode> {
    let mut nodes = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        let line = &lines[index];
        if is_indented(line) {
            if !is_blank(line) {
                trace!(line = index, "indented line outside any block");
            }
            nodes.push(ProgramNode::Orphan { line: index });
            index += 1;
            continue;
        }
        if is_blank(line) {
            nodes.push(ProgramNode::Blank { line: index });
            index += 1;
            continue;
        }
        if line.starts_with(COMMENT_PREFIX) {
            nodes.push(ProgramNode::Comment { line: index });
            index += 1;
            continue;
        }

        let mut line_cells = cells(line).into_iter();
        let key = line_cells.next().unwrap_or_default().trim().to_string();
        let values: Vec<String> = line_cells.collect();

        let body_end = lines[index + 1..]
            .iter()
            .position(|next| !is_indented(next))
            .map_or(lines.len(), |offset| index + 1 + offset);
        let kind = BlockKind::from_keyword(&key);

        if body_end > index + 1 || kind.is_known() {
            let rows = lines[index + 1..body_end]
                .iter()
                .map(|body| cells(body).into_iter().skip(1).collect())
                .collect();
            let args = values
                .into_iter()
                .map(|arg| arg.trim().to_string())
                .filter(|arg| !arg.is_empty())
                .collect();
            nodes.push(ProgramNode::Block(Block {
                line: index,
                kind,
                args,
                rows,
            }));
            index = body_end;
        } else {
            nodes.push(ProgramNode::Scalar {
                line: index,
                key,
                values,
            });
            index += 1;
        }
    }
    debug!(lines = lines.len(), nodes = nodes.len(), "program parsed");
    nodes
}
