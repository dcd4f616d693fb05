//! Text diff output types.
//!
//! Serialized shape (one array per hunk, one object per block):
//!
//! ```json
//! [[{"tag": "replace",
//!    "base": {"offset": 0, "lines": ["Hello<del></del> world"]},
//!    "changed": {"offset": 0, "lines": ["Hello<ins>,</ins> world"]}}]]
//! ```

use serde::{Deserialize, Serialize};

/// Opcode tag shared by the line diff and rendered blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffTag {
    Equal,
    Insert,
    Delete,
    Replace,
}

/// One side (base or changed) of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSide {
    /// Index of the first line of this side in the normalized input
    pub offset: usize,
    pub lines: Vec<String>,
}

impl BlockSide {
    pub fn new(offset: usize) -> Self {
        Self {
            offset,
            lines: Vec::new(),
        }
    }

    /// True when the joined lines contain nothing but whitespace, NUL or NBSP.
    pub fn is_blank(&self) -> bool {
        self.lines
            .iter()
            .all(|line| line.chars().all(is_blank_char))
    }
}

fn is_blank_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\u{00A0}')
}

/// A run of lines that share a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffBlock {
    pub tag: DiffTag,
    pub base: BlockSide,
    pub changed: BlockSide,
}

/// A group of blocks surrounded by at most `context_lines` unchanged lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiffHunk {
    pub blocks: Vec<DiffBlock>,
}

/// Rendered line diff of one text property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextDiff {
    pub hunks: Vec<DiffHunk>,
}

impl TextDiff {
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// All blocks across hunks, in order.
    pub fn blocks(&self) -> impl Iterator<Item = &DiffBlock> {
        self.hunks.iter().flat_map(|h| h.blocks.iter())
    }
}
