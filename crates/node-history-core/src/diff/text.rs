//! Text differ: normalize, line-diff, render, post-process.

use crate::config::DiffOptions;
use crate::diff::line_diff::grouped_opcodes;
use crate::diff::model::{BlockSide, TextDiff};
use crate::diff::normalize::normalized_lines;
use crate::diff::renderer::DiffRenderer;

/// Line-oriented differ for text property values.
#[derive(Debug, Clone, Default)]
pub struct TextDiffer {
    options: DiffOptions,
}

impl TextDiffer {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Diff two texts and render the hunks with `renderer`.
    ///
    /// Identical texts (after normalization) produce an empty [`TextDiff`].
    pub fn diff(&self, old: &str, new: &str, renderer: &dyn DiffRenderer) -> TextDiff {
        let base = normalized_lines(old, self.options.strip_tags);
        let changed = normalized_lines(new, self.options.strip_tags);
        let groups = grouped_opcodes(&base, &changed, self.options.context_lines);

        let mut hunks = renderer.render(&base, &changed, &groups);
        let insertion = renderer.insertion_markers();
        let deletion = renderer.deletion_markers();
        for block in hunks.iter_mut().flat_map(|h| h.blocks.iter_mut()) {
            if block.base.is_blank() {
                wrap_lines(&mut block.changed, insertion);
            }
            if block.changed.is_blank() {
                wrap_lines(&mut block.base, deletion);
            }
        }
        TextDiff { hunks }
    }
}

fn wrap_lines(side: &mut BlockSide, (open, close): (&str, &str)) {
    for line in &mut side.lines {
        *line = format!("{open}{line}{close}");
    }
}
