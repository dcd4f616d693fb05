//! Renderers that turn grouped line opcodes into [`DiffHunk`]s.
//!
//! Both renderers share one block builder: consecutive opcodes with the
//! same tag merge into a block, equal runs fill both sides, and replace
//! opcodes with matching line counts get a character-level change extent
//! wrapped in inline markers.

use crate::diff::line_diff::Opcode;
use crate::diff::model::{BlockSide, DiffBlock, DiffHunk, DiffTag};
use regex::{Captures, Regex};
use std::sync::OnceLock;

const EXTENT_OPEN: char = '\0';
const EXTENT_CLOSE: char = '\u{1}';
const TAB_SIZE: usize = 4;

/// Turns grouped opcodes into rendered hunks.
///
/// Implementations must be deterministic. The marker methods name the
/// strings the text differ uses when it wraps whole inserted or deleted
/// sides.
pub trait DiffRenderer: Send + Sync {
    fn render(&self, base: &[String], changed: &[String], groups: &[Vec<Opcode>])
        -> Vec<DiffHunk>;

    fn insertion_markers(&self) -> (&str, &str) {
        ("<ins>", "</ins>")
    }

    fn deletion_markers(&self) -> (&str, &str) {
        ("<del>", "</del>")
    }
}

/// HTML-escaped output with inline `<ins>` / `<del>` markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlArrayRenderer;

impl DiffRenderer for HtmlArrayRenderer {
    fn render(
        &self,
        base: &[String],
        changed: &[String],
        groups: &[Vec<Opcode>],
    ) -> Vec<DiffHunk> {
        let style = BlockStyle {
            format: format_html_line,
            insertion: self.insertion_markers(),
            deletion: self.deletion_markers(),
        };
        render_groups(base, changed, groups, &style)
    }
}

/// Raw text output with `{+ +}` / `[- -]` markers, for terminals and logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainArrayRenderer;

impl DiffRenderer for PlainArrayRenderer {
    fn render(
        &self,
        base: &[String],
        changed: &[String],
        groups: &[Vec<Opcode>],
    ) -> Vec<DiffHunk> {
        let style = BlockStyle {
            format: str::to_string,
            insertion: self.insertion_markers(),
            deletion: self.deletion_markers(),
        };
        render_groups(base, changed, groups, &style)
    }

    fn insertion_markers(&self) -> (&str, &str) {
        ("{+", "+}")
    }

    fn deletion_markers(&self) -> (&str, &str) {
        ("[-", "-]")
    }
}

struct BlockStyle<'a> {
    format: fn(&str) -> String,
    insertion: (&'a str, &'a str),
    deletion: (&'a str, &'a str),
}

impl BlockStyle<'_> {
    fn side_lines(&self, lines: &[String], markers: (&str, &str)) -> Vec<String> {
        lines
            .iter()
            .map(|line| {
                (self.format)(line)
                    .replace(EXTENT_OPEN, markers.0)
                    .replace(EXTENT_CLOSE, markers.1)
            })
            .collect()
    }
}

fn render_groups(
    base: &[String],
    changed: &[String],
    groups: &[Vec<Opcode>],
    style: &BlockStyle<'_>,
) -> Vec<DiffHunk> {
    let mut base = base.to_vec();
    let mut changed = changed.to_vec();

    let mut hunks = Vec::with_capacity(groups.len());
    for group in groups {
        let mut blocks: Vec<DiffBlock> = Vec::new();
        let mut last_tag = None;

        for code in group {
            if code.tag == DiffTag::Replace && code.i2 - code.i1 == code.j2 - code.j1 {
                for k in 0..(code.i2 - code.i1) {
                    mark_change_extent(&mut base[code.i1 + k], &mut changed[code.j1 + k]);
                }
            }

            if last_tag != Some(code.tag) {
                blocks.push(DiffBlock {
                    tag: code.tag,
                    base: BlockSide::new(code.i1),
                    changed: BlockSide::new(code.j1),
                });
                last_tag = Some(code.tag);
            }
            let Some(block) = blocks.last_mut() else {
                continue;
            };

            let base_slice = &base[code.i1..code.i2];
            let changed_slice = &changed[code.j1..code.j2];
            match code.tag {
                DiffTag::Equal => {
                    block.base.lines.extend(base_slice.iter().map(|l| (style.format)(l)));
                    block
                        .changed
                        .lines
                        .extend(changed_slice.iter().map(|l| (style.format)(l)));
                }
                DiffTag::Replace | DiffTag::Delete | DiffTag::Insert => {
                    if matches!(code.tag, DiffTag::Replace | DiffTag::Delete) {
                        block
                            .base
                            .lines
                            .extend(style.side_lines(base_slice, style.deletion));
                    }
                    if matches!(code.tag, DiffTag::Replace | DiffTag::Insert) {
                        block
                            .changed
                            .lines
                            .extend(style.side_lines(changed_slice, style.insertion));
                    }
                }
            }
        }
        hunks.push(DiffHunk { blocks });
    }
    hunks
}

/// Character range `(start, end)` that differs between two lines, where
/// `end` counts back from the end of each line (zero or negative).
fn change_extent(from: &[char], to: &[char]) -> (usize, isize) {
    let limit = from.len().min(to.len());
    let mut start = 0;
    while start < limit && from[start] == to[start] {
        start += 1;
    }

    let suffix_limit = limit - start;
    let mut suffix = 0;
    while suffix < suffix_limit && from[from.len() - 1 - suffix] == to[to.len() - 1 - suffix] {
        suffix += 1;
    }
    (start, -(suffix as isize))
}

fn mark_change_extent(from_line: &mut String, to_line: &mut String) {
    let from: Vec<char> = from_line.chars().collect();
    let to: Vec<char> = to_line.chars().collect();
    let (start, end) = change_extent(&from, &to);
    if start == 0 && end == 0 {
        return;
    }
    *from_line = insert_markers(&from, start, end);
    *to_line = insert_markers(&to, start, end);
}

fn insert_markers(chars: &[char], start: usize, end: isize) -> String {
    let close = chars.len() - end.unsigned_abs();
    let mut out = String::with_capacity(chars.len() + 2);
    out.extend(&chars[..start]);
    out.push(EXTENT_OPEN);
    out.extend(&chars[start..close]);
    out.push(EXTENT_CLOSE);
    out.extend(&chars[close..]);
    out
}

fn space_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" ( +)|^ ").expect("valid space pattern"))
}

/// Tabs expanded, `& < >` escaped, space runs made visible.
fn format_html_line(line: &str) -> String {
    let expanded = line.replace('\t', &" ".repeat(TAB_SIZE));
    let escaped = expanded
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    fix_spaces(&escaped)
}

fn fix_spaces(line: &str) -> String {
    space_run_re()
        .replace_all(line, |caps: &Captures<'_>| {
            let count = caps.get(1).map_or(0, |m| m.as_str().len());
            format!("{}{}", "&nbsp; ".repeat(count / 2), "&nbsp;".repeat(count % 2))
        })
        .into_owned()
}
