//! Human-readable summary renderer for change sets.

use crate::diff::model::{DiffTag, TextDiff};
use crate::model::change::{Change, Changes};

/// Render a Markdown/text summary of a [`Changes`] collection.
///
/// Intended for terminals and review notes. Text changes with a diff show the
/// rendered lines with `-`/`+` prefixes; other changes show both serialized
/// values.
pub fn render_human_summary(changes: &Changes) -> String {
    let mut out = String::new();

    out.push_str("## Node Changes\n\n");
    out.push_str(&format!("**Changed properties**: {}\n\n", changes.len()));

    if changes.is_empty() {
        out.push_str("_No property changes detected._\n");
        return out;
    }

    for change in changes {
        render_change(&mut out, change);
    }
    out
}

fn render_change(out: &mut String, change: &Change) {
    if change.property_label() == change.property_name() {
        out.push_str(&format!("### {}\n\n", change.property_label()));
    } else {
        out.push_str(&format!(
            "### {} (`{}`)\n\n",
            change.property_label(),
            change.property_name()
        ));
    }

    if change.old_kind() == change.new_kind() {
        out.push_str(&format!("- **Type**: {}\n", change.new_kind()));
    } else {
        out.push_str(&format!(
            "- **Type**: {} → {}\n",
            change.old_kind(),
            change.new_kind()
        ));
    }

    match change.diff() {
        Some(diff) => {
            out.push('\n');
            render_diff(out, diff);
        }
        None => {
            out.push_str(&format!("- **Old**: {}\n", inline(change.old_value())));
            out.push_str(&format!("- **New**: {}\n", inline(change.new_value())));
        }
    }
    out.push('\n');
}

fn render_diff(out: &mut String, diff: &TextDiff) {
    out.push_str("```diff\n");
    for (index, hunk) in diff.hunks.iter().enumerate() {
        if index > 0 {
            out.push_str("...\n");
        }
        for block in &hunk.blocks {
            match block.tag {
                DiffTag::Equal => {
                    for line in &block.changed.lines {
                        out.push_str(&format!("  {line}\n"));
                    }
                }
                _ => {
                    for line in &block.base.lines {
                        out.push_str(&format!("- {line}\n"));
                    }
                    for line in &block.changed.lines {
                        out.push_str(&format!("+ {line}\n"));
                    }
                }
            }
        }
    }
    out.push_str("```\n");
}

fn inline(value: &str) -> String {
    if value.is_empty() {
        "_(empty)_".to_string()
    } else if value.contains('\n') {
        format!("\n\n```\n{value}\n```\n")
    } else {
        format!("`{value}`")
    }
}
