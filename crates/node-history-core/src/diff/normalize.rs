//! Markup normalization applied before line splitting.

use regex::Regex;
use std::sync::OnceLock;

fn line_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<br[^>]*>").expect("valid line-break pattern"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"))
}

fn space_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" {2,}").expect("valid space-run pattern"))
}

/// Normalize markup so that only visible text changes produce diffs.
///
/// `&nbsp;` becomes a space, `<br>` variants become newlines, and with
/// `strip_tags` every remaining tag becomes a space. Space runs collapse
/// to one space and the result is trimmed.
pub fn normalize(text: &str, strip_tags: bool) -> String {
    let text = text.replace("&nbsp;", " ");
    let text = line_break_re().replace_all(&text, "\n");
    let text = if strip_tags {
        tag_re().replace_all(&text, " ").into_owned()
    } else {
        text.into_owned()
    };
    space_run_re().replace_all(&text, " ").trim().to_string()
}

/// Normalize and split into lines on `\n`.
pub fn normalized_lines(text: &str, strip_tags: bool) -> Vec<String> {
    normalize(text, strip_tags)
        .split('\n')
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nbsp_and_space_runs_collapse() {
        assert_eq!(normalize("a&nbsp;&nbsp; b", false), "a b");
        assert_eq!(normalize("  padded  ", false), "padded");
    }

    #[test]
    fn test_line_breaks_split_lines() {
        assert_eq!(
            normalized_lines("one<br>two<br />three<br class=\"x\">four", false),
            vec!["one", "two", "three", "four"]
        );
    }

    #[test]
    fn test_uppercase_break_is_not_a_line_break() {
        assert_eq!(normalized_lines("one<BR>two", false), vec!["one<BR>two"]);
    }

    #[test]
    fn test_tags_kept_unless_stripped() {
        assert_eq!(normalize("<p>Hello  world</p>", false), "<p>Hello world</p>");
        assert_eq!(normalize("<p>Hello <b>world</b></p>", true), "Hello world");
    }
}
