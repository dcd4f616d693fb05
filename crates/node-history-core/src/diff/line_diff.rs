//! Line-level diff: LCS alignment, opcodes, and context grouping.

use crate::diff::model::DiffTag;

/// Edit operation over half-open line ranges `base[i1..i2]` → `changed[j1..j2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: DiffTag,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

impl Opcode {
    pub fn new(tag: DiffTag, i1: usize, i2: usize, j1: usize, j2: usize) -> Self {
        Self { tag, i1, i2, j1, j2 }
    }
}

/// Matched `(base_index, changed_index)` pairs in increasing order.
///
/// Common leading and trailing lines are matched directly; only the
/// differing middle goes through the LCS table.
fn matching_pairs(base: &[String], changed: &[String]) -> Vec<(usize, usize)> {
    let prefix = base
        .iter()
        .zip(changed)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = base[prefix..]
        .iter()
        .rev()
        .zip(changed[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let base_end = base.len() - suffix;
    let changed_end = changed.len() - suffix;

    let mut pairs: Vec<(usize, usize)> = (0..prefix).map(|k| (k, k)).collect();
    pairs.extend(
        lcs_pairs(&base[prefix..base_end], &changed[prefix..changed_end])
            .into_iter()
            .map(|(i, j)| (i + prefix, j + prefix)),
    );
    pairs.extend((0..suffix).map(|k| (base_end + k, changed_end + k)));
    pairs
}

/// Longest-common-subsequence alignment of two line lists.
///
/// Ties prefer consuming the base side first, which keeps the output stable.
fn lcs_pairs(base: &[String], changed: &[String]) -> Vec<(usize, usize)> {
    let n = base.len();
    let m = changed.len();
    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[i][j] = if base[i] == changed[j] {
                1 + dp[i + 1][j + 1]
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    let mut pairs = Vec::with_capacity(dp[0][0]);
    let (mut i, mut j) = (0usize, 0usize);
    while i < n && j < m {
        if base[i] == changed[j] {
            pairs.push((i, j));
            i += 1;
            j += 1;
        } else if dp[i + 1][j] >= dp[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    pairs
}

fn gap_opcode(i1: usize, i2: usize, j1: usize, j2: usize) -> Option<Opcode> {
    let tag = match (i1 < i2, j1 < j2) {
        (true, true) => DiffTag::Replace,
        (true, false) => DiffTag::Delete,
        (false, true) => DiffTag::Insert,
        (false, false) => return None,
    };
    Some(Opcode::new(tag, i1, i2, j1, j2))
}

/// Opcodes that turn `base` into `changed`, covering both inputs end to end.
pub fn opcodes(base: &[String], changed: &[String]) -> Vec<Opcode> {
    let pairs = matching_pairs(base, changed);
    let mut codes = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    let mut k = 0usize;

    loop {
        let (mi, mj) = pairs.get(k).copied().unwrap_or((base.len(), changed.len()));
        codes.extend(gap_opcode(i, mi, j, mj));
        if k == pairs.len() {
            break;
        }

        let mut run = 0usize;
        while pairs.get(k) == Some(&(mi + run, mj + run)) {
            run += 1;
            k += 1;
        }
        codes.push(Opcode::new(DiffTag::Equal, mi, mi + run, mj, mj + run));
        i = mi + run;
        j = mj + run;
    }
    codes
}

/// Split opcodes into hunks, keeping at most `context` unchanged lines
/// around each change. Inputs without any change yield no hunks.
pub fn grouped_opcodes(base: &[String], changed: &[String], context: usize) -> Vec<Vec<Opcode>> {
    let mut codes = opcodes(base, changed);
    if codes.is_empty() {
        codes.push(Opcode::new(DiffTag::Equal, 0, 1, 0, 1));
    }

    if let Some(first) = codes.first_mut() {
        if first.tag == DiffTag::Equal {
            first.i1 = first.i1.max(first.i2.saturating_sub(context));
            first.j1 = first.j1.max(first.j2.saturating_sub(context));
        }
    }
    if let Some(last) = codes.last_mut() {
        if last.tag == DiffTag::Equal {
            last.i2 = last.i2.min(last.i1 + context);
            last.j2 = last.j2.min(last.j1 + context);
        }
    }

    let window = context * 2;
    let mut groups = Vec::new();
    let mut group = Vec::new();
    for mut code in codes {
        if code.tag == DiffTag::Equal && code.i2 - code.i1 > window {
            group.push(Opcode::new(
                DiffTag::Equal,
                code.i1,
                code.i2.min(code.i1 + context),
                code.j1,
                code.j2.min(code.j1 + context),
            ));
            groups.push(std::mem::take(&mut group));
            code.i1 = code.i1.max(code.i2.saturating_sub(context));
            code.j1 = code.j1.max(code.j2.saturating_sub(context));
        }
        group.push(code);
    }

    let only_equal = group.len() == 1 && group[0].tag == DiffTag::Equal;
    if !group.is_empty() && !only_equal {
        groups.push(group);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.split('\n').map(str::to_string).collect()
    }

    #[test]
    fn test_identical_inputs_have_no_hunks() {
        let a = lines("one\ntwo\nthree");
        assert!(grouped_opcodes(&a, &a, 1).is_empty());
    }

    #[test]
    fn test_single_line_replace() {
        let codes = opcodes(&lines("Hello world"), &lines("Hello, world"));
        assert_eq!(codes, vec![Opcode::new(DiffTag::Replace, 0, 1, 0, 1)]);
    }

    #[test]
    fn test_opcodes_cover_both_sides() {
        let a = lines("a\nb\nc\nd");
        let b = lines("a\nc\nd\ne");
        let codes = opcodes(&a, &b);
        assert_eq!(
            codes,
            vec![
                Opcode::new(DiffTag::Equal, 0, 1, 0, 1),
                Opcode::new(DiffTag::Delete, 1, 2, 1, 1),
                Opcode::new(DiffTag::Equal, 2, 4, 1, 3),
                Opcode::new(DiffTag::Insert, 4, 4, 3, 4),
            ]
        );
    }

    #[test]
    fn test_context_trims_leading_and_trailing_equal_runs() {
        let a = lines("1\n2\n3\n4\nX\n6\n7\n8");
        let b = lines("1\n2\n3\n4\nY\n6\n7\n8");
        let groups = grouped_opcodes(&a, &b, 1);
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0],
            vec![
                Opcode::new(DiffTag::Equal, 3, 4, 3, 4),
                Opcode::new(DiffTag::Replace, 4, 5, 4, 5),
                Opcode::new(DiffTag::Equal, 5, 6, 5, 6),
            ]
        );
    }

    #[test]
    fn test_distant_changes_split_into_hunks() {
        let a = lines("A\n1\n2\n3\n4\nB");
        let b = lines("a\n1\n2\n3\n4\nb");
        let groups = grouped_opcodes(&a, &b, 1);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0][0].tag, DiffTag::Replace);
        assert_eq!(groups[0][1], Opcode::new(DiffTag::Equal, 1, 2, 1, 2));
        assert_eq!(groups[1][0], Opcode::new(DiffTag::Equal, 4, 5, 4, 5));
        assert_eq!(groups[1][1].tag, DiffTag::Replace);
    }

    #[test]
    fn test_long_input_with_one_edit() {
        let a: Vec<String> = (0..5000).map(|n| format!("line {n}")).collect();
        let mut b = a.clone();
        b[2500] = "edited".to_string();

        let groups = grouped_opcodes(&a, &b, 1);
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0],
            vec![
                Opcode::new(DiffTag::Equal, 2499, 2500, 2499, 2500),
                Opcode::new(DiffTag::Replace, 2500, 2501, 2500, 2501),
                Opcode::new(DiffTag::Equal, 2501, 2502, 2501, 2502),
            ]
        );
    }

    #[test]
    fn test_shared_edges_are_matched_around_insertion() {
        let a = lines("a\nb\nc");
        let b = lines("a\nx\ny\nb\nc");
        assert_eq!(
            opcodes(&a, &b),
            vec![
                Opcode::new(DiffTag::Equal, 0, 1, 0, 1),
                Opcode::new(DiffTag::Insert, 1, 1, 1, 3),
                Opcode::new(DiffTag::Equal, 1, 3, 3, 5),
            ]
        );
    }

    #[test]
    fn test_close_changes_share_a_hunk() {
        let a = lines("A\n1\n2\nB");
        let b = lines("a\n1\n2\nb");
        let groups = grouped_opcodes(&a, &b, 1);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
    }
}
