// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Unified diff generation utilities.
//!
//! Produces standard unified diff text (compatible with `git apply`) between
//! the original and the rewritten contents of a file.

use difference::{Changeset, Difference};

/// Lines of unchanged context around each hunk.
pub const DIFF_CONTEXT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Same,
    Removed,
    Added,
}

/// Generate a unified diff between `old` and `new` for the file at `path`.
///
/// Returns an empty string when the contents are identical.
pub fn generate_unified_diff(path: &str, old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }

    let lines = line_ops(old, new);
    let hunks = hunk_ranges(&lines, DIFF_CONTEXT);

    // Line numbers before each op, per side
    let mut old_before = Vec::with_capacity(lines.len() + 1);
    let mut new_before = Vec::with_capacity(lines.len() + 1);
    let (mut o, mut n) = (0usize, 0usize);
    for (tag, _) in &lines {
        old_before.push(o);
        new_before.push(n);
        match tag {
            Tag::Same => {
                o += 1;
                n += 1;
            }
            Tag::Removed => o += 1,
            Tag::Added => n += 1,
        }
    }

    let mut diff = String::new();
    diff.push_str(&format!("--- a/{}\n", path));
    diff.push_str(&format!("+++ b/{}\n", path));

    for (start, end) in hunks {
        let slice = &lines[start..end];
        let old_count = slice.iter().filter(|(t, _)| *t != Tag::Added).count();
        let new_count = slice.iter().filter(|(t, _)| *t != Tag::Removed).count();
        let old_start = old_before[start] + usize::from(old_count > 0);
        let new_start = new_before[start] + usize::from(new_count > 0);
        diff.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            old_start, old_count, new_start, new_count
        ));
        for (tag, line) in slice {
            let marker = match tag {
                Tag::Same => ' ',
                Tag::Removed => '-',
                Tag::Added => '+',
            };
            diff.push(marker);
            diff.push_str(line);
            diff.push('\n');
        }
    }

    diff
}

fn line_ops(old: &str, new: &str) -> Vec<(Tag, String)> {
    let (old, new) = match (old.strip_suffix('\n'), new.strip_suffix('\n')) {
        (Some(o), Some(n)) => (o, n),
        _ => (old, new),
    };

    let changeset = Changeset::new(old, new, "\n");
    let mut lines = Vec::new();
    for difference in changeset.diffs {
        let (tag, text) = match difference {
            Difference::Same(text) => (Tag::Same, text),
            Difference::Rem(text) => (Tag::Removed, text),
            Difference::Add(text) => (Tag::Added, text),
        };
        lines.extend(text.split('\n').map(|line| (tag, line.to_string())));
    }
    lines
}

/// Group changed lines into `[start, end)` hunks padded with context.
fn hunk_ranges(lines: &[(Tag, String)], context: usize) -> Vec<(usize, usize)> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for (i, (tag, _)) in lines.iter().enumerate() {
        if *tag == Tag::Same {
            continue;
        }
        let start = i.saturating_sub(context);
        let end = (i + context + 1).min(lines.len());
        match ranges.last_mut() {
            Some(last) if start <= last.1 => last.1 = end,
            _ => ranges.push((start, end)),
        }
    }
    ranges
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_contents_produce_no_diff() {
        assert_eq!(generate_unified_diff("A.java", "x\n", "x\n"), "");
    }

    #[test]
    fn single_line_change() {
        let diff = generate_unified_diff("A.java", "a\nb\nc\n", "a\nB\nc\n");
        assert!(diff.starts_with("--- a/A.java\n+++ b/A.java\n"));
        assert!(diff.contains("@@ -1,3 +1,3 @@\n"));
        assert!(diff.contains("\n-b\n+B\n"));
        assert!(diff.contains(" a\n"));
        assert!(diff.contains(" c\n"));
    }

    #[test]
    fn distant_changes_produce_separate_hunks() {
        let old: String = (1..=20).map(|i| format!("line{}\n", i)).collect();
        let new = old.replace("line2\n", "LINE2\n").replace("line18\n", "LINE18\n");
        let diff = generate_unified_diff("f.txt", &old, &new);
        assert_eq!(diff.matches("@@ ").count(), 2);
        assert!(diff.contains("+LINE2\n"));
        assert!(diff.contains("+LINE18\n"));
        assert!(!diff.contains(" line10\n"));
    }

    #[test]
    fn inserted_line_counts() {
        let diff = generate_unified_diff(
            "A.java",
            "import a.B;\nclass A {}\n",
            "import a.B;\nimport c.D;\nclass A {}\n",
        );
        assert!(diff.contains("@@ -1,2 +1,3 @@\n"));
        assert!(diff.contains("+import c.D;\n"));
    }
}
