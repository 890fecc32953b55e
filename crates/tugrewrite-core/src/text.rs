// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Text position utilities for byte offset and line:column conversions.
//!
//! ## Coordinate Conventions
//!
//! - Lines and columns are **1-indexed** (matching editor conventions)
//! - Byte offsets are **0-indexed**
//! - Columns count Unicode scalar values, not bytes

use memchr::{memchr_iter, memrchr};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-indexed line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl LineCol {
    /// The first position of any text.
    pub const START: LineCol = LineCol { line: 1, column: 1 };

    pub fn new(line: u32, column: u32) -> Self {
        LineCol {
            line: line.max(1),
            column: column.max(1),
        }
    }

    /// Move this position past `text`.
    pub fn advance(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let newlines = memchr_iter(b'\n', bytes).count() as u32;
        match memrchr(b'\n', bytes) {
            Some(last) => {
                self.line += newlines;
                self.column = 1 + text[last + 1..].chars().count() as u32;
            }
            None => self.column += text.chars().count() as u32,
        }
    }
}

impl Default for LineCol {
    fn default() -> Self {
        LineCol::START
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Clamp `offset` into `content` and back onto a char boundary.
fn floor_char_boundary(content: &str, offset: usize) -> usize {
    let mut offset = offset.min(content.len());
    while !content.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Convert a byte offset to a 1-indexed line and column.
///
/// Offsets past the end clamp to the end of `content`; offsets inside a
/// multi-byte character clamp to that character's start.
pub fn byte_offset_to_position(content: &str, offset: usize) -> LineCol {
    let offset = floor_char_boundary(content, offset);
    let mut position = LineCol::START;
    position.advance(&content[..offset]);
    position
}

/// Indentation (leading spaces and tabs) of the last line of `text`.
pub fn last_line_indent(text: &str) -> &str {
    let start = memrchr(b'\n', text.as_bytes()).map_or(0, |i| i + 1);
    let line = &text[start..];
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// Remove leading and trailing blank lines and the indentation common to
/// every non-blank line.
pub fn trim_indent(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    let (Some(first), Some(last)) = (first, last) else {
        return String::new();
    };
    let body = &lines[first..=last];
    let common = body
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    body.iter()
        .map(|l| l.get(common..).unwrap_or("").trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}
