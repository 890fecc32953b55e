// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Whitespace and comments attached to nodes.

use std::fmt;

use memchr::{memchr, memchr_iter};

/// Comment syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentStyle {
    /// `// ...` up to the end of the line.
    Line,
    /// `/* ... */`
    Block,
    /// `/** ... */`
    Doc,
}

/// A comment together with the whitespace that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comment {
    style: CommentStyle,
    text: String,
    suffix: String,
}

impl Comment {
    /// `text` includes the comment delimiters.
    pub fn new(style: CommentStyle, text: impl Into<String>, suffix: impl Into<String>) -> Self {
        Comment {
            style,
            text: text.into(),
            suffix: suffix.into(),
        }
    }

    pub fn style(&self) -> CommentStyle {
        self.style
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whitespace after the comment.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn with_suffix(&self, suffix: impl Into<String>) -> Self {
        Comment {
            suffix: suffix.into(),
            ..self.clone()
        }
    }
}

/// Trivia that is not whitespace or a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriviaError {
    /// Byte offset of the offending input.
    pub offset: usize,
    pub unterminated_comment: bool,
}

impl fmt::Display for TriviaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unterminated_comment {
            write!(f, "unterminated comment at offset {}", self.offset)
        } else {
            write!(f, "unexpected input at offset {}", self.offset)
        }
    }
}

impl std::error::Error for TriviaError {}

/// Leading or trailing formatting of a node: whitespace, then any number of
/// comments each followed by its own whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Space {
    whitespace: String,
    comments: Vec<Comment>,
}

fn is_space_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{c}')
}

fn whitespace_len(text: &str) -> usize {
    text.find(|c| !is_space_char(c)).unwrap_or(text.len())
}

impl Space {
    pub const EMPTY: Space = Space {
        whitespace: String::new(),
        comments: Vec::new(),
    };

    /// Whitespace-only formatting.
    pub fn new(whitespace: impl Into<String>) -> Self {
        Space {
            whitespace: whitespace.into(),
            comments: Vec::new(),
        }
    }

    pub fn with_comments(whitespace: impl Into<String>, comments: Vec<Comment>) -> Self {
        Space {
            whitespace: whitespace.into(),
            comments,
        }
    }

    /// Split C-family trivia (whitespace, `//` and `/* */` comments) into a
    /// `Space`. Fails if `text` contains anything else.
    pub fn parse_trivia(text: &str) -> Result<Space, TriviaError> {
        let mut i = whitespace_len(text);
        let whitespace = text[..i].to_string();
        let mut comments = Vec::new();

        while i < text.len() {
            let rest = &text[i..];
            let (style, len) = if rest.starts_with("//") {
                let len = memchr(b'\n', rest.as_bytes()).unwrap_or(rest.len());
                (CommentStyle::Line, len)
            } else if rest.starts_with("/*") {
                let Some(close) = rest[2..].find("*/") else {
                    return Err(TriviaError {
                        offset: i,
                        unterminated_comment: true,
                    });
                };
                let len = close + 4;
                let style = if rest.starts_with("/**") && len > 4 {
                    CommentStyle::Doc
                } else {
                    CommentStyle::Block
                };
                (style, len)
            } else {
                return Err(TriviaError {
                    offset: i,
                    unterminated_comment: false,
                });
            };
            let comment_text = &rest[..len];
            let suffix_len = whitespace_len(&rest[len..]);
            comments.push(Comment::new(
                style,
                comment_text,
                &rest[len..len + suffix_len],
            ));
            i += len + suffix_len;
        }

        Ok(Space {
            whitespace,
            comments,
        })
    }

    /// Whitespace before the first comment.
    pub fn whitespace(&self) -> &str {
        &self.whitespace
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn is_empty(&self) -> bool {
        self.whitespace.is_empty() && self.comments.is_empty()
    }

    /// Newlines in the whitespace before the first comment.
    pub fn newlines(&self) -> usize {
        memchr_iter(b'\n', self.whitespace.as_bytes()).count()
    }

    /// Whitespace directly in front of the node: the suffix of the last
    /// comment, or the leading whitespace when there are no comments.
    pub fn last_whitespace(&self) -> &str {
        self.comments
            .last()
            .map_or(self.whitespace.as_str(), |c| c.suffix())
    }

    /// Indentation of the line the node starts on, when this space breaks
    /// the line.
    pub fn indent(&self) -> Option<&str> {
        let last = self.last_whitespace();
        let newline = last.rfind('\n')?;
        let tail = &last[newline + 1..];
        let end = tail
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(tail.len());
        Some(&tail[..end])
    }

    /// Same comments, different leading whitespace.
    pub fn with_whitespace(&self, whitespace: impl Into<String>) -> Self {
        Space {
            whitespace: whitespace.into(),
            comments: self.comments.clone(),
        }
    }

    /// Total length of the printed form in bytes.
    pub fn len(&self) -> usize {
        self.whitespace.len()
            + self
                .comments
                .iter()
                .map(|c| c.text.len() + c.suffix.len())
                .sum::<usize>()
    }

    pub fn print_to(&self, out: &mut String) {
        out.push_str(&self.whitespace);
        for comment in &self.comments {
            out.push_str(&comment.text);
            out.push_str(&comment.suffix);
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.whitespace)?;
        for comment in &self.comments {
            f.write_str(&comment.text)?;
            f.write_str(&comment.suffix)?;
        }
        Ok(())
    }
}
