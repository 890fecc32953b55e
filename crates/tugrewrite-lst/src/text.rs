// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Plain text front end.
//!
//! A plain text file is a [`Kind::SourceFile`] with a single
//! [`Kind::PlainText`] leaf holding the whole text. It accepts any input and
//! is the fallback for files no other parser claims.

use std::path::Path;
use std::sync::Arc;

use crate::error::ParseResult;
use crate::parser::LanguageParser;
use crate::tree::{seal, Kind, Node, Space};

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextParser;

impl PlainTextParser {
    /// Parse `text` without a path.
    pub fn parse_text(&self, text: &str) -> ParseResult<Arc<Node>> {
        self.parse(text, None)
    }
}

impl LanguageParser for PlainTextParser {
    fn language(&self) -> &str {
        "text"
    }

    fn can_parse(&self, _path: &Path) -> bool {
        true
    }

    fn parse(&self, text: &str, path: Option<&Path>) -> ParseResult<Arc<Node>> {
        let leaf = Node::token(Kind::PlainText, text).with_prefix(Space::EMPTY);
        let file = Node::branch(Kind::SourceFile, vec![Arc::new(leaf)]).with_prefix(Space::EMPTY);
        seal(&file, Arc::from(text)).map_err(|e| match path {
            Some(path) => e.with_path(path),
            None => e,
        })
    }
}
