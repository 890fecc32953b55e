// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The boundary between source text and trees.

use std::path::Path;
use std::sync::Arc;

use crate::error::ParseResult;
use crate::tree::Node;

/// A front end that turns source text into a sealed tree.
///
/// Implementations must return trees whose every node carries an origin,
/// so that printing the unchanged tree reproduces `text` exactly. The
/// simplest way to get there is to build the tree with explicit prefixes
/// and finish with [`seal`](crate::tree::seal).
pub trait LanguageParser: Send + Sync {
    /// Short language name, e.g. `"java"`.
    fn language(&self) -> &str;

    /// Whether this parser handles `path`, usually by extension.
    fn can_parse(&self, path: &Path) -> bool;

    /// Parse `text`. `path` is used for error messages only.
    fn parse(&self, text: &str, path: Option<&Path>) -> ParseResult<Arc<Node>>;
}

/// Parsers tried in registration order.
#[derive(Default)]
pub struct ParserSet {
    parsers: Vec<Box<dyn LanguageParser>>,
}

impl ParserSet {
    pub fn new() -> Self {
        ParserSet::default()
    }

    pub fn with(mut self, parser: impl LanguageParser + 'static) -> Self {
        self.parsers.push(Box::new(parser));
        self
    }

    /// First parser that accepts `path`.
    pub fn parser_for(&self, path: &Path) -> Option<&dyn LanguageParser> {
        self.parsers
            .iter()
            .find(|p| p.can_parse(path))
            .map(|p| p.as_ref())
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.parsers.iter().map(|p| p.language())
    }
}
