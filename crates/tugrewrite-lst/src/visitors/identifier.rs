// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Identifier-level visitors: rename and search.

use std::sync::Arc;

use crate::cursor::Cursor;
use crate::error::RecipeResult;
use crate::recipe::VisitorParams;
use crate::tree::{Marker, Node};
use crate::visitor::{Visit, VisitOutcome, Visitor};

/// True for C-family identifiers: a letter, `_` or `$`, then letters,
/// digits, `_` or `$`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Renames identifier tokens by exact spelling.
///
/// Only the token text changes. The token keeps its id and formatting, and
/// every untouched sibling subtree stays shared with the input tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameIdentifier {
    from: String,
    to: String,
}

impl RenameIdentifier {
    pub const NAME: &'static str = "rename-identifier";

    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        RenameIdentifier {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Parameters: `from` and `to` (both required identifiers).
    pub fn from_params(params: &VisitorParams) -> RecipeResult<Self> {
        params.expect_only(&["from", "to"])?;
        let from = params.required_str("from")?;
        let to = params.required_str("to")?;
        for (key, value) in [("from", &from), ("to", &to)] {
            if !is_identifier(value) {
                return Err(params.invalid(key, format!("`{}` is not an identifier", value)));
            }
        }
        Ok(RenameIdentifier::new(from, to))
    }
}

impl Visitor for RenameIdentifier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn visit_identifier(&self, node: &Arc<Node>, _cursor: &Cursor<'_>) -> VisitOutcome {
        if node.text() != Some(self.from.as_str()) {
            return Ok(Visit::keep(node));
        }
        Ok(Visit::replace(node.with_text(self.to.as_str())))
    }
}

/// Marks identifier tokens with a search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindIdentifier {
    name: String,
    description: Option<String>,
}

impl FindIdentifier {
    pub const NAME: &'static str = "find-identifier";

    pub fn new(name: impl Into<String>) -> Self {
        FindIdentifier {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Parameters: `name` (required), `description` (optional).
    pub fn from_params(params: &VisitorParams) -> RecipeResult<Self> {
        params.expect_only(&["name", "description"])?;
        let found = FindIdentifier::new(params.required_str("name")?);
        Ok(match params.optional_str("description")? {
            Some(description) => found.with_description(description),
            None => found,
        })
    }

    fn marker(&self) -> Marker {
        Marker::SearchResult {
            description: self.description.clone(),
        }
    }
}

impl Visitor for FindIdentifier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn visit_identifier(&self, node: &Arc<Node>, _cursor: &Cursor<'_>) -> VisitOutcome {
        let marker = self.marker();
        if node.text() != Some(self.name.as_str()) || node.markers().contains(&marker) {
            return Ok(Visit::keep(node));
        }
        Ok(Visit::replace(node.with_marker(marker)))
    }
}
