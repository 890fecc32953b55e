// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use crate::cursor::Cursor;
use crate::error::RecipeResult;
use crate::recipe::VisitorParams;
use crate::tree::Node;
use crate::visitor::{Visit, VisitOutcome, Visitor};

/// Replaces the text of every plain text leaf with a fixed string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeText {
    to_text: String,
}

impl ChangeText {
    pub const NAME: &'static str = "change-text";

    pub fn new(to_text: impl Into<String>) -> Self {
        ChangeText {
            to_text: to_text.into(),
        }
    }

    /// Parameters: `toText` (required).
    pub fn from_params(params: &VisitorParams) -> RecipeResult<Self> {
        params.expect_only(&["toText"])?;
        Ok(ChangeText::new(params.required_str("toText")?))
    }

    pub fn to_text(&self) -> &str {
        &self.to_text
    }
}

impl Visitor for ChangeText {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn visit_plain_text(&self, node: &Arc<Node>, _cursor: &Cursor<'_>) -> VisitOutcome {
        if node.text() == Some(self.to_text.as_str()) {
            return Ok(Visit::keep(node));
        }
        Ok(Visit::replace(node.with_text(self.to_text.as_str())))
    }
}
