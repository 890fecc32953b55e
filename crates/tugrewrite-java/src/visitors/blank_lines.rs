// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use tugrewrite_lst::cursor::Cursor;
use tugrewrite_lst::recipe::VisitorParams;
use tugrewrite_lst::tree::{Kind, Node};
use tugrewrite_lst::{RecipeResult, Visit, VisitOutcome, Visitor};

/// Blank line limits. Minimums apply on both sides of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankLinesStyle {
    pub keep_maximum_in_declarations: usize,
    pub keep_maximum_before_end_of_block: usize,
    pub minimum_after_package: usize,
    pub minimum_after_imports: usize,
    pub minimum_around_class: usize,
    pub minimum_after_class_header: usize,
    pub minimum_around_field: usize,
    pub minimum_around_method: usize,
    pub minimum_around_initializer: usize,
}

impl Default for BlankLinesStyle {
    fn default() -> Self {
        BlankLinesStyle {
            keep_maximum_in_declarations: 2,
            keep_maximum_before_end_of_block: 2,
            minimum_after_package: 1,
            minimum_after_imports: 1,
            minimum_around_class: 1,
            minimum_after_class_header: 0,
            minimum_around_field: 0,
            minimum_around_method: 1,
            minimum_around_initializer: 1,
        }
    }
}

/// Enforces blank line limits between top-level items and between the
/// members of class bodies.
///
/// Only line breaks that are already there are adjusted: two items on the
/// same line stay on the same line. Indentation and comments are kept.
/// Method bodies are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlankLines {
    style: BlankLinesStyle,
}

impl BlankLines {
    pub const NAME: &'static str = "blank-lines";

    pub fn new(style: BlankLinesStyle) -> Self {
        BlankLines { style }
    }

    /// Parameters: any [`BlankLinesStyle`] field in camelCase, e.g.
    /// `keepMaximumInDeclarations` or `minimumAfterClassHeader`.
    pub fn from_params(params: &VisitorParams) -> RecipeResult<Self> {
        let mut style = BlankLinesStyle::default();
        let fields: [(&str, &mut usize); 9] = [
            ("keepMaximumInDeclarations", &mut style.keep_maximum_in_declarations),
            ("keepMaximumBeforeEndOfBlock", &mut style.keep_maximum_before_end_of_block),
            ("minimumAfterPackage", &mut style.minimum_after_package),
            ("minimumAfterImports", &mut style.minimum_after_imports),
            ("minimumAroundClass", &mut style.minimum_around_class),
            ("minimumAfterClassHeader", &mut style.minimum_after_class_header),
            ("minimumAroundField", &mut style.minimum_around_field),
            ("minimumAroundMethod", &mut style.minimum_around_method),
            ("minimumAroundInitializer", &mut style.minimum_around_initializer),
        ];
        let known: Vec<&str> = fields.iter().map(|(key, _)| *key).collect();
        params.expect_only(&known)?;
        for (key, field) in fields {
            if let Some(value) = params.optional_u64(key)? {
                *field = usize::try_from(value).map_err(|_| params.invalid(key, "too large"))?;
            }
        }
        Ok(BlankLines::new(style))
    }

    pub fn style(&self) -> &BlankLinesStyle {
        &self.style
    }

    fn around(&self, member: &Node) -> usize {
        match member.kind() {
            Kind::ClassDecl => self.style.minimum_around_class,
            Kind::MethodDecl => self.style.minimum_around_method,
            Kind::VariableDecl => self.style.minimum_around_field,
            Kind::Block | Kind::Statement => self.style.minimum_around_initializer,
            _ => 0,
        }
    }

    /// Blank line bounds in front of the `index`-th child of a file.
    fn top_level_bounds(&self, children: &[Arc<Node>], index: usize) -> Option<(usize, usize)> {
        let node = &children[index];
        let previous = &children[index - 1];
        if node.is(Kind::Eof) {
            return None;
        }
        let minimum = match (previous.kind(), node.kind()) {
            (Kind::Package, _) => self.style.minimum_after_package,
            (Kind::Import, Kind::Import) => 0,
            (Kind::Import, _) => self.style.minimum_after_imports,
            (previous, current) => {
                let around_class = |k: Kind| k == Kind::ClassDecl;
                if around_class(previous) || around_class(current) {
                    self.style.minimum_around_class
                } else {
                    0
                }
            }
        };
        Some((minimum, self.style.keep_maximum_in_declarations))
    }

    /// Blank line bounds in front of the `index`-th child of a class body.
    fn member_bounds(&self, children: &[Arc<Node>], index: usize) -> Option<(usize, usize)> {
        let node = &children[index];
        let previous = &children[index - 1];
        let is_open = |n: &Node| n.is(Kind::Punct) && n.text() == Some("{");
        if index == children.len() - 1 && node.text() == Some("}") {
            return Some((0, self.style.keep_maximum_before_end_of_block));
        }
        if node.is(Kind::Punct) {
            return None;
        }
        let minimum = if is_open(previous) {
            self.style.minimum_after_class_header
        } else {
            self.around(node).max(self.around(previous))
        };
        Some((minimum, self.style.keep_maximum_in_declarations))
    }

    fn adjust(
        &self,
        node: &Arc<Node>,
        bounds: impl Fn(&[Arc<Node>], usize) -> Option<(usize, usize)>,
    ) -> Arc<Node> {
        let children = node.children();
        let mut rebuilt: Option<Vec<Arc<Node>>> = None;
        for index in 1..children.len() {
            let child = &children[index];
            let Some(prefix) = child.prefix() else {
                continue;
            };
            let newlines = prefix.newlines();
            if newlines == 0 {
                continue;
            }
            let Some((minimum, maximum)) = bounds(children, index) else {
                continue;
            };
            let blank = newlines - 1;
            let wanted = blank.clamp(minimum, maximum.max(minimum));
            if wanted == blank {
                continue;
            }
            let whitespace = prefix.whitespace();
            let indent = whitespace.rsplit('\n').next().unwrap_or_default();
            let fixed = format!("{}{}", "\n".repeat(wanted + 1), indent);
            let replacement = Arc::new(child.with_prefix(prefix.with_whitespace(fixed)));
            rebuilt.get_or_insert_with(|| children.to_vec())[index] = replacement;
        }
        match rebuilt {
            Some(children) => Arc::new(node.with_children(children)),
            None => Arc::clone(node),
        }
    }
}

impl Visitor for BlankLines {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn visit_source_file(&self, node: &Arc<Node>, _cursor: &Cursor<'_>) -> VisitOutcome {
        let adjusted = self.adjust(node, |children, i| self.top_level_bounds(children, i));
        Ok(Visit::replace(adjusted))
    }

    fn visit_block(&self, node: &Arc<Node>, cursor: &Cursor<'_>) -> VisitOutcome {
        let in_class = cursor
            .parent_value()
            .is_some_and(|p| p.is(Kind::ClassDecl) || p.is(Kind::EnumValue));
        if !in_class {
            return Ok(Visit::skip(node));
        }
        let adjusted = self.adjust(node, |children, i| self.member_bounds(children, i));
        Ok(Visit::replace(adjusted))
    }
}
