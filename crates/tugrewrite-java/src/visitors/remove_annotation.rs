// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use tugrewrite_lst::cursor::Cursor;
use tugrewrite_lst::recipe::VisitorParams;
use tugrewrite_lst::tree::{Kind, Node};
use tugrewrite_lst::visitor::{LeaveOutcome, Transform};
use tugrewrite_lst::{RecipeResult, Visit, VisitOutcome, Visitor};

/// Set on a declaration's frame when its leading annotation was removed.
const STRIP_LEADING: &str = "remove-annotation.strip-leading";

/// Removes annotations by name.
///
/// `Deprecated` matches `@Deprecated` and `@java.lang.Deprecated`; a
/// qualified name must match a qualified annotation exactly, or the simple
/// name of an unqualified one.
///
/// When the removed annotation was the first thing in its declaration, the
/// next token moves into its place: its leading whitespace is dropped and
/// any comments in front of it stay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveAnnotation {
    name: String,
}

impl RemoveAnnotation {
    pub const NAME: &'static str = "remove-annotation";

    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        RemoveAnnotation {
            name: name.trim_start_matches('@').to_string(),
        }
    }

    /// Parameters: `name` (required).
    pub fn from_params(params: &VisitorParams) -> RecipeResult<Self> {
        params.expect_only(&["name"])?;
        let name = params.required_str("name")?;
        if name.trim_start_matches('@').is_empty() {
            return Err(params.invalid("name", "empty annotation name"));
        }
        Ok(RemoveAnnotation::new(name))
    }

    fn matches(&self, annotation: &Node) -> bool {
        let Some(name) = annotation.children_of_kind(Kind::QualifiedName).next() else {
            return false;
        };
        let written = name.tokens_text();
        if written == self.name {
            return true;
        }
        let simple = |n: &str| n.rsplit('.').next().unwrap_or_default().to_string();
        let qualified = |n: &str| n.contains('.');
        match (qualified(&written), qualified(&self.name)) {
            (true, true) => false,
            _ => simple(&written) == simple(&self.name),
        }
    }

    fn strip_leading(&self, node: &Arc<Node>, cursor: &Cursor<'_>) -> LeaveOutcome {
        if cursor.take_message::<bool>(STRIP_LEADING).is_none() {
            return Ok(Transform::Keep(Arc::clone(node)));
        }
        let Some(first) = node.children().first() else {
            return Ok(Transform::Keep(Arc::clone(node)));
        };
        let prefix = first.prefix().cloned().unwrap_or_default();
        let mut children = node.children().to_vec();
        children[0] = Arc::new(first.with_prefix(prefix.with_whitespace("")));
        Ok(Transform::Keep(Arc::new(node.with_children(children))))
    }
}

impl Visitor for RemoveAnnotation {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn visit_annotation(&self, node: &Arc<Node>, cursor: &Cursor<'_>) -> VisitOutcome {
        if !self.matches(node) {
            return Ok(Visit::keep(node));
        }
        if cursor.previous_sibling().is_none() {
            if let Some(owner) = cursor.parent() {
                owner.put_message(STRIP_LEADING, true);
            }
        }
        Ok(Visit::remove())
    }

    fn leave_package(&self, node: &Arc<Node>, cursor: &Cursor<'_>) -> LeaveOutcome {
        self.strip_leading(node, cursor)
    }

    fn leave_class_decl(&self, node: &Arc<Node>, cursor: &Cursor<'_>) -> LeaveOutcome {
        self.strip_leading(node, cursor)
    }

    fn leave_method_decl(&self, node: &Arc<Node>, cursor: &Cursor<'_>) -> LeaveOutcome {
        self.strip_leading(node, cursor)
    }

    fn leave_variable_decl(&self, node: &Arc<Node>, cursor: &Cursor<'_>) -> LeaveOutcome {
        self.strip_leading(node, cursor)
    }

    fn leave_parameter(&self, node: &Arc<Node>, cursor: &Cursor<'_>) -> LeaveOutcome {
        self.strip_leading(node, cursor)
    }

    fn leave_enum_value(&self, node: &Arc<Node>, cursor: &Cursor<'_>) -> LeaveOutcome {
        self.strip_leading(node, cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::JavaParser;
    use tugrewrite_lst::printer::print;
    use tugrewrite_lst::visitor::walk;

    fn remove(name: &str, text: &str) -> String {
        let tree = JavaParser.parse_source(text).unwrap();
        let out = walk(&RemoveAnnotation::new(name), &tree).unwrap();
        print(&out).unwrap()
    }

    #[test]
    fn leading_annotation_keeps_the_comment_after_it() {
        assert_eq!(
            remove("Deprecated", "@Deprecated\n// Some comment\npublic final class A {}"),
            "// Some comment\npublic final class A {}"
        );
    }

    #[test]
    fn later_annotation_leaves_spacing_alone() {
        assert_eq!(
            remove("Override", "class A {\n    @Deprecated @Override\n    void f() {}\n}"),
            "class A {\n    @Deprecated\n    void f() {}\n}"
        );
        assert_eq!(
            remove("Deprecated", "class A {\n    @Deprecated @Override\n    void f() {}\n}"),
            "class A {\n    @Override\n    void f() {}\n}"
        );
    }

    #[test]
    fn parameters_and_fields() {
        assert_eq!(
            remove(
                "Nullable",
                "class A { @Nullable String s; void f(int a, @Nullable String b) {} }"
            ),
            "class A { String s; void f(int a, String b) {} }"
        );
    }

    #[test]
    fn name_matching() {
        let text = "@java.lang.Deprecated class A {}";
        assert_eq!(remove("Deprecated", text), "class A {}");
        assert_eq!(remove("java.lang.Deprecated", text), "class A {}");
        assert_eq!(remove("other.Deprecated", text), text);
        assert_eq!(remove("@Deprecated", "@Deprecated class A {}"), "class A {}");
        assert_eq!(remove("Deprecate", "@Deprecated class A {}"), "@Deprecated class A {}");
    }

    #[test]
    fn nothing_to_remove_keeps_the_tree() {
        let tree = JavaParser.parse_source("class A { void f() {} }").unwrap();
        let out = walk(&RemoveAnnotation::new("Deprecated"), &tree).unwrap();
        assert!(Arc::ptr_eq(&out, &tree));
    }

    #[test]
    fn params() {
        let params = VisitorParams::new(RemoveAnnotation::NAME).with("name", "@");
        assert!(RemoveAnnotation::from_params(&params).is_err());
        let params = VisitorParams::new(RemoveAnnotation::NAME).with("name", "Deprecated");
        assert_eq!(
            RemoveAnnotation::from_params(&params).unwrap(),
            RemoveAnnotation::new("Deprecated")
        );
    }
}
