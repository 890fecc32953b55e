// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definitions for tree transformation.

use std::sync::Arc;

use crate::cursor::Cursor;
use crate::error::VisitError;
use crate::tree::{CustomKind, Kind, Node};

/// Controls how the walker proceeds after a `visit_*` hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// The walker will not descend into this node's children, but `leave_*`
    /// will still be called for this node.
    SkipChildren,

    /// Stop traversal entirely.
    ///
    /// No further `visit_*` or `leave_*` hooks are called. Changes made so
    /// far are kept; the rest of the tree is left as it was.
    Stop,
}

/// Generic transform result for list-like contexts.
///
/// Every child of a node sits in its parent's child list, so any hook can
/// remove its node or replace it with several.
#[derive(Debug, Clone)]
pub enum Transform<T> {
    /// Keep the (possibly replaced) node.
    Keep(T),
    /// Remove the node from the list.
    Remove,
    /// Replace the node with multiple nodes.
    Flatten(Vec<T>),
}

impl<T> Transform<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep(_))
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, Self::Remove)
    }

    pub fn is_flatten(&self) -> bool {
        matches!(self, Self::Flatten(_))
    }

    /// Maps the inner value using the provided function.
    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Transform<U> {
        match self {
            Transform::Keep(t) => Transform::Keep(f(t)),
            Transform::Remove => Transform::Remove,
            Transform::Flatten(v) => Transform::Flatten(v.into_iter().map(f).collect()),
        }
    }
}

impl<T> From<T> for Transform<T> {
    fn from(value: T) -> Self {
        Transform::Keep(value)
    }
}

/// What a `visit_*` hook decided: the node's replacement and whether to
/// descend.
#[derive(Debug, Clone)]
pub struct Visit {
    pub transform: Transform<Arc<Node>>,
    pub control: VisitResult,
}

impl Visit {
    /// Leave the node as it is and descend.
    pub fn keep(node: &Arc<Node>) -> Self {
        Visit {
            transform: Transform::Keep(Arc::clone(node)),
            control: VisitResult::Continue,
        }
    }

    /// Replace the node and descend into the replacement.
    pub fn replace(node: impl Into<Arc<Node>>) -> Self {
        Visit {
            transform: Transform::Keep(node.into()),
            control: VisitResult::Continue,
        }
    }

    /// Keep the node and do not descend.
    pub fn skip(node: &Arc<Node>) -> Self {
        Visit {
            transform: Transform::Keep(Arc::clone(node)),
            control: VisitResult::SkipChildren,
        }
    }

    /// Keep the node and end the walk.
    pub fn stop(node: &Arc<Node>) -> Self {
        Visit {
            transform: Transform::Keep(Arc::clone(node)),
            control: VisitResult::Stop,
        }
    }

    /// Drop the node from its parent's children.
    pub fn remove() -> Self {
        Visit {
            transform: Transform::Remove,
            control: VisitResult::SkipChildren,
        }
    }

    /// Splice `nodes` into the parent's children in place of the node.
    pub fn flatten(nodes: Vec<Arc<Node>>) -> Self {
        Visit {
            transform: Transform::Flatten(nodes),
            control: VisitResult::SkipChildren,
        }
    }

    /// Put `new` in front of the node.
    pub fn insert_before(node: &Arc<Node>, new: impl Into<Arc<Node>>) -> Self {
        Visit::flatten(vec![new.into(), Arc::clone(node)])
    }

    /// Put `new` after the node.
    pub fn insert_after(node: &Arc<Node>, new: impl Into<Arc<Node>>) -> Self {
        Visit::flatten(vec![Arc::clone(node), new.into()])
    }

    pub fn with_control(self, control: VisitResult) -> Self {
        Visit { control, ..self }
    }
}

/// Result of a `visit_*` hook.
pub type VisitOutcome = Result<Visit, VisitError>;

/// Result of a `leave_*` hook.
pub type LeaveOutcome = Result<Transform<Arc<Node>>, VisitError>;

/// Generates `visit_*` and `leave_*` hook pairs whose defaults keep the node.
///
/// ```ignore
/// visitor_methods! {
///     // Generates visit_class_decl and leave_class_decl
///     class_decl: ClassDecl,
/// }
/// ```
macro_rules! visitor_methods {
    (
        $(
            $base_name:ident : $kind:ident
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                #[doc = concat!("Visit a [`Kind::", stringify!($kind), "`] node.")]
                #[doc = ""]
                #[doc = "Called before descending into children. Defaults to keeping the node."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](
                    &self,
                    node: &Arc<Node>,
                    cursor: &Cursor<'_>,
                ) -> VisitOutcome {
                    Ok(Visit::keep(node))
                }

                #[doc = concat!("Leave a [`Kind::", stringify!($kind), "`] node.")]
                #[doc = ""]
                #[doc = "Called after children, even if `SkipChildren` was returned."]
                #[doc = "Defaults to keeping the node."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](
                    &self,
                    node: &Arc<Node>,
                    cursor: &Cursor<'_>,
                ) -> LeaveOutcome {
                    Ok(Transform::Keep(Arc::clone(node)))
                }
            )*
        }
    };
}

/// Generates the kind dispatch of [`Visitor::visit_node`] and
/// [`Visitor::leave_node`].
macro_rules! dispatch_methods {
    (
        $(
            $base_name:ident : $kind:ident
        ),* $(,)?
    ) => {
        paste::paste! {
            /// Entry point the walker calls before a node's children.
            ///
            /// Dispatches on [`Node::kind`]. Override a `visit_*` hook
            /// instead unless every kind needs the same handling.
            fn visit_node(&self, node: &Arc<Node>, cursor: &Cursor<'_>) -> VisitOutcome {
                match node.kind() {
                    $( Kind::$kind => self.[<visit_ $base_name>](node, cursor), )*
                    Kind::Custom(kind) => self.visit_custom(kind, node, cursor),
                }
            }

            /// Entry point the walker calls after a node's children.
            fn leave_node(&self, node: &Arc<Node>, cursor: &Cursor<'_>) -> LeaveOutcome {
                match node.kind() {
                    $( Kind::$kind => self.[<leave_ $base_name>](node, cursor), )*
                    Kind::Custom(kind) => self.leave_custom(kind, node, cursor),
                }
            }
        }
    };
}

/// Tree transformer.
///
/// Each built-in [`Kind`] has a `visit_*` / `leave_*` hook pair. Every hook
/// defaults to identity, so a visitor overrides only the kinds it cares
/// about. Front-end specific kinds go through [`Visitor::visit_custom`].
///
/// # Traversal Order
///
/// - `visit_*` is called in **pre-order** (before children)
/// - `leave_*` is called in **post-order** (after children)
/// - Children are visited in order, each seeing its earlier siblings'
///   replacements through the cursor
///
/// Visitors are shared across threads and must not mutate state of their
/// own during a walk; per-walk state belongs in [`Cursor`] messages.
///
/// # Example
///
/// ```ignore
/// struct Shout;
///
/// impl Visitor for Shout {
///     fn name(&self) -> &str {
///         "shout"
///     }
///
///     fn visit_identifier(&self, node: &Arc<Node>, _: &Cursor<'_>) -> VisitOutcome {
///         let text = node.text().unwrap_or_default().to_uppercase();
///         Ok(Visit::replace(node.with_text(text)))
///     }
/// }
/// ```
pub trait Visitor: Send + Sync {
    /// Name used in logs and error reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    // Files
    visitor_methods! {
        source_file: SourceFile,
        plain_text: PlainText,
        eof: Eof,
    }

    // Tokens
    visitor_methods! {
        identifier: Identifier,
        keyword: Keyword,
        modifier: Modifier,
        literal: Literal,
        punct: Punct,
    }

    // Code
    visitor_methods! {
        block: Block,
        statement: Statement,
        expression: Expression,
        group: Group,
    }

    // Declarations
    visitor_methods! {
        package: Package,
        import: Import,
        qualified_name: QualifiedName,
        class_decl: ClassDecl,
        method_decl: MethodDecl,
        variable_decl: VariableDecl,
        variable: Variable,
        enum_value: EnumValue,
        annotation: Annotation,
        type_ref: TypeRef,
        type_parameters: TypeParameters,
        type_arguments: TypeArguments,
        parameters: Parameters,
        parameter: Parameter,
        throws: Throws,
    }

    /// Visit a front-end specific node.
    #[allow(unused_variables)]
    fn visit_custom(
        &self,
        kind: CustomKind,
        node: &Arc<Node>,
        cursor: &Cursor<'_>,
    ) -> VisitOutcome {
        Ok(Visit::keep(node))
    }

    /// Leave a front-end specific node.
    #[allow(unused_variables)]
    fn leave_custom(
        &self,
        kind: CustomKind,
        node: &Arc<Node>,
        cursor: &Cursor<'_>,
    ) -> LeaveOutcome {
        Ok(Transform::Keep(Arc::clone(node)))
    }

    dispatch_methods! {
        source_file: SourceFile,
        plain_text: PlainText,
        eof: Eof,
        identifier: Identifier,
        keyword: Keyword,
        modifier: Modifier,
        literal: Literal,
        punct: Punct,
        block: Block,
        statement: Statement,
        expression: Expression,
        group: Group,
        package: Package,
        import: Import,
        qualified_name: QualifiedName,
        class_decl: ClassDecl,
        method_decl: MethodDecl,
        variable_decl: VariableDecl,
        variable: Variable,
        enum_value: EnumValue,
        annotation: Annotation,
        type_ref: TypeRef,
        type_parameters: TypeParameters,
        type_arguments: TypeArguments,
        parameters: Parameters,
        parameter: Parameter,
        throws: Throws,
    }
}

/// A visitor that overrides nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityVisitor;

impl Visitor for IdentityVisitor {
    fn name(&self) -> &str {
        "identity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visit_result_default_is_continue() {
        assert_eq!(VisitResult::default(), VisitResult::Continue);
    }

    #[test]
    fn transform_predicates_and_map() {
        let keep: Transform<i32> = 1.into();
        assert!(keep.is_keep());
        assert!(Transform::<i32>::Remove.is_remove());
        let doubled = Transform::Flatten(vec![1, 2]).map(|x| x * 2);
        match doubled {
            Transform::Flatten(v) => assert_eq!(v, vec![2, 4]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn insert_helpers_order_nodes() {
        let node = Arc::new(Node::token(Kind::Identifier, "b"));
        let before = Visit::insert_before(&node, Node::token(Kind::Identifier, "a"));
        let after = Visit::insert_after(&node, Node::token(Kind::Identifier, "c"));
        let texts = |visit: Visit| match visit.transform {
            Transform::Flatten(nodes) => nodes
                .iter()
                .filter_map(|n| n.text().map(str::to_string))
                .collect::<Vec<_>>(),
            _ => Vec::new(),
        };
        assert_eq!(texts(before), vec!["a", "b"]);
        assert_eq!(texts(after), vec!["b", "c"]);
    }

    #[test]
    fn default_hooks_return_the_same_node() {
        let node = Arc::new(Node::token(Kind::Identifier, "x"));
        let cursor = Cursor::root(Arc::clone(&node));
        let visit = IdentityVisitor.visit_node(&node, &cursor).unwrap();
        assert_eq!(visit.control, VisitResult::Continue);
        match visit.transform {
            Transform::Keep(kept) => assert!(Arc::ptr_eq(&kept, &node)),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(IdentityVisitor.name(), "identity");
    }
}
