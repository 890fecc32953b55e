// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions that drive a [`Visitor`] over a tree.
//!
//! The walk rebuilds a parent only when one of its children came back as a
//! different `Arc`; otherwise the parent itself is returned unchanged. A walk
//! that changes nothing therefore returns the very root it was given.
//!
//! For each node:
//!
//! 1. `visit_*` is called. `Remove` and `Flatten` results are spliced into
//!    the parent's children as they are; neither their children nor their
//!    `leave_*` hook are walked.
//! 2. Unless told to skip, the (possibly replaced) node's children are
//!    walked in order. After each child that changes, the parent cursor
//!    frame is updated, so later siblings see the earlier replacements.
//! 3. `leave_*` is called with the node rebuilt from its new children.
//!
//! Panics inside a hook are caught and reported as [`VisitError::Panicked`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::cursor::Cursor;
use crate::error::{VisitError, WalkError};
use crate::run::CancellationToken;
use crate::tree::Node;

use super::traits::{Transform, VisitResult, Visitor};

/// Cooperative interruption checked at every node boundary.
#[derive(Debug, Clone, Default)]
pub struct WalkLimits {
    pub cancellation: Option<CancellationToken>,
    pub deadline: Option<Instant>,
}

impl WalkLimits {
    /// No cancellation, no deadline.
    pub fn none() -> Self {
        WalkLimits::default()
    }

    pub fn check(&self) -> Result<(), VisitError> {
        if self
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            return Err(VisitError::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(VisitError::TimedOut);
        }
        Ok(())
    }
}

/// Walk `root` with `visitor` and return the transformed root.
pub fn walk(visitor: &dyn Visitor, root: &Arc<Node>) -> Result<Arc<Node>, WalkError> {
    walk_with(visitor, root, &WalkLimits::none())
}

/// [`walk`] with cancellation and a deadline.
pub fn walk_with(
    visitor: &dyn Visitor,
    root: &Arc<Node>,
    limits: &WalkLimits,
) -> Result<Arc<Node>, WalkError> {
    let mut walker = Walker {
        visitor,
        limits,
        stopped: false,
    };
    let cursor = Cursor::root(Arc::clone(root));
    match walker.walk_node(root, &cursor)? {
        Transform::Keep(node) => Ok(node),
        Transform::Remove | Transform::Flatten(_) => Err(locate(VisitError::RootSpliced, root)),
    }
}

struct Walker<'w> {
    visitor: &'w dyn Visitor,
    limits: &'w WalkLimits,
    stopped: bool,
}

impl Walker<'_> {
    fn walk_node(
        &mut self,
        node: &Arc<Node>,
        cursor: &Cursor<'_>,
    ) -> Result<Transform<Arc<Node>>, WalkError> {
        self.limits.check().map_err(|e| locate(e, node))?;

        let visitor = self.visitor;
        let visit = guarded(|| visitor.visit_node(node, cursor)).map_err(|e| locate(e, node))?;
        if visit.control == VisitResult::Stop {
            self.stopped = true;
            return Ok(visit.transform);
        }
        let mut current = match visit.transform {
            Transform::Keep(current) => current,
            spliced => return Ok(spliced),
        };

        cursor.set_value(Arc::clone(&current));
        if visit.control == VisitResult::Continue && !current.children().is_empty() {
            if let Some(children) = self.walk_children(&current, cursor)? {
                current = Arc::new(current.with_children(children));
                cursor.set_value(Arc::clone(&current));
            }
            if self.stopped {
                return Ok(Transform::Keep(current));
            }
        }

        guarded(|| visitor.leave_node(&current, cursor)).map_err(|e| locate(e, &current))
    }

    /// New child list, or `None` when every child came back unchanged.
    fn walk_children(
        &mut self,
        parent: &Arc<Node>,
        cursor: &Cursor<'_>,
    ) -> Result<Option<Vec<Arc<Node>>>, WalkError> {
        let originals = parent.children();
        let mut rebuilt: Option<Vec<Arc<Node>>> = None;

        for (i, child) in originals.iter().enumerate() {
            if self.stopped {
                if let Some(rebuilt) = rebuilt.as_mut() {
                    rebuilt.extend(originals[i..].iter().cloned());
                }
                break;
            }

            let frame = cursor.child(Arc::clone(child));
            let result = self.walk_node(child, &frame)?;
            if matches!(&result, Transform::Keep(kept) if Arc::ptr_eq(kept, child)) {
                if let Some(rebuilt) = rebuilt.as_mut() {
                    rebuilt.push(Arc::clone(child));
                }
                continue;
            }

            let rebuilt = rebuilt.get_or_insert_with(|| originals[..i].to_vec());
            match result {
                Transform::Keep(node) => rebuilt.push(node),
                Transform::Remove => {}
                Transform::Flatten(nodes) => rebuilt.extend(nodes),
            }

            let mut seen = rebuilt.clone();
            seen.extend(originals[i + 1..].iter().cloned());
            cursor.set_value(Arc::new(parent.with_children(seen)));
        }

        Ok(rebuilt)
    }
}

fn locate(error: VisitError, node: &Node) -> WalkError {
    WalkError {
        error,
        node: node.id(),
        span: node.origin().map(|o| o.span()),
        start: node.origin().map(|o| o.start()),
    }
}

fn guarded<T>(hook: impl FnOnce() -> Result<T, VisitError>) -> Result<T, VisitError> {
    match panic::catch_unwind(AssertUnwindSafe(hook)) {
        Ok(result) => result,
        Err(payload) => Err(VisitError::Panicked {
            message: panic_message(&*payload),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Kind, Space};
    use crate::visitor::{IdentityVisitor, LeaveOutcome, Visit, VisitOutcome};

    fn token(kind: Kind, text: &str) -> Arc<Node> {
        Arc::new(Node::token(kind, text).with_prefix(Space::new(" ")))
    }

    fn sample() -> Arc<Node> {
        let a = Arc::new(Node::branch(
            Kind::Statement,
            vec![token(Kind::Identifier, "a"), token(Kind::Punct, ";")],
        ));
        let b = Arc::new(Node::branch(
            Kind::Statement,
            vec![token(Kind::Identifier, "b"), token(Kind::Punct, ";")],
        ));
        let c = Arc::new(Node::branch(
            Kind::Statement,
            vec![token(Kind::Identifier, "c"), token(Kind::Punct, ";")],
        ));
        Arc::new(Node::branch(Kind::Block, vec![a, b, c]))
    }

    fn identifiers(root: &Arc<Node>) -> Vec<String> {
        root.preorder()
            .iter()
            .filter(|n| n.is(Kind::Identifier))
            .filter_map(|n| n.text().map(str::to_string))
            .collect()
    }

    struct Rename;

    impl Visitor for Rename {
        fn visit_identifier(&self, node: &Arc<Node>, _: &Cursor<'_>) -> VisitOutcome {
            if node.text() == Some("b") {
                return Ok(Visit::replace(node.with_text("bee")));
            }
            Ok(Visit::keep(node))
        }
    }

    #[test]
    fn identity_returns_the_same_root() {
        let root = sample();
        let result = walk(&IdentityVisitor, &root).unwrap();
        assert!(Arc::ptr_eq(&root, &result));
    }

    #[test]
    fn rebuilds_only_the_changed_path() {
        let root = sample();
        let result = walk(&Rename, &root).unwrap();
        assert!(!Arc::ptr_eq(&root, &result));
        assert_eq!(result.id(), root.id());
        assert_eq!(identifiers(&result), vec!["a", "bee", "c"]);
        // Untouched siblings are shared, not copied.
        assert!(Arc::ptr_eq(&root.children()[0], &result.children()[0]));
        assert!(Arc::ptr_eq(&root.children()[2], &result.children()[2]));
        assert_eq!(result.children()[1].id(), root.children()[1].id());
    }

    struct Splice;

    impl Visitor for Splice {
        fn visit_statement(&self, node: &Arc<Node>, _: &Cursor<'_>) -> VisitOutcome {
            match node.tokens_text().as_str() {
                "a;" => Ok(Visit::remove()),
                "b;" => Ok(Visit::insert_after(
                    node,
                    Node::branch(Kind::Statement, vec![token(Kind::Identifier, "x")]),
                )),
                "c;" => Ok(Visit::insert_before(
                    node,
                    Node::branch(Kind::Statement, vec![token(Kind::Identifier, "y")]),
                )),
                _ => Ok(Visit::keep(node)),
            }
        }
    }

    #[test]
    fn list_contexts_support_remove_and_insert() {
        let result = walk(&Splice, &sample()).unwrap();
        assert_eq!(identifiers(&result), vec!["b", "x", "y", "c"]);
    }

    #[test]
    fn splicing_the_root_is_an_error() {
        struct RemoveBlocks;
        impl Visitor for RemoveBlocks {
            fn visit_block(&self, _: &Arc<Node>, _: &Cursor<'_>) -> VisitOutcome {
                Ok(Visit::remove())
            }
        }
        let root = sample();
        let err = walk(&RemoveBlocks, &root).unwrap_err();
        assert_eq!(err.error, VisitError::RootSpliced);
        assert_eq!(err.node, root.id());
    }

    struct SkipAndCount;

    impl Visitor for SkipAndCount {
        fn visit_statement(&self, node: &Arc<Node>, _: &Cursor<'_>) -> VisitOutcome {
            Ok(Visit::skip(node))
        }

        fn visit_identifier(&self, _: &Arc<Node>, _: &Cursor<'_>) -> VisitOutcome {
            Err(VisitError::failed("identifiers must not be visited"))
        }

        fn leave_statement(&self, node: &Arc<Node>, _: &Cursor<'_>) -> LeaveOutcome {
            Ok(Transform::Keep(Arc::new(node.with_suffix(Space::new("\n")))))
        }
    }

    #[test]
    fn skip_children_still_calls_leave() {
        let result = walk(&SkipAndCount, &sample()).unwrap();
        assert!(result
            .children()
            .iter()
            .all(|s| s.suffix().whitespace() == "\n"));
    }

    struct StopAtB;

    impl Visitor for StopAtB {
        fn visit_identifier(&self, node: &Arc<Node>, _: &Cursor<'_>) -> VisitOutcome {
            match node.text() {
                Some("a") => Ok(Visit::replace(node.with_text("A"))),
                Some("b") => Ok(Visit::stop(node)),
                _ => Ok(Visit::replace(node.with_text("never"))),
            }
        }
    }

    #[test]
    fn stop_keeps_earlier_changes_and_leaves_the_rest() {
        let root = sample();
        let result = walk(&StopAtB, &root).unwrap();
        assert_eq!(identifiers(&result), vec!["A", "b", "c"]);
        assert!(Arc::ptr_eq(&root.children()[2], &result.children()[2]));
    }

    struct ParentAware;

    impl Visitor for ParentAware {
        fn visit_punct(&self, node: &Arc<Node>, cursor: &Cursor<'_>) -> VisitOutcome {
            let statement = cursor.first_enclosing_kind(Kind::Statement);
            let sibling = cursor.previous_sibling();
            match (statement, sibling) {
                (Some(_), Some(prev)) if prev.text() == Some("c") => {
                    Ok(Visit::replace(node.with_text("!")))
                }
                _ => Ok(Visit::keep(node)),
            }
        }
    }

    #[test]
    fn hooks_see_their_ancestors() {
        let result = walk(&ParentAware, &sample()).unwrap();
        assert_eq!(result.tokens_text(), "a;b;c!");
    }

    /// Uppercases a statement once the statement before it is uppercase.
    struct FollowPrevious;

    impl Visitor for FollowPrevious {
        fn visit_statement(&self, node: &Arc<Node>, cursor: &Cursor<'_>) -> VisitOutcome {
            let previous = cursor.previous_sibling().map(|p| p.tokens_text());
            let shout = match previous.as_deref() {
                None => true,
                Some(text) => text == text.to_uppercase(),
            };
            if !shout {
                return Ok(Visit::keep(node));
            }
            let children = node
                .children()
                .iter()
                .map(|c| match c.text() {
                    Some(text) => Arc::new(c.with_text(text.to_uppercase())),
                    None => Arc::clone(c),
                })
                .collect();
            Ok(Visit::skip(&Arc::new(node.with_children(children))))
        }

        fn visit_block(&self, node: &Arc<Node>, cursor: &Cursor<'_>) -> VisitOutcome {
            assert!(cursor.previous_sibling().is_none());
            Ok(Visit::keep(node))
        }
    }

    #[test]
    fn later_siblings_see_earlier_replacements() {
        let root = sample();
        let result = walk(&FollowPrevious, &root).unwrap();
        assert_eq!(result.tokens_text(), "A;B;C;");
        assert_eq!(result.id(), root.id());
    }

    #[test]
    fn parent_frame_tracks_removed_and_inserted_siblings() {
        struct Check;
        impl Visitor for Check {
            fn visit_statement(&self, node: &Arc<Node>, cursor: &Cursor<'_>) -> VisitOutcome {
                match node.tokens_text().as_str() {
                    "a;" => Ok(Visit::remove()),
                    "b;" => {
                        let parent = cursor.parent_value().unwrap();
                        assert_eq!(parent.tokens_text(), "b;c;");
                        assert!(cursor.previous_sibling().is_none());
                        Ok(Visit::insert_after(
                            node,
                            Node::branch(Kind::Statement, vec![token(Kind::Identifier, "x")]),
                        ))
                    }
                    "c;" => {
                        let previous = cursor.previous_sibling().unwrap();
                        assert_eq!(previous.tokens_text(), "x");
                        Ok(Visit::keep(node))
                    }
                    _ => Ok(Visit::keep(node)),
                }
            }
        }
        let result = walk(&Check, &sample()).unwrap();
        assert_eq!(result.tokens_text(), "b;xc;");
    }

    #[test]
    fn errors_are_located_at_the_failing_node() {
        struct FailOnC;
        impl Visitor for FailOnC {
            fn visit_identifier(&self, node: &Arc<Node>, _: &Cursor<'_>) -> VisitOutcome {
                if node.text() == Some("c") {
                    return Err(VisitError::failed("no c allowed"));
                }
                Ok(Visit::keep(node))
            }
        }
        let root = sample();
        let c = root.find(|n| n.text() == Some("c")).unwrap();
        let err = walk(&FailOnC, &root).unwrap_err();
        assert_eq!(err.node, c.id());
        assert_eq!(err.error, VisitError::failed("no c allowed"));
    }

    #[test]
    fn panics_become_errors() {
        struct Panics;
        impl Visitor for Panics {
            fn visit_punct(&self, _: &Arc<Node>, _: &Cursor<'_>) -> VisitOutcome {
                panic!("bad punct");
            }
        }
        let err = walk(&Panics, &sample()).unwrap_err();
        assert_eq!(
            err.error,
            VisitError::Panicked {
                message: "bad punct".to_string()
            }
        );
    }

    #[test]
    fn cancelled_walks_fail_fast() {
        let token = CancellationToken::new();
        token.cancel();
        let limits = WalkLimits {
            cancellation: Some(token),
            deadline: None,
        };
        let err = walk_with(&IdentityVisitor, &sample(), &limits).unwrap_err();
        assert_eq!(err.error, VisitError::Cancelled);

        let expired = WalkLimits {
            cancellation: None,
            deadline: Some(Instant::now()),
        };
        let err = walk_with(&IdentityVisitor, &sample(), &expired).unwrap_err();
        assert_eq!(err.error, VisitError::TimedOut);
    }
}
