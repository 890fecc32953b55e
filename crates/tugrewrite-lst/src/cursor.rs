// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The ancestor chain of the node being visited.
//!
//! A walk creates one [`Cursor`] frame per node on its call stack; each frame
//! borrows its parent, so a cursor can never outlive the visit that created
//! it. Frames also carry a small message map. Visitors use it to pass facts
//! down to descendants ([`Cursor::nearest_message`]) or up to an enclosing
//! node's `leave_*` hook ([`Cursor::put_message_on_first_enclosing`]).
//! Messages live only as long as the walk.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::tree::{Kind, Node};

pub struct Cursor<'a> {
    parent: Option<&'a Cursor<'a>>,
    value: RefCell<Arc<Node>>,
    messages: RefCell<HashMap<String, Box<dyn Any>>>,
}

impl<'a> Cursor<'a> {
    /// The frame for the root of a walk.
    pub fn root(node: Arc<Node>) -> Cursor<'static> {
        Cursor {
            parent: None,
            value: RefCell::new(node),
            messages: RefCell::new(HashMap::new()),
        }
    }

    /// A frame for a child of this frame's node.
    pub fn child(&'a self, node: Arc<Node>) -> Cursor<'a> {
        Cursor {
            parent: Some(self),
            value: RefCell::new(node),
            messages: RefCell::new(HashMap::new()),
        }
    }

    /// The node this frame points at, as the walk currently sees it.
    pub fn value(&self) -> Arc<Node> {
        Arc::clone(&self.value.borrow())
    }

    pub(crate) fn set_value(&self, node: Arc<Node>) {
        *self.value.borrow_mut() = node;
    }

    pub fn parent(&self) -> Option<&'a Cursor<'a>> {
        self.parent
    }

    /// The parent frame's node.
    pub fn parent_value(&self) -> Option<Arc<Node>> {
        self.parent.map(|p| p.value())
    }

    /// This frame, then its parent, and so on up to the root frame.
    fn frames(&self) -> impl Iterator<Item = &Cursor<'a>> {
        std::iter::successors(Some(self), |c| c.parent)
    }

    /// Number of ancestors. The root frame has depth 0.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Parent, grandparent and so on up to the root frame.
    pub fn ancestors(&self) -> impl Iterator<Item = &Cursor<'a>> {
        self.frames().skip(1)
    }

    /// The frame at the top of the walk.
    pub fn root_frame(&self) -> &Cursor<'a> {
        self.frames().last().unwrap_or(self)
    }

    /// Nodes from this frame up to the root, this frame's node first.
    pub fn path(&self) -> Vec<Arc<Node>> {
        self.frames().map(|c| c.value()).collect()
    }

    /// Nearest node, starting with this frame's own, that satisfies `pred`.
    pub fn first_enclosing(&self, pred: impl Fn(&Node) -> bool) -> Option<Arc<Node>> {
        self.first_enclosing_frame(pred).map(|c| c.value())
    }

    pub fn first_enclosing_kind(&self, kind: Kind) -> Option<Arc<Node>> {
        self.first_enclosing(|n| n.kind() == kind)
    }

    fn first_enclosing_frame(&self, pred: impl Fn(&Node) -> bool) -> Option<&Cursor<'a>> {
        self.frames().find(|c| pred(&c.value.borrow()))
    }

    /// The sibling just before this frame's node in the parent's children.
    pub fn previous_sibling(&self) -> Option<Arc<Node>> {
        let parent = self.parent_value()?;
        let id = self.value.borrow().id();
        let index = parent.children().iter().position(|c| c.id() == id)?;
        index
            .checked_sub(1)
            .and_then(|i| parent.children().get(i).cloned())
    }

    // ------------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------------

    /// Store `value` on this frame. Last write wins.
    pub fn put_message<T: Any>(&self, key: impl Into<String>, value: T) {
        self.messages
            .borrow_mut()
            .insert(key.into(), Box::new(value));
    }

    /// Message stored on this frame, if it has type `T`.
    pub fn message<T: Any + Clone>(&self, key: &str) -> Option<T> {
        self.messages
            .borrow()
            .get(key)
            .and_then(|v| v.downcast_ref::<T>())
            .cloned()
    }

    /// Remove and return a message stored on this frame.
    pub fn take_message<T: Any>(&self, key: &str) -> Option<T> {
        let mut messages = self.messages.borrow_mut();
        let value = messages.remove(key)?;
        match value.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(value) => {
                messages.insert(key.to_string(), value);
                None
            }
        }
    }

    /// Message stored on this frame or the closest ancestor that has it.
    pub fn nearest_message<T: Any + Clone>(&self, key: &str) -> Option<T> {
        self.frames().find_map(|c| c.message(key))
    }

    /// Store `value` on the nearest frame, starting with this one, whose node
    /// satisfies `pred`. Returns false when no frame matched.
    pub fn put_message_on_first_enclosing<T: Any>(
        &self,
        pred: impl Fn(&Node) -> bool,
        key: impl Into<String>,
        value: T,
    ) -> bool {
        match self.first_enclosing_frame(pred) {
            Some(frame) => {
                frame.put_message(key, value);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<String> = self
            .path()
            .iter()
            .rev()
            .map(|n| n.kind().to_string())
            .collect();
        f.debug_struct("Cursor")
            .field("path", &path.join(" > "))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Space;

    fn token(kind: Kind, text: &str) -> Arc<Node> {
        Arc::new(Node::token(kind, text).with_prefix(Space::EMPTY))
    }

    fn tree() -> (Arc<Node>, Arc<Node>, Arc<Node>) {
        let name = token(Kind::Identifier, "A");
        let class = Arc::new(Node::branch(
            Kind::ClassDecl,
            vec![token(Kind::Keyword, "class"), Arc::clone(&name)],
        ));
        let file = Arc::new(Node::branch(Kind::SourceFile, vec![Arc::clone(&class)]));
        (file, class, name)
    }

    #[test]
    fn parent_chain_and_path() {
        let (file, class, name) = tree();
        let root = Cursor::root(Arc::clone(&file));
        let at_class = root.child(Arc::clone(&class));
        let at_name = at_class.child(Arc::clone(&name));

        assert_eq!(at_name.depth(), 2);
        assert_eq!(root.depth(), 0);
        assert!(Arc::ptr_eq(&at_name.parent_value().unwrap(), &class));
        assert!(Arc::ptr_eq(&at_name.root_frame().value(), &file));
        let kinds: Vec<_> = at_name.path().iter().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec![Kind::Identifier, Kind::ClassDecl, Kind::SourceFile]);
    }

    #[test]
    fn first_enclosing_includes_self() {
        let (file, class, name) = tree();
        let root = Cursor::root(file);
        let at_class = root.child(Arc::clone(&class));
        let at_name = at_class.child(name);

        let found = at_name.first_enclosing_kind(Kind::ClassDecl).unwrap();
        assert!(Arc::ptr_eq(&found, &class));
        assert!(at_name.first_enclosing_kind(Kind::Identifier).is_some());
        assert!(at_name.first_enclosing_kind(Kind::MethodDecl).is_none());
    }

    #[test]
    fn previous_sibling_reads_parent_children() {
        let (file, class, name) = tree();
        let root = Cursor::root(file);
        let at_class = root.child(Arc::clone(&class));
        let at_name = at_class.child(name);

        assert_eq!(
            at_name.previous_sibling().and_then(|n| n.text().map(str::to_string)),
            Some("class".to_string())
        );
        assert!(at_class.previous_sibling().is_none());
    }

    #[test]
    fn messages_flow_down_and_up() {
        let (file, class, name) = tree();
        let root = Cursor::root(file);
        root.put_message("style", 4usize);
        let at_class = root.child(class);
        let at_name = at_class.child(name);

        assert_eq!(at_name.nearest_message::<usize>("style"), Some(4));
        assert_eq!(at_name.message::<usize>("style"), None);
        assert_eq!(at_name.nearest_message::<String>("style"), None);

        assert!(at_name.put_message_on_first_enclosing(
            |n| n.kind() == Kind::ClassDecl,
            "seen",
            true
        ));
        assert_eq!(at_class.message::<bool>("seen"), Some(true));
        assert!(!at_name.put_message_on_first_enclosing(|n| n.kind() == Kind::Block, "x", 1));
    }

    #[test]
    fn last_write_wins_and_take_removes() {
        let (file, _, _) = tree();
        let root = Cursor::root(file);
        root.put_message("n", 1);
        root.put_message("n", 2);
        assert_eq!(root.message::<i32>("n"), Some(2));
        assert_eq!(root.take_message::<String>("n"), None);
        assert_eq!(root.take_message::<i32>("n"), Some(2));
        assert_eq!(root.message::<i32>("n"), None);
    }
}
