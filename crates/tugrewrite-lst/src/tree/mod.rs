// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The lossless tree node model.
//!
//! A [`Node`] is immutable. Every change produces a new node through one of
//! the `with_*` methods, which keep the node's [`NodeId`] and drop its
//! [`Origin`]. Unchanged children are shared through `Arc`, so
//! `Arc::ptr_eq` is a sufficient "this subtree was not touched" test.
//!
//! Nodes that came out of a parser carry an `Origin`: the shared source text
//! and the byte span the node covers, prefix included. The printer emits
//! that span verbatim. A node without an origin was synthesized or changed
//! and is printed structurally.

mod kind;
mod markers;
mod space;

pub use kind::{CustomKind, Kind};
pub use markers::{Marker, Markers, Severity};
pub use space::{Comment, CommentStyle, Space, TriviaError};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tugrewrite_core::text::LineCol;
use tugrewrite_core::Span;

use crate::error::ParseError;

// ============================================================================
// Node identity
// ============================================================================

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique node identity, independent of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Allocate an id no other node in this process has.
    pub fn fresh() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

// ============================================================================
// Origin
// ============================================================================

/// Where an unchanged parsed node came from.
#[derive(Clone)]
pub struct Origin {
    source: Arc<str>,
    span: Span,
    start: LineCol,
}

impl Origin {
    pub fn new(source: Arc<str>, span: Span, start: LineCol) -> Self {
        Origin {
            source,
            span,
            start,
        }
    }

    /// The exact source text of the node, prefix and suffix included.
    pub fn text(&self) -> &str {
        self.source.get(self.span.range()).unwrap_or("")
    }

    /// Byte span of the node, prefix and suffix included.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Line and column of the node's first byte after its prefix.
    pub fn start(&self) -> LineCol {
        self.start
    }

    pub fn source(&self) -> &Arc<str> {
        &self.source
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Origin")
            .field("span", &self.span)
            .field("start", &self.start)
            .finish()
    }
}

// ============================================================================
// Node
// ============================================================================

/// An immutable tree node.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    kind: Kind,
    prefix: Option<Space>,
    suffix: Space,
    text: Option<Arc<str>>,
    children: Vec<Arc<Node>>,
    markers: Markers,
    origin: Option<Origin>,
}

impl Node {
    /// A new token. Its prefix is left to the printer's defaults.
    pub fn token(kind: Kind, text: impl Into<Arc<str>>) -> Node {
        Node {
            id: NodeId::fresh(),
            kind,
            prefix: None,
            suffix: Space::EMPTY,
            text: Some(text.into()),
            children: Vec::new(),
            markers: Markers::EMPTY,
            origin: None,
        }
    }

    /// A new interior node. Its prefix is left to the printer's defaults.
    pub fn branch(kind: Kind, children: Vec<Arc<Node>>) -> Node {
        Node {
            id: NodeId::fresh(),
            kind,
            prefix: None,
            suffix: Space::EMPTY,
            text: None,
            children,
            markers: Markers::EMPTY,
            origin: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is(&self, kind: Kind) -> bool {
        self.kind == kind
    }

    /// Leading formatting, or `None` for a synthesized node that takes its
    /// prefix from the printer's defaults.
    pub fn prefix(&self) -> Option<&Space> {
        self.prefix.as_ref()
    }

    pub fn suffix(&self) -> &Space {
        &self.suffix
    }

    /// Token text.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Arc<Node>] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Arc<Node>> {
        self.children.get(index)
    }

    pub fn children_of_kind(&self, kind: Kind) -> impl Iterator<Item = &Arc<Node>> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Original source location, if this node is unchanged since parsing.
    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    /// Concatenated token text of the subtree with all formatting removed,
    /// e.g. `java.util.List` for a qualified name.
    pub fn tokens_text(&self) -> String {
        let mut out = String::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_tokens(out);
        }
    }

    // ------------------------------------------------------------------------
    // Functional updates: same id, origin dropped
    // ------------------------------------------------------------------------

    fn changed(&self) -> Node {
        Node {
            origin: None,
            ..self.clone()
        }
    }

    pub fn with_text(&self, text: impl Into<Arc<str>>) -> Node {
        Node {
            text: Some(text.into()),
            ..self.changed()
        }
    }

    pub fn with_prefix(&self, prefix: Space) -> Node {
        Node {
            prefix: Some(prefix),
            ..self.changed()
        }
    }

    /// Hand the prefix back to the printer's defaults.
    pub fn with_default_prefix(&self) -> Node {
        Node {
            prefix: None,
            ..self.changed()
        }
    }

    pub fn with_suffix(&self, suffix: Space) -> Node {
        Node {
            suffix,
            ..self.changed()
        }
    }

    pub fn with_children(&self, children: Vec<Arc<Node>>) -> Node {
        Node {
            children,
            ..self.changed()
        }
    }

    pub fn with_markers(&self, markers: Markers) -> Node {
        Node {
            markers,
            ..self.changed()
        }
    }

    pub fn with_marker(&self, marker: Marker) -> Node {
        self.with_markers(self.markers.with(marker))
    }

    /// A copy that is a distinct element: new id, same content.
    pub fn with_fresh_id(&self) -> Node {
        Node {
            id: NodeId::fresh(),
            ..self.clone()
        }
    }

    // ------------------------------------------------------------------------
    // Content equality
    // ------------------------------------------------------------------------

    /// Structural equality ignoring ids and origins.
    pub fn content_eq(&self, other: &Node) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.kind == other.kind
            && self.text == other.text
            && self.prefix == other.prefix
            && self.suffix == other.suffix
            && self.markers == other.markers
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| Arc::ptr_eq(a, b) || a.content_eq(b))
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Every node of the subtree in pre-order, `self` first.
    pub fn preorder(self: &Arc<Self>) -> Vec<Arc<Node>> {
        let mut out = Vec::new();
        let mut stack = vec![Arc::clone(self)];
        while let Some(node) = stack.pop() {
            stack.extend(node.children.iter().rev().cloned());
            out.push(node);
        }
        out
    }

    /// First node of the subtree, in pre-order, matching `pred`.
    pub fn find(self: &Arc<Self>, pred: impl Fn(&Node) -> bool) -> Option<Arc<Node>> {
        self.find_dyn(&pred)
    }

    fn find_dyn(self: &Arc<Self>, pred: &dyn Fn(&Node) -> bool) -> Option<Arc<Node>> {
        if pred(self) {
            return Some(Arc::clone(self));
        }
        self.children.iter().find_map(|c| c.find_dyn(pred))
    }

    pub fn find_by_id(self: &Arc<Self>, id: NodeId) -> Option<Arc<Node>> {
        self.find(|n| n.id == id)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.content_eq(other)
    }
}

impl Eq for Node {}

// ============================================================================
// Parser support
// ============================================================================

/// Move each subtree's leading formatting from its first token up to the
/// outermost node that starts at the same position.
///
/// Parsers attach trivia to tokens; declarations own their prefix so that
/// removing, moving or re-spacing a declaration carries its comments along.
pub fn hoist_prefixes(node: &Node) -> Node {
    if node.children.is_empty() {
        return node.clone();
    }
    let mut children: Vec<Arc<Node>> = node
        .children
        .iter()
        .map(|c| Arc::new(hoist_prefixes(c)))
        .collect();

    let own_is_empty = match &node.prefix {
        Some(prefix) => prefix.is_empty(),
        None => true,
    };
    let first_prefix = children[0].prefix.clone();
    match first_prefix {
        Some(prefix) if own_is_empty && !prefix.is_empty() => {
            children[0] = Arc::new(children[0].with_prefix(Space::EMPTY));
            Node {
                prefix: Some(prefix),
                children,
                ..node.changed()
            }
        }
        _ => node.with_children(children),
    }
}

/// Attach origins to a freshly parsed tree and prove it reprints `source`
/// byte for byte.
///
/// Every node must carry an explicit prefix. Fails with the offset of the
/// first byte the tree does not account for.
pub fn seal(root: &Node, source: Arc<str>) -> Result<Arc<Node>, ParseError> {
    let mut sealer = Sealer {
        source: Arc::clone(&source),
        offset: 0,
        position: LineCol::START,
    };
    let sealed = sealer.seal(root)?;
    if sealer.offset != source.len() {
        return Err(sealer.error("tree does not cover the end of the input"));
    }
    Ok(sealed)
}

struct Sealer {
    source: Arc<str>,
    offset: usize,
    position: LineCol,
}

impl Sealer {
    fn seal(&mut self, node: &Node) -> Result<Arc<Node>, ParseError> {
        let start = self.offset;
        let prefix = node
            .prefix
            .as_ref()
            .ok_or_else(|| self.error(format!("parsed {} node has no prefix", node.kind)))?;
        self.expect_space(prefix)?;
        let token_start = self.position;
        if let Some(text) = &node.text {
            self.expect(text)?;
        }
        let children = node
            .children
            .iter()
            .map(|c| self.seal(c))
            .collect::<Result<Vec<_>, _>>()?;
        self.expect_space(&node.suffix)?;

        Ok(Arc::new(Node {
            children,
            origin: Some(Origin::new(
                Arc::clone(&self.source),
                Span::from_offsets(start, self.offset),
                token_start,
            )),
            ..node.clone()
        }))
    }

    fn expect_space(&mut self, space: &Space) -> Result<(), ParseError> {
        self.expect(space.whitespace())?;
        for comment in space.comments() {
            self.expect(comment.text())?;
            self.expect(comment.suffix())?;
        }
        Ok(())
    }

    fn expect(&mut self, piece: &str) -> Result<(), ParseError> {
        let rest = self.source.get(self.offset..).unwrap_or("");
        if !rest.starts_with(piece) {
            let shown: String = piece.chars().take(24).collect();
            return Err(self.error(format!("tree text {:?} does not match the input", shown)));
        }
        self.position.advance(piece);
        self.offset += piece.len();
        Ok(())
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.offset, self.position)
    }
}
