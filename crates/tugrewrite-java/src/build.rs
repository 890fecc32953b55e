// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node builders for Java trees.
//!
//! The public builders make *synthesized* nodes: they have no prefix, so the
//! printer lays them out with its default formatting wherever a visitor
//! puts them. The parser uses the crate-private helpers, which record the
//! exact trivia in front of every token.

use std::sync::Arc;

use tugrewrite_lst::tree::{CustomKind, Kind, Node, Space};

/// `default <value>` after an annotation method's parameter list.
pub const DEFAULT_VALUE: CustomKind =
    CustomKind::new("java", "default_value").with_default_prefix(" ");

pub(crate) const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "native",
    "synchronized",
    "transient",
    "volatile",
    "strictfp",
    "default",
];

pub(crate) const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

const RESERVED: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "void",
    "volatile",
    "while",
];

/// Words that can never be identifiers.
pub fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

/// Kind of a bare word inside a statement or expression.
pub(crate) fn word_kind(word: &str) -> Kind {
    match word {
        "true" | "false" | "null" => Kind::Literal,
        w if is_reserved(w) => Kind::Keyword,
        _ => Kind::Identifier,
    }
}

pub(crate) fn is_bracket(text: &str) -> bool {
    matches!(text, "(" | ")" | "[" | "]" | "{" | "}")
}

/// A parsed token with the trivia that preceded it.
pub(crate) fn token(kind: Kind, prefix: Space, text: &str) -> Arc<Node> {
    Arc::new(Node::token(kind, text).with_prefix(prefix))
}

/// Ordered children of a node under construction.
#[derive(Debug, Default)]
pub(crate) struct Children(Vec<Arc<Node>>);

impl Children {
    pub(crate) fn new() -> Self {
        Children::default()
    }

    pub(crate) fn one(mut self, node: Arc<Node>) -> Self {
        self.0.push(node);
        self
    }

    pub(crate) fn opt(mut self, node: Option<Arc<Node>>) -> Self {
        self.0.extend(node);
        self
    }

    pub(crate) fn all(mut self, nodes: impl IntoIterator<Item = Arc<Node>>) -> Self {
        self.0.extend(nodes);
        self
    }

    /// A parsed branch. Its own prefix is empty until prefixes are hoisted.
    pub(crate) fn build(self, kind: Kind) -> Arc<Node> {
        Arc::new(Node::branch(kind, self.0).with_prefix(Space::EMPTY))
    }

    pub(crate) fn into_vec(self) -> Vec<Arc<Node>> {
        self.0
    }
}

// ============================================================================
// Synthesized nodes
// ============================================================================

pub fn identifier(name: &str) -> Arc<Node> {
    Arc::new(Node::token(Kind::Identifier, name))
}

pub fn keyword(word: &str) -> Arc<Node> {
    Arc::new(Node::token(Kind::Keyword, word))
}

pub fn punct(text: &str) -> Arc<Node> {
    Arc::new(Node::token(Kind::Punct, text))
}

/// `a.b.c` as a qualified name. A trailing `*` segment is kept as
/// punctuation, as in on-demand imports.
pub fn qualified_name(dotted: &str) -> Arc<Node> {
    let mut children = Vec::new();
    for (i, segment) in dotted.split('.').enumerate() {
        if i > 0 {
            children.push(punct("."));
        }
        children.push(match segment {
            "*" => punct("*"),
            name => identifier(name),
        });
    }
    Arc::new(Node::branch(Kind::QualifiedName, children))
}

/// `import [static] name;`
pub fn import(name: &str, is_static: bool) -> Arc<Node> {
    let mut children = vec![keyword("import")];
    if is_static {
        children.push(keyword("static"));
    }
    children.push(qualified_name(name));
    children.push(punct(";"));
    Arc::new(Node::branch(Kind::Import, children))
}

/// `@Name` with no arguments.
pub fn annotation(name: &str) -> Arc<Node> {
    Arc::new(Node::branch(
        Kind::Annotation,
        vec![punct("@"), qualified_name(name)],
    ))
}
