// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Format-preserving printer.
//!
//! A subtree that still carries its [`Origin`](crate::tree::Origin) is
//! emitted as the exact source bytes it was parsed from. Everything else is
//! printed structurally: prefix, token text, children, suffix. A synthesized
//! node without a prefix takes one from the [`defaults`] table, so inserted
//! code lines up with its neighbours.
//!
//! Printing never alters a tree. An untouched parse tree therefore prints
//! back to its input byte for byte.
//!
//! [`resolve_formatting`] returns the layout the printer chose as a tree:
//! every default prefix made explicit, leading formatting hoisted the way
//! parsers attach it. Reparsing printed text gives a tree content-equal to
//! the resolved one.

mod defaults;

use std::sync::Arc;

use tugrewrite_core::text::{last_line_indent, trim_indent};

use crate::error::PrintError;
use crate::tree::{hoist_prefixes, Kind, Marker, Node, Space};

/// Printer switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrintOptions {
    /// Emit `/*~~>*/` before nodes carrying a search result marker.
    pub render_markers: bool,
}

impl PrintOptions {
    pub fn with_markers() -> Self {
        PrintOptions {
            render_markers: true,
        }
    }
}

/// Print `node` to source text.
pub fn print(node: &Node) -> Result<String, PrintError> {
    print_with(node, PrintOptions::default())
}

/// Print `node` with explicit options.
pub fn print_with(node: &Node, options: PrintOptions) -> Result<String, PrintError> {
    let mut printer = Printer::new(options, false);
    printer.node(node, None, 0)?;
    Ok(printer.out)
}

/// Print `node` with the shared leading indentation and surrounding blank
/// lines removed. Handy when printing a nested subtree on its own.
pub fn print_trimmed(node: &Node) -> Result<String, PrintError> {
    Ok(trim_indent(&print(node)?))
}

/// `node` as the printer lays it out, with every prefix explicit.
pub fn resolve_formatting(node: &Node) -> Result<Node, PrintError> {
    let mut printer = Printer::new(PrintOptions::default(), true);
    let resolved = printer.node(node, None, 0)?;
    Ok(hoist_prefixes(resolved.as_ref().unwrap_or(node)))
}

struct Printer {
    out: String,
    options: PrintOptions,
    /// Indent of the line each enclosing structurally printed block opened on.
    block_indents: Vec<String>,
    /// Rebuild each printed node with the prefix it was printed with.
    resolve: bool,
}

impl Printer {
    fn new(options: PrintOptions, resolve: bool) -> Self {
        Printer {
            out: String::new(),
            options,
            block_indents: Vec::new(),
            resolve,
        }
    }

    /// Print `node`. Returns its resolved form when resolving.
    fn node(
        &mut self,
        node: &Node,
        parent: Option<&Node>,
        index: usize,
    ) -> Result<Option<Node>, PrintError> {
        if let Some(origin) = node.origin() {
            self.out.push_str(origin.text());
            return Ok(self.resolve.then(|| node.clone()));
        }

        let default_prefix = match node.prefix() {
            Some(prefix) => {
                prefix.print_to(&mut self.out);
                None
            }
            None => {
                let block_indent = self.block_indents.last().map_or("", String::as_str);
                let prefix = defaults::prefix(node, parent, index, block_indent)?;
                self.out.push_str(&prefix);
                Some(prefix)
            }
        };

        if self.options.render_markers {
            self.markers(node);
        }

        match node.text() {
            Some(text) => self.out.push_str(text),
            None if node.children().is_empty() && node.kind().is_token() => {
                return Err(PrintError::MissingText {
                    kind: node.kind().to_string(),
                    node: node.id(),
                });
            }
            None => {}
        }

        let block = node.is(Kind::Block);
        if block {
            self.block_indents
                .push(last_line_indent(&self.out).to_string());
        }
        let mut children = Vec::new();
        for (i, child) in node.children().iter().enumerate() {
            let moved = if block { self.closing_brace(node, i) } else { None };
            let child = moved.as_ref().unwrap_or(&**child);
            if let Some(resolved) = self.node(child, Some(node), i)? {
                children.push(Arc::new(resolved));
            }
        }
        if block {
            self.block_indents.pop();
        }

        node.suffix().print_to(&mut self.out);

        if !self.resolve {
            return Ok(None);
        }
        let resolved = node.with_children(children);
        Ok(Some(match default_prefix {
            Some(prefix) => resolved.with_prefix(Space::new(prefix)),
            None => resolved,
        }))
    }

    /// A `}` that shares a line with the member inserted just before it,
    /// moved onto a line of its own at the block's indent.
    fn closing_brace(&self, block: &Node, index: usize) -> Option<Node> {
        let close = block.child(index)?;
        let previous = block.child(index.checked_sub(1)?)?;
        if !defaults::is_punct(close, "}")
            || previous.is(Kind::Punct)
            || previous.prefix().is_some()
        {
            return None;
        }
        let prefix = close.prefix()?;
        if prefix.newlines() > 0 || !prefix.comments().is_empty() {
            return None;
        }
        let indent = self.block_indents.last().map_or("", String::as_str);
        Some(close.with_prefix(Space::new(format!("\n{}", indent))))
    }

    fn markers(&mut self, node: &Node) {
        for marker in node.markers().iter() {
            if let Marker::SearchResult { description } = marker {
                match description {
                    Some(description) => {
                        self.out.push_str("/*~~(");
                        self.out.push_str(description);
                        self.out.push_str(")~~>*/");
                    }
                    None => self.out.push_str("/*~~>*/"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::seal;

    fn leaf(kind: Kind, text: &str, prefix: &str) -> Arc<Node> {
        Arc::new(Node::token(kind, text).with_prefix(Space::new(prefix)))
    }

    fn parsed_class() -> Arc<Node> {
        let source: Arc<str> = Arc::from("class  A {\n  int x;\n}");
        let field = Node::branch(
            Kind::VariableDecl,
            vec![
                leaf(Kind::Keyword, "int", ""),
                leaf(Kind::Identifier, "x", " "),
                leaf(Kind::Punct, ";", ""),
            ],
        )
        .with_prefix(Space::new("\n  "));
        let block = Node::branch(
            Kind::Block,
            vec![
                leaf(Kind::Punct, "{", ""),
                Arc::new(field),
                leaf(Kind::Punct, "}", "\n"),
            ],
        )
        .with_prefix(Space::new(" "));
        let class = Node::branch(
            Kind::ClassDecl,
            vec![
                leaf(Kind::Keyword, "class", ""),
                leaf(Kind::Identifier, "A", "  "),
                Arc::new(block),
            ],
        )
        .with_prefix(Space::EMPTY);
        seal(&class, source).unwrap()
    }

    #[test]
    fn unchanged_tree_prints_verbatim() {
        let class = parsed_class();
        assert_eq!(print(&class).unwrap(), "class  A {\n  int x;\n}");
    }

    #[test]
    fn changed_node_keeps_neighbours_verbatim() {
        let class = parsed_class();
        let name = class.children()[1].with_text("Renamed");
        let mut children = class.children().to_vec();
        children[1] = Arc::new(name);
        let changed = class.with_children(children);
        assert_eq!(print(&changed).unwrap(), "class  Renamed {\n  int x;\n}");
    }

    #[test]
    fn synthesized_member_uses_sibling_indent() {
        let class = parsed_class();
        let block = &class.children()[2];
        let method = Node::branch(
            Kind::MethodDecl,
            vec![
                Arc::new(Node::token(Kind::Keyword, "void")),
                Arc::new(Node::token(Kind::Identifier, "run")),
                Arc::new(Node::branch(
                    Kind::Parameters,
                    vec![
                        Arc::new(Node::token(Kind::Punct, "(")),
                        Arc::new(Node::token(Kind::Punct, ")")),
                    ],
                )),
                Arc::new(Node::token(Kind::Punct, ";")),
            ],
        );
        let mut members = block.children().to_vec();
        members.insert(2, Arc::new(method));
        let mut children = class.children().to_vec();
        children[2] = Arc::new(block.with_children(members));
        let changed = class.with_children(children);
        assert_eq!(
            print(&changed).unwrap(),
            "class  A {\n  int x;\n\n  void run();\n}"
        );
    }

    #[test]
    fn synthesized_block_indents_from_its_line() {
        let method = Node::branch(
            Kind::MethodDecl,
            vec![
                Arc::new(Node::token(Kind::Keyword, "void")),
                Arc::new(Node::token(Kind::Identifier, "run")),
                Arc::new(Node::branch(
                    Kind::Parameters,
                    vec![
                        Arc::new(Node::token(Kind::Punct, "(")),
                        Arc::new(Node::token(Kind::Punct, ")")),
                    ],
                )),
                Arc::new(Node::branch(
                    Kind::Block,
                    vec![
                        Arc::new(Node::token(Kind::Punct, "{")),
                        Arc::new(Node::branch(
                            Kind::Statement,
                            vec![
                                Arc::new(Node::token(Kind::Keyword, "return")),
                                Arc::new(Node::token(Kind::Punct, ";")),
                            ],
                        )),
                        Arc::new(Node::token(Kind::Punct, "}")),
                    ],
                )),
            ],
        )
        .with_prefix(Space::new("  "));
        assert_eq!(
            print(&method).unwrap(),
            "  void run() {\n      return;\n  }"
        );
    }

    fn parsed_empty_class() -> Arc<Node> {
        let source: Arc<str> = Arc::from("class A {}");
        let block = Node::branch(
            Kind::Block,
            vec![leaf(Kind::Punct, "{", ""), leaf(Kind::Punct, "}", "")],
        )
        .with_prefix(Space::new(" "));
        let class = Node::branch(
            Kind::ClassDecl,
            vec![
                leaf(Kind::Keyword, "class", ""),
                leaf(Kind::Identifier, "A", " "),
                Arc::new(block),
            ],
        )
        .with_prefix(Space::EMPTY);
        seal(&class, source).unwrap()
    }

    /// `class` with `member` inserted just before the closing brace.
    fn insert_member(class: &Arc<Node>, member: Node) -> Node {
        let block = &class.children()[2];
        let mut members = block.children().to_vec();
        members.insert(members.len() - 1, Arc::new(member));
        let mut children = class.children().to_vec();
        children[2] = Arc::new(block.with_children(members));
        class.with_children(children)
    }

    fn field(name: &str) -> Node {
        Node::branch(
            Kind::VariableDecl,
            vec![
                Arc::new(Node::token(Kind::Keyword, "int")),
                Arc::new(Node::token(Kind::Identifier, name)),
                Arc::new(Node::token(Kind::Punct, ";")),
            ],
        )
    }

    #[test]
    fn closing_brace_moves_below_a_synthesized_member() {
        let changed = insert_member(&parsed_empty_class(), field("x"));
        assert_eq!(print(&changed).unwrap(), "class A {\n    int x;\n}");
    }

    #[test]
    fn closing_brace_stays_after_a_member_with_explicit_formatting() {
        let member = field("x").with_prefix(Space::new(" "));
        let changed = insert_member(&parsed_empty_class(), member);
        assert_eq!(print(&changed).unwrap(), "class A { int x;}");
    }

    #[test]
    fn resolved_formatting_matches_the_printed_layout() {
        let class = parsed_class();
        assert!(resolve_formatting(&class).unwrap().content_eq(&class));

        let changed = insert_member(&parsed_empty_class(), field("x"));
        let resolved = Arc::new(resolve_formatting(&changed).unwrap());
        assert!(resolved.preorder().iter().all(|n| n.prefix().is_some()));

        let block = &resolved.children()[2];
        let member = &block.children()[1];
        assert_eq!(member.prefix().map(Space::whitespace), Some("\n    "));
        assert_eq!(member.children()[1].prefix().map(Space::whitespace), Some(" "));
        assert_eq!(block.children()[2].prefix().map(Space::whitespace), Some("\n"));
        assert_eq!(resolved.id(), changed.id());
    }

    #[test]
    fn markers_render_only_when_asked() {
        let node = Node::token(Kind::Identifier, "foo")
            .with_prefix(Space::EMPTY)
            .with_marker(Marker::SearchResult { description: None });
        assert_eq!(print(&node).unwrap(), "foo");
        assert_eq!(
            print_with(&node, PrintOptions::with_markers()).unwrap(),
            "/*~~>*/foo"
        );

        let described = Node::token(Kind::Identifier, "foo")
            .with_prefix(Space::new(" "))
            .with_marker(Marker::SearchResult {
                description: Some("found".to_string()),
            });
        assert_eq!(
            print_with(&described, PrintOptions::with_markers()).unwrap(),
            " /*~~(found)~~>*/foo"
        );
    }

    #[test]
    fn token_without_text_is_an_invariant_violation() {
        let broken = Node::branch(Kind::Identifier, vec![]);
        let err = print(&broken).unwrap_err();
        assert!(matches!(err, PrintError::MissingText { .. }));
    }

    #[test]
    fn trimmed_print_removes_shared_indent() {
        let class = parsed_class();
        let field = class.find(|n| n.is(Kind::VariableDecl)).unwrap();
        assert_eq!(print(&field).unwrap(), "\n  int x;");
        assert_eq!(print_trimmed(&field).unwrap(), "int x;");
    }
}
