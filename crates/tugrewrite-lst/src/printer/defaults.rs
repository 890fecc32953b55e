// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Default formatting for synthesized nodes.
//!
//! A node without an explicit prefix gets one from this table, keyed by the
//! node's kind and where it sits:
//!
//! | Position                                   | Prefix                         |
//! |--------------------------------------------|--------------------------------|
//! | root, or first child of its parent         | none                           |
//! | inside a qualified name                    | none                           |
//! | top level: package                         | newline                        |
//! | top level: import after import             | newline                        |
//! | top level: anything else                   | blank line                     |
//! | block member: class or method declaration  | blank line + member indent     |
//! | block member: anything else                | newline + member indent        |
//! | block: closing `}`                         | newline + block indent         |
//! | `,` `;` `)` `]` `>` `.` `(` `[` `...`      | none                           |
//! | `<`, type parameters after a name          | none                           |
//! | parameters, type arguments                 | none                           |
//! | group after a name or qualified name       | none                           |
//! | after `(` `[` `<` `.` `@`                  | none                           |
//! | anything else                              | one space                      |
//! | custom kinds                               | their declared default prefix  |
//!
//! Block indent is the indentation of the line a block's `{` is printed on.
//! Member indent copies the nearest earlier member that has an explicit
//! prefix, or else adds four spaces to the block indent.

use crate::error::PrintError;
use crate::tree::{Kind, Node};

const INDENT: &str = "    ";

/// Prefix for `node`, the `index`-th child of `parent`.
pub(crate) fn prefix(
    node: &Node,
    parent: Option<&Node>,
    index: usize,
    block_indent: &str,
) -> Result<String, PrintError> {
    if let Kind::Custom(custom) = node.kind() {
        let default = custom.default_prefix.ok_or_else(|| PrintError::MissingFormatting {
            kind: node.kind().to_string(),
            node: node.id(),
        })?;
        if parent.is_none() || index == 0 {
            return Ok(String::new());
        }
        return Ok(default.to_string());
    }

    let Some(parent) = parent else {
        return Ok(String::new());
    };
    if index == 0 {
        return Ok(String::new());
    }
    let previous = parent.child(index - 1).map(|p| p.as_ref());

    let prefix = match parent.kind() {
        Kind::QualifiedName => String::new(),
        Kind::SourceFile => top_level(node, previous),
        Kind::Block => block_member(node, parent, index, block_indent),
        _ => inline(node, previous).to_string(),
    };
    Ok(prefix)
}

fn top_level(node: &Node, previous: Option<&Node>) -> String {
    match node.kind() {
        Kind::Package => "\n".to_string(),
        Kind::Import if previous.is_some_and(|p| p.is(Kind::Import)) => "\n".to_string(),
        Kind::Eof => String::new(),
        _ => "\n\n".to_string(),
    }
}

fn block_member(node: &Node, block: &Node, index: usize, block_indent: &str) -> String {
    let previous = &block.children()[index - 1];
    let after_open = is_punct(previous, "{");

    if is_punct(node, "}") {
        return if after_open {
            String::new()
        } else {
            format!("\n{}", block_indent)
        };
    }
    if node.is(Kind::Punct) {
        return inline(node, Some(previous)).to_string();
    }

    let indent = block.children()[..index]
        .iter()
        .rev()
        .filter(|c| !c.is(Kind::Punct))
        .find_map(|c| c.prefix().and_then(|p| p.indent()).map(str::to_string))
        .unwrap_or_else(|| format!("{}{}", block_indent, INDENT));

    let blank_line = matches!(node.kind(), Kind::ClassDecl | Kind::MethodDecl) && !after_open;
    let newlines = if blank_line { "\n\n" } else { "\n" };
    format!("{}{}", newlines, indent)
}

fn inline(node: &Node, previous: Option<&Node>) -> &'static str {
    let after_name = previous.is_some_and(|p| {
        matches!(
            p.kind(),
            Kind::Identifier | Kind::QualifiedName | Kind::TypeArguments
        )
    });

    match node.kind() {
        Kind::Punct => match node.text().unwrap_or_default() {
            "," | ";" | ")" | "]" | ">" | "." | "(" | "[" | "..." => "",
            "<" if after_name => "",
            _ => after(previous),
        },
        Kind::Parameters | Kind::TypeArguments => "",
        Kind::TypeParameters | Kind::Group if after_name => "",
        _ => after(previous),
    }
}

/// No space directly after an opening bracket, a dot or an `@`.
fn after(previous: Option<&Node>) -> &'static str {
    match previous {
        Some(p) if p.is(Kind::Punct) => match p.text().unwrap_or_default() {
            "(" | "[" | "<" | "." | "@" => "",
            _ => " ",
        },
        _ => " ",
    }
}

pub(super) fn is_punct(node: &Node, text: &str) -> bool {
    node.is(Kind::Punct) && node.text() == Some(text)
}
