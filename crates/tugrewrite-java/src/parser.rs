// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Java front end.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use tugrewrite_lst::tree::{hoist_prefixes, seal, Node};
use tugrewrite_lst::{LanguageParser, ParseError, ParseResult};

use crate::grammar::java;

/// Lossless parser for `.java` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaParser;

impl JavaParser {
    /// Parse `text` without a path.
    pub fn parse_source(&self, text: &str) -> ParseResult<Arc<Node>> {
        self.parse(text, None)
    }
}

impl LanguageParser for JavaParser {
    fn language(&self) -> &str {
        "java"
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.extension().is_some_and(|e| e == "java")
    }

    fn parse(&self, text: &str, path: Option<&Path>) -> ParseResult<Arc<Node>> {
        let with_path = |e: ParseError| match path {
            Some(path) => e.with_path(path),
            None => e,
        };

        let root = java::compilation_unit(text).map_err(|e| {
            with_path(ParseError::at(
                text,
                e.location.offset,
                format!("expected {}", e.expected),
            ))
        })?;
        let tree = seal(&hoist_prefixes(&root), Arc::from(text)).map_err(with_path)?;

        debug!(
            path = %path.map(|p| p.display().to_string()).unwrap_or_default(),
            bytes = text.len(),
            "parsed java source"
        );
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugrewrite_lst::printer::print;
    use tugrewrite_lst::tree::Kind;

    #[test]
    fn claims_java_files_only() {
        assert!(JavaParser.can_parse(Path::new("src/A.java")));
        assert!(!JavaParser.can_parse(Path::new("A.kt")));
        assert!(!JavaParser.can_parse(Path::new("java")));
    }

    #[test]
    fn header_comment_belongs_to_the_file() {
        let tree = JavaParser
            .parse_source("// header\npackage a;\n\nclass A {}\n")
            .unwrap();
        let prefix = tree.prefix().unwrap();
        assert_eq!(prefix.comments().len(), 1);
        assert_eq!(prefix.comments()[0].text(), "// header");

        let package = &tree.children()[0];
        assert!(package.is(Kind::Package));
        assert_eq!(package.prefix().map(|p| p.is_empty()), Some(true));
    }

    #[test]
    fn declarations_own_their_leading_formatting() {
        let text = "class A {\n    /** doc */\n    int x;\n}";
        let tree = JavaParser.parse_source(text).unwrap();
        let field = tree.find(|n| n.is(Kind::VariableDecl)).unwrap();
        let prefix = field.prefix().unwrap();
        assert_eq!(prefix.whitespace(), "\n    ");
        assert_eq!(prefix.comments()[0].text(), "/** doc */");
        assert_eq!(prefix.indent(), Some("    "));
        assert_eq!(print(&tree).unwrap(), text);
    }

    #[test]
    fn every_node_has_an_origin() {
        let tree = JavaParser
            .parse_source("import a.b.*;\nclass A { void f() { g(1, \"x\"); } }")
            .unwrap();
        assert!(tree.preorder().iter().all(|n| n.origin().is_some()));
    }

    #[test]
    fn errors_carry_position_and_path() {
        let err = JavaParser
            .parse("class A {\n  int = ;\n}", Some(Path::new("A.java")))
            .unwrap_err();
        assert_eq!(err.path.as_deref(), Some("A.java"));
        assert_eq!(err.position.line, 2);
        assert!(err.message.starts_with("expected "));
    }
}
