// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use tugrewrite_lst::cursor::Cursor;
use tugrewrite_lst::recipe::VisitorParams;
use tugrewrite_lst::tree::{Kind, Node};
use tugrewrite_lst::visitors::is_identifier;
use tugrewrite_lst::{RecipeResult, Visit, VisitOutcome, Visitor};

use crate::build;

/// Adds an import unless the file already has one that covers the type.
///
/// The new import is synthesized, so the printer lays it out: it goes after
/// the last import, or after the package declaration, or at the top of the
/// file. Types in `java.lang` and in the file's own package are never
/// imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddImport {
    type_name: String,
    is_static: bool,
}

impl AddImport {
    pub const NAME: &'static str = "add-import";

    pub fn new(type_name: impl Into<String>) -> Self {
        AddImport {
            type_name: type_name.into(),
            is_static: false,
        }
    }

    /// A static import of a member, e.g. `org.junit.Assert.assertEquals`.
    pub fn new_static(member: impl Into<String>) -> Self {
        AddImport {
            type_name: member.into(),
            is_static: true,
        }
    }

    /// Parameters: `typeName` (required, fully qualified), `static`
    /// (optional).
    pub fn from_params(params: &VisitorParams) -> RecipeResult<Self> {
        params.expect_only(&["typeName", "static"])?;
        let type_name = params.required_str("typeName")?;
        let segments: Vec<&str> = type_name.split('.').collect();
        let valid = segments.len() > 1
            && segments.iter().enumerate().all(|(i, s)| {
                is_identifier(s) || (*s == "*" && i == segments.len() - 1)
            });
        if !valid {
            return Err(params.invalid(
                "typeName",
                format!("`{}` is not a qualified name", type_name),
            ));
        }
        Ok(match params.optional_bool("static")? {
            Some(true) => AddImport::new_static(type_name),
            _ => AddImport::new(type_name),
        })
    }

    /// Everything before the last segment.
    fn owner(&self) -> &str {
        self.type_name
            .rsplit_once('.')
            .map_or("", |(owner, _)| owner)
    }

    fn covered_by(&self, import: &Node) -> bool {
        let is_static = import
            .children()
            .iter()
            .any(|c| c.is(Kind::Keyword) && c.text() == Some("static"));
        if is_static != self.is_static {
            return false;
        }
        let Some(name) = import.children_of_kind(Kind::QualifiedName).next() else {
            return false;
        };
        let name = name.tokens_text();
        name == self.type_name || name.strip_suffix(".*") == Some(self.owner())
    }

    fn implicitly_visible(&self, file: &Node) -> bool {
        if self.is_static {
            return false;
        }
        let package = file
            .children_of_kind(Kind::Package)
            .next()
            .and_then(|p| p.children_of_kind(Kind::QualifiedName).next())
            .map(|name| name.tokens_text());
        self.owner() == "java.lang" || package.as_deref() == Some(self.owner())
    }
}

impl Visitor for AddImport {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn visit_source_file(&self, node: &Arc<Node>, _cursor: &Cursor<'_>) -> VisitOutcome {
        if self.implicitly_visible(node)
            || node
                .children_of_kind(Kind::Import)
                .any(|i| self.covered_by(i))
        {
            return Ok(Visit::skip(node));
        }

        let children = node.children();
        let last_import = children.iter().rposition(|c| c.is(Kind::Import));
        let package = children.iter().position(|c| c.is(Kind::Package));
        let mut rebuilt = children.to_vec();
        let import = build::import(&self.type_name, self.is_static);
        match (last_import, package) {
            (Some(index), _) => rebuilt.insert(index + 1, import),
            (None, Some(index)) => {
                rebuilt.insert(index + 1, import);
                if let Some(next) = rebuilt.get_mut(index + 2) {
                    separate_from_imports(next);
                }
            }
            (None, None) => {
                if let Some(first) = rebuilt.first_mut() {
                    separate_from_imports(first);
                }
                rebuilt.insert(0, import);
            }
        }
        Ok(Visit::skip(&Arc::new(node.with_children(rebuilt))))
    }
}

/// Put a blank line between a new first import group and the declaration
/// that follows it.
fn separate_from_imports(next: &mut Arc<Node>) {
    if next.is(Kind::Eof) {
        return;
    }
    let prefix = next.prefix().cloned().unwrap_or_default();
    if prefix.newlines() < 2 {
        *next = Arc::new(next.with_prefix(prefix.with_whitespace("\n\n")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::JavaParser;
    use tugrewrite_lst::error::RecipeError;
    use tugrewrite_lst::printer::print;
    use tugrewrite_lst::visitor::walk;

    fn add(visitor: AddImport, text: &str) -> String {
        let tree = JavaParser.parse_source(text).unwrap();
        print(&walk(&visitor, &tree).unwrap()).unwrap()
    }

    #[test]
    fn after_the_last_import() {
        assert_eq!(
            add(
                AddImport::new("java.util.List"),
                "package a;\n\nimport java.io.File;\n\nclass A {}\n"
            ),
            "package a;\n\nimport java.io.File;\nimport java.util.List;\n\nclass A {}\n"
        );
    }

    #[test]
    fn after_the_package() {
        assert_eq!(
            add(AddImport::new("java.util.List"), "package a;\n\nclass A {}\n"),
            "package a;\n\nimport java.util.List;\n\nclass A {}\n"
        );
    }

    #[test]
    fn after_a_package_with_no_blank_line() {
        assert_eq!(
            add(AddImport::new("java.util.List"), "package a;\nclass A {}\n"),
            "package a;\n\nimport java.util.List;\n\nclass A {}\n"
        );
        assert_eq!(
            add(AddImport::new("java.util.List"), "package a;\n// note\nclass A {}\n"),
            "package a;\n\nimport java.util.List;\n\n// note\nclass A {}\n"
        );
        assert_eq!(
            add(AddImport::new("java.util.List"), "package a;"),
            "package a;\n\nimport java.util.List;"
        );
    }

    #[test]
    fn at_the_top_of_the_file() {
        assert_eq!(
            add(AddImport::new("java.util.List"), "class A {}\n"),
            "import java.util.List;\n\nclass A {}\n"
        );
        assert_eq!(
            add(AddImport::new_static("org.junit.Assert.*"), "// header\nclass A {}"),
            "// header\nimport static org.junit.Assert.*;\n\nclass A {}"
        );
    }

    #[test]
    fn existing_imports_cover_the_type() {
        for text in [
            "import java.util.List;\nclass A {}",
            "import java.util.*;\nclass A {}",
            "package java.util;\nclass A {}",
        ] {
            let tree = JavaParser.parse_source(text).unwrap();
            let out = walk(&AddImport::new("java.util.List"), &tree).unwrap();
            assert!(Arc::ptr_eq(&out, &tree), "{}", text);
        }
        let tree = JavaParser.parse_source("class A {}").unwrap();
        let out = walk(&AddImport::new("java.lang.String"), &tree).unwrap();
        assert!(Arc::ptr_eq(&out, &tree));
    }

    #[test]
    fn static_and_plain_imports_are_distinct() {
        assert_eq!(
            add(
                AddImport::new_static("org.junit.Assert.assertEquals"),
                "import org.junit.Assert;\nclass A {}"
            ),
            "import org.junit.Assert;\nimport static org.junit.Assert.assertEquals;\nclass A {}"
        );
    }

    #[test]
    fn reprints_as_it_parses() {
        let out = add(AddImport::new("java.util.List"), "package a;\nclass A {}");
        let reparsed = JavaParser.parse_source(&out).unwrap();
        assert_eq!(print(&reparsed).unwrap(), out);
        assert_eq!(reparsed.children_of_kind(Kind::Import).count(), 1);
    }

    #[test]
    fn params() {
        let params = VisitorParams::new(AddImport::NAME)
            .with("typeName", "org.junit.Assert.*")
            .with("static", true);
        assert_eq!(
            AddImport::from_params(&params).unwrap(),
            AddImport::new_static("org.junit.Assert.*")
        );
        let params = VisitorParams::new(AddImport::NAME).with("typeName", "List");
        assert!(matches!(
            AddImport::from_params(&params),
            Err(RecipeError::InvalidParameter { ref parameter, .. }) if parameter == "typeName"
        ));
    }
}
