// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node kind tags.
//!
//! The built-in kinds cover plain text and the declaration-level shapes
//! shared by C-family languages. Anything else a front end needs is a
//! [`CustomKind`], which carries the formatting the printer falls back on
//! when a visitor synthesizes one.

use std::fmt;

/// A front-end specific kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomKind {
    /// Language that defines the kind, e.g. `"java"`.
    pub language: &'static str,
    /// Kind name, unique within the language.
    pub name: &'static str,
    /// Prefix printed before a synthesized node of this kind.
    ///
    /// `None` means synthesized nodes of this kind cannot be printed.
    pub default_prefix: Option<&'static str>,
}

impl CustomKind {
    pub const fn new(language: &'static str, name: &'static str) -> Self {
        CustomKind {
            language,
            name,
            default_prefix: None,
        }
    }

    pub const fn with_default_prefix(self, prefix: &'static str) -> Self {
        CustomKind {
            default_prefix: Some(prefix),
            ..self
        }
    }
}

/// Runtime kind tag of a [`Node`](crate::tree::Node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    // Files
    SourceFile,
    PlainText,
    Eof,

    // Tokens
    Identifier,
    Keyword,
    Modifier,
    Literal,
    Punct,

    // Code
    Block,
    Statement,
    Expression,
    Group,

    // Declarations
    Package,
    Import,
    QualifiedName,
    ClassDecl,
    MethodDecl,
    VariableDecl,
    Variable,
    EnumValue,
    Annotation,
    TypeRef,
    TypeParameters,
    TypeArguments,
    Parameters,
    Parameter,
    Throws,

    Custom(CustomKind),
}

impl Kind {
    /// Stable snake_case name for logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::SourceFile => "source_file",
            Kind::PlainText => "plain_text",
            Kind::Eof => "eof",
            Kind::Identifier => "identifier",
            Kind::Keyword => "keyword",
            Kind::Modifier => "modifier",
            Kind::Literal => "literal",
            Kind::Punct => "punct",
            Kind::Block => "block",
            Kind::Statement => "statement",
            Kind::Expression => "expression",
            Kind::Group => "group",
            Kind::Package => "package",
            Kind::Import => "import",
            Kind::QualifiedName => "qualified_name",
            Kind::ClassDecl => "class_decl",
            Kind::MethodDecl => "method_decl",
            Kind::VariableDecl => "variable_decl",
            Kind::Variable => "variable",
            Kind::EnumValue => "enum_value",
            Kind::Annotation => "annotation",
            Kind::TypeRef => "type_ref",
            Kind::TypeParameters => "type_parameters",
            Kind::TypeArguments => "type_arguments",
            Kind::Parameters => "parameters",
            Kind::Parameter => "parameter",
            Kind::Throws => "throws",
            Kind::Custom(custom) => custom.name,
        }
    }

    /// Token kinds carry text and no children.
    pub fn is_token(&self) -> bool {
        matches!(
            self,
            Kind::PlainText
                | Kind::Eof
                | Kind::Identifier
                | Kind::Keyword
                | Kind::Modifier
                | Kind::Literal
                | Kind::Punct
        )
    }

    /// Declarations that own a leading run of annotations and modifiers.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            Kind::Package
                | Kind::ClassDecl
                | Kind::MethodDecl
                | Kind::VariableDecl
                | Kind::Parameter
                | Kind::EnumValue
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Custom(custom) => write!(f, "{}::{}", custom.language, custom.name),
            other => f.write_str(other.name()),
        }
    }
}
