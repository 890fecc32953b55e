// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Error types for parsing, visiting, recipes and printing.
//!
//! Each subsystem has its own error type. All of them bridge into
//! [`RewriteError`] for CLI output.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tugrewrite_core::text::{byte_offset_to_position, LineCol};
use tugrewrite_core::{RewriteError, Span};

use crate::tree::NodeId;

// ============================================================================
// Parsing
// ============================================================================

/// Source text a front end could not turn into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}:{position}: {message}", .path.as_deref().unwrap_or("<input>"))]
pub struct ParseError {
    pub path: Option<String>,
    pub message: String,
    /// Byte offset of the failure.
    pub offset: usize,
    pub position: LineCol,
}

pub type ParseResult<T> = Result<T, ParseError>;

impl ParseError {
    pub fn new(message: impl Into<String>, offset: usize, position: LineCol) -> Self {
        ParseError {
            path: None,
            message: message.into(),
            offset,
            position,
        }
    }

    /// An error at `offset` into `source`, with its line and column computed.
    pub fn at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        ParseError::new(message, offset, byte_offset_to_position(source, offset))
    }

    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().display().to_string());
        self
    }
}

// ============================================================================
// Visiting
// ============================================================================

/// Failure raised by a visitor hook or by the walk itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisitError {
    #[error("{message}")]
    Failed { message: String },

    #[error("the root of a walk cannot be removed or spliced")]
    RootSpliced,

    #[error("walk cancelled")]
    Cancelled,

    #[error("walk exceeded its time limit")]
    TimedOut,

    #[error("visitor panicked: {message}")]
    Panicked { message: String },
}

impl VisitError {
    pub fn failed(message: impl Into<String>) -> Self {
        VisitError::Failed {
            message: message.into(),
        }
    }
}

/// A [`VisitError`] located at the node where it happened.
#[derive(Debug, Clone, Error)]
#[error("{error} at {node}")]
pub struct WalkError {
    pub error: VisitError,
    pub node: NodeId,
    pub span: Option<Span>,
    pub start: Option<LineCol>,
}

/// A visitor failed while a recipe was running over one tree.
#[derive(Debug, Clone, Error)]
#[error(
    "visitor `{visitor}` in recipe `{recipe}` failed at {node}{}: {source}",
    location(.start)
)]
pub struct ExecutionError {
    pub recipe: String,
    pub visitor: String,
    pub node: NodeId,
    pub span: Option<Span>,
    pub start: Option<LineCol>,
    pub source: VisitError,
}

fn location(start: &Option<LineCol>) -> String {
    match start {
        Some(start) => format!(" ({})", start),
        None => String::new(),
    }
}

impl ExecutionError {
    pub fn new(recipe: &str, visitor: &str, failure: WalkError) -> Self {
        ExecutionError {
            recipe: recipe.to_string(),
            visitor: visitor.to_string(),
            node: failure.node,
            span: failure.span,
            start: failure.start,
            source: failure.error,
        }
    }
}

// ============================================================================
// Printing
// ============================================================================

/// A tree the printer cannot render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrintError {
    #[error("no default formatting for synthesized {kind} {node}")]
    MissingFormatting { kind: String, node: NodeId },

    #[error("synthesized {kind} {node} has neither text nor children")]
    MissingText { kind: String, node: NodeId },
}

// ============================================================================
// Recipes
// ============================================================================

/// A recipe could not be built from its configuration.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("unknown visitor `{name}`")]
    UnknownVisitor { name: String },

    #[error("visitor `{visitor}` is missing required parameter `{parameter}`")]
    MissingParameter { visitor: String, parameter: String },

    #[error("visitor `{visitor}` parameter `{parameter}` is invalid: {reason}")]
    InvalidParameter {
        visitor: String,
        parameter: String,
        reason: String,
    },

    #[error("invalid recipe document: {message}")]
    Document { message: String },

    #[error("cannot read recipe {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type RecipeResult<T> = Result<T, RecipeError>;

// ============================================================================
// Bridges into RewriteError
// ============================================================================

impl From<ParseError> for RewriteError {
    fn from(err: ParseError) -> Self {
        RewriteError::ParseFailure {
            path: err.path.unwrap_or_else(|| "<input>".to_string()),
            line: err.position.line,
            column: err.position.column,
            message: err.message,
        }
    }
}

impl From<ExecutionError> for RewriteError {
    fn from(err: ExecutionError) -> Self {
        RewriteError::VisitorExecution {
            message: err.to_string(),
            visitor: err.visitor,
        }
    }
}

impl From<PrintError> for RewriteError {
    fn from(err: PrintError) -> Self {
        RewriteError::PrinterInvariant {
            message: err.to_string(),
        }
    }
}

impl From<RecipeError> for RewriteError {
    fn from(err: RecipeError) -> Self {
        RewriteError::RecipeConstruction {
            message: err.to_string(),
        }
    }
}
