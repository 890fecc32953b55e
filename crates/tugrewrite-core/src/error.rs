// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Error types and error code constants for tugrewrite.
//!
//! This module provides a unified error type (`RewriteError`) that bridges
//! domain-specific errors from the tree, recipe and printer subsystems into a
//! common format suitable for JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller, missing files)
//! - `3`: Parse failures (source text a front end cannot turn into a tree)
//! - `4`: Recipe construction failures (unknown visitor, bad parameters)
//! - `5`: Visitor execution failures (a visitor failed on some tree)
//! - `6`: Printer invariant violations (a tree that cannot be printed)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! Domain errors convert into `RewriteError` through `From` impls that live
//! next to the domain error types.

use std::fmt;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable error codes for JSON output and process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, missing file).
    InvalidArguments = 2,
    /// Source text could not be parsed.
    ParseFailure = 3,
    /// A recipe could not be constructed from its configuration.
    RecipeConstruction = 4,
    /// A visitor failed while transforming a tree.
    VisitorExecution = 5,
    /// A tree could not be printed.
    PrinterInvariant = 6,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Source text could not be parsed.
    #[error("parse failure in {path} at {line}:{column}: {message}")]
    ParseFailure {
        path: String,
        line: u32,
        column: u32,
        message: String,
    },

    /// Recipe configuration could not be turned into a recipe.
    #[error("recipe construction failed: {message}")]
    RecipeConstruction { message: String },

    /// A visitor failed on a tree.
    #[error("visitor `{visitor}` failed: {message}")]
    VisitorExecution { visitor: String, message: String },

    /// The printer met a node it has no formatting for.
    #[error("printer invariant violated: {message}")]
    PrinterInvariant { message: String },

    /// Some inputs of a batch failed; the rest were processed.
    #[error("{failed} of {total} files failed")]
    IncompleteRun { failed: usize, total: usize },

    /// Filesystem failure.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&RewriteError> for OutputErrorCode {
    fn from(err: &RewriteError) -> Self {
        match err {
            RewriteError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            RewriteError::FileNotFound { .. } => OutputErrorCode::InvalidArguments,
            RewriteError::ParseFailure { .. } => OutputErrorCode::ParseFailure,
            RewriteError::RecipeConstruction { .. } => OutputErrorCode::RecipeConstruction,
            RewriteError::VisitorExecution { .. } => OutputErrorCode::VisitorExecution,
            RewriteError::PrinterInvariant { .. } => OutputErrorCode::PrinterInvariant,
            RewriteError::IncompleteRun { .. } => OutputErrorCode::VisitorExecution,
            RewriteError::Io { .. } => OutputErrorCode::InternalError,
            RewriteError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

pub type RewriteResult<T> = Result<T, RewriteError>;

impl From<RewriteError> for OutputErrorCode {
    fn from(err: RewriteError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl RewriteError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        RewriteError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        RewriteError::FileNotFound { path: path.into() }
    }

    /// Create an I/O error for `path`.
    pub fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        RewriteError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        RewriteError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
