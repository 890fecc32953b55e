// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! JSON output types for CLI responses.
//!
//! Every command writes exactly one JSON document to stdout. Successful
//! commands emit their own response type; failures emit an
//! [`ErrorResponse`]. All responses carry `status` and `schema_version`.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{OutputErrorCode, RewriteError};

/// Version of the JSON output schema.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Errors
// ============================================================================

/// Error details in a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code (see [`OutputErrorCode`]).
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Create from a RewriteError.
    pub fn from_error(err: &RewriteError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let message = err.to_string();

        let details = match err {
            RewriteError::FileNotFound { path } | RewriteError::Io { path, .. } => {
                Some(serde_json::json!({ "path": path }))
            }
            RewriteError::ParseFailure {
                path, line, column, ..
            } => Some(serde_json::json!({
                "path": path,
                "line": line,
                "column": column
            })),
            RewriteError::VisitorExecution { visitor, .. } => {
                Some(serde_json::json!({ "visitor": visitor }))
            }
            RewriteError::IncompleteRun { failed, total } => {
                Some(serde_json::json!({ "failed": failed, "total": total }))
            }
            _ => None,
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

/// Response for a failed command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn from_error(err: &RewriteError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Run
// ============================================================================

/// What happened to one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Changed,
    Unchanged,
    Failed,
}

/// Per-file entry of a [`RunResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub status: FileStatus,
    /// Front end that parsed the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Unified diff of the change (changed files only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl FileReport {
    pub fn unchanged(path: impl Into<String>, language: &str) -> Self {
        FileReport {
            path: path.into(),
            status: FileStatus::Unchanged,
            language: Some(language.to_string()),
            diff: None,
            error: None,
        }
    }

    pub fn changed(path: impl Into<String>, language: &str, diff: String) -> Self {
        FileReport {
            path: path.into(),
            status: FileStatus::Changed,
            language: Some(language.to_string()),
            diff: Some(diff),
            error: None,
        }
    }

    pub fn failed(path: impl Into<String>, err: &RewriteError) -> Self {
        FileReport {
            path: path.into(),
            status: FileStatus::Failed,
            language: None,
            diff: None,
            error: Some(ErrorInfo::from_error(err)),
        }
    }
}

/// Totals of a [`RunResponse`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn of(files: &[FileReport]) -> Self {
        let count = |status: FileStatus| files.iter().filter(|f| f.status == status).count();
        RunSummary {
            total: files.len(),
            changed: count(FileStatus::Changed),
            unchanged: count(FileStatus::Unchanged),
            failed: count(FileStatus::Failed),
        }
    }
}

/// Response for `tugrewrite run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResponse {
    /// "ok" when every file succeeded, "partial" otherwise.
    pub status: String,
    pub schema_version: String,
    pub recipe: String,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
    pub summary: RunSummary,
}

impl RunResponse {
    pub fn new(recipe: impl Into<String>, dry_run: bool, files: Vec<FileReport>) -> Self {
        let summary = RunSummary::of(&files);
        let status = if summary.failed == 0 { "ok" } else { "partial" };
        RunResponse {
            status: status.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            recipe: recipe.into(),
            dry_run,
            files,
            summary,
        }
    }

    /// The error to exit with, if any file failed.
    pub fn incomplete(&self) -> Option<RewriteError> {
        (self.summary.failed > 0).then_some(RewriteError::IncompleteRun {
            failed: self.summary.failed,
            total: self.summary.total,
        })
    }
}

// ============================================================================
// Print and visitors
// ============================================================================

/// Response for `tugrewrite print`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintResponse {
    pub status: String,
    pub schema_version: String,
    pub path: String,
    pub language: String,
    /// Number of nodes in the parsed tree.
    pub nodes: usize,
    /// Printed text; equals the file contents for a lossless front end.
    pub text: String,
    /// Whether `text` is byte-identical to the file.
    pub identical: bool,
}

/// One registered visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorInfo {
    pub name: String,
    pub description: String,
}

/// Response for `tugrewrite visitors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorsResponse {
    pub status: String,
    pub schema_version: String,
    pub visitors: Vec<VisitorInfo>,
}

impl VisitorsResponse {
    pub fn new(visitors: Vec<VisitorInfo>) -> Self {
        VisitorsResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            visitors,
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
///
/// This is the single output path for CLI, ensuring consistency.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_info_carries_parse_location() {
        let err = RewriteError::ParseFailure {
            path: "A.java".to_string(),
            line: 2,
            column: 5,
            message: "expected `;`".to_string(),
        };
        let info = ErrorInfo::from_error(&err);
        assert_eq!(info.code, 3);
        assert_eq!(
            info.details,
            Some(serde_json::json!({ "path": "A.java", "line": 2, "column": 5 }))
        );
    }

    #[test]
    fn run_summary_and_status() {
        let failure = RewriteError::internal("bug");
        let files = vec![
            FileReport::changed("a.txt", "text", "--- a/a.txt\n".to_string()),
            FileReport::unchanged("b.txt", "text"),
            FileReport::failed("c.txt", &failure),
        ];
        let response = RunResponse::new("demo", true, files);
        assert_eq!(
            response.summary,
            RunSummary {
                total: 3,
                changed: 1,
                unchanged: 1,
                failed: 1
            }
        );
        assert_eq!(response.status, "partial");
        assert!(matches!(
            response.incomplete(),
            Some(RewriteError::IncompleteRun {
                failed: 1,
                total: 3
            })
        ));
    }

    #[test]
    fn emitted_json_skips_empty_fields() {
        let mut out = Vec::new();
        emit_response(&FileReport::unchanged("b.txt", "text"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"status\": \"unchanged\""));
        assert!(!text.contains("diff"));
        assert!(text.ends_with("}\n"));
    }
}
