// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Core infrastructure shared by every tugrewrite crate.
//!
//! - [`span`]: half-open byte ranges into source text
//! - [`text`]: byte offset and line:column conversions
//! - [`diff`]: unified diff rendering for dry runs
//! - [`error`]: the unified error type and stable exit codes
//! - [`output`]: JSON response types emitted by the CLI

pub mod diff;
pub mod error;
pub mod output;
pub mod span;
pub mod text;

pub use error::{OutputErrorCode, RewriteError, RewriteResult};
pub use output::{emit_response, ErrorResponse, SCHEMA_VERSION};
pub use span::Span;
