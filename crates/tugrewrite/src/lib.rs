// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! tugrewrite - run recipes over source files without disturbing formatting.
//!
//! This crate provides the `tugrewrite` binary. The library half exposes the
//! command implementations so they can be driven from tests.
//!
//! ## Modules
//!
//! - `cli` - command implementations

pub mod cli;

// Re-export core types for convenience
pub use tugrewrite_core::error::{OutputErrorCode, RewriteError};
pub use tugrewrite_core::output::{ErrorInfo, ErrorResponse, RunResponse, SCHEMA_VERSION};
