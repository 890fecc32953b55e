// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Java front end for tugrewrite.
//!
//! [`JavaParser`] parses the declaration level of Java (packages, imports,
//! classes, interfaces, enums, annotation types, fields, methods and
//! constructors) into a lossless tree. Method bodies and initializers are
//! kept as runs of tokens grouped by brackets.
//!
//! The [`visitors`] module has the Java-specific rewrites; [`register`]
//! adds them to a [`VisitorRegistry`](tugrewrite_lst::VisitorRegistry).

pub mod build;
mod grammar;
mod parser;
pub mod visitors;

pub use build::DEFAULT_VALUE;
pub use parser::JavaParser;
pub use visitors::register;
