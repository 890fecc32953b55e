// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Language-independent visitors.
//!
//! [`VisitorRegistry::with_builtins`](crate::recipe::VisitorRegistry::with_builtins)
//! registers all of them.

mod change_text;
mod identifier;

pub use change_text::ChangeText;
pub use identifier::{is_identifier, FindIdentifier, RenameIdentifier};
