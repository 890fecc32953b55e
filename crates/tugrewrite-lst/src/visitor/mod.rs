// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for tree transformation.
//!
//! - [`Visitor`]: per-kind `visit_*` / `leave_*` hooks, identity by default
//! - [`Visit`] and [`Transform`]: what a hook returns
//! - [`walk`] / [`walk_with`]: drive a visitor over one tree

mod traits;
mod walk;

pub use traits::{
    IdentityVisitor, LeaveOutcome, Transform, Visit, VisitOutcome, VisitResult, Visitor,
};
pub use walk::{walk, walk_with, WalkLimits};
