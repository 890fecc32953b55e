// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Java visitors.

mod add_import;
mod blank_lines;
mod remove_annotation;

use std::sync::Arc;

use tugrewrite_lst::VisitorRegistry;

pub use add_import::AddImport;
pub use blank_lines::{BlankLines, BlankLinesStyle};
pub use remove_annotation::RemoveAnnotation;

/// Add the Java visitors to `registry`.
pub fn register(registry: &mut VisitorRegistry) {
    registry.register(
        RemoveAnnotation::NAME,
        "Remove annotations named `name` from declarations",
        |params| Ok(Arc::new(RemoveAnnotation::from_params(params)?)),
    );
    registry.register(
        AddImport::NAME,
        "Import `typeName` (optionally `static`) unless already imported",
        |params| Ok(Arc::new(AddImport::from_params(params)?)),
    );
    registry.register(
        BlankLines::NAME,
        "Clamp blank lines between declarations to the style's limits",
        |params| Ok(Arc::new(BlankLines::from_params(params)?)),
    );
}
