// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Lossless semantic trees and the machinery that rewrites them.
//!
//! A front end parses source text into an immutable [`Node`] tree that keeps
//! every byte of formatting. [`Visitor`]s transform the tree, [`Recipe`]s
//! chain visitors, and the [`printer`] turns the result back into text,
//! emitting untouched code exactly as it was written.
//!
//! ```ignore
//! let tree = PlainTextParser.parse_text("Hi Jon")?;
//! let recipe = Recipe::new("greet")
//!     .with_visitor(ChangeText::new("Hello Jon"))
//!     .with_visitor(ChangeText::new("Hello Jonathan!"));
//! let run = recipe.run(&tree)?;
//! assert_eq!(print(&run.tree)?, "Hello Jonathan!");
//! ```

pub mod cursor;
pub mod error;
pub mod parser;
pub mod printer;
pub mod recipe;
pub mod run;
pub mod text;
pub mod tree;
pub mod visitor;
pub mod visitors;

pub use cursor::Cursor;
pub use error::{
    ExecutionError, ParseError, ParseResult, PrintError, RecipeError, RecipeResult, VisitError,
    WalkError,
};
pub use parser::{LanguageParser, ParserSet};
pub use printer::{print, print_trimmed, print_with, resolve_formatting, PrintOptions};
pub use recipe::{Iteration, Recipe, RecipeRun, VisitorParams, VisitorRegistry};
pub use run::{run_batch, CancellationToken, RootResult, RunOptions};
pub use text::PlainTextParser;
pub use tree::{Kind, Node, NodeId, Space};
pub use visitor::{Transform, Visit, VisitOutcome, VisitResult, Visitor};
