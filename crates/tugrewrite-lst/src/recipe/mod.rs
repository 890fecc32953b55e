// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Recipes: named, ordered visitor pipelines.
//!
//! A [`Recipe`] applies its visitors one after the other, each to the output
//! of the one before. One pass over all visitors is a *cycle*. By default a
//! recipe runs a single cycle; [`Iteration::UntilStable`] repeats cycles
//! until one changes nothing, up to a cap.
//!
//! Change is detected by content, not identity. A visitor that rebuilds
//! nodes without changing what they contain leaves the previous tree in
//! place, so unchanged code keeps printing verbatim.

mod document;
mod registry;

pub use document::{load_recipe, IterationMode, RecipeDocument, VisitorSpec};
pub use registry::{VisitorFactory, VisitorParams, VisitorRegistry};

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ExecutionError;
use crate::tree::Node;
use crate::visitor::{walk_with, Visitor, WalkLimits};

/// Cycle cap used when none is configured.
pub const DEFAULT_MAX_CYCLES: usize = 3;

/// How many cycles a recipe runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Iteration {
    /// Apply every visitor once.
    #[default]
    SinglePass,
    /// Repeat cycles until one produces no change, at most `max_cycles`
    /// times.
    UntilStable { max_cycles: usize },
}

impl Iteration {
    pub fn until_stable() -> Self {
        Iteration::UntilStable {
            max_cycles: DEFAULT_MAX_CYCLES,
        }
    }

    fn max_cycles(self) -> usize {
        match self {
            Iteration::SinglePass => 1,
            Iteration::UntilStable { max_cycles } => max_cycles.max(1),
        }
    }
}

/// A named sequence of visitors.
#[derive(Clone)]
pub struct Recipe {
    name: String,
    visitors: Vec<Arc<dyn Visitor>>,
    iteration: Iteration,
}

/// Outcome of running a recipe over one tree.
#[derive(Debug, Clone)]
pub struct RecipeRun {
    /// The final tree. The input root itself when nothing changed.
    pub tree: Arc<Node>,
    /// Whether any visitor changed the content of the tree.
    pub changed: bool,
    /// Cycles executed.
    pub cycles: usize,
    /// False when an until-stable recipe hit its cap while still changing.
    pub converged: bool,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Recipe {
            name: name.into(),
            visitors: Vec::new(),
            iteration: Iteration::SinglePass,
        }
    }

    pub fn with_visitor(mut self, visitor: impl Visitor + 'static) -> Self {
        self.visitors.push(Arc::new(visitor));
        self
    }

    pub fn push(&mut self, visitor: Arc<dyn Visitor>) {
        self.visitors.push(visitor);
    }

    pub fn with_iteration(mut self, iteration: Iteration) -> Self {
        self.iteration = iteration;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visitors(&self) -> &[Arc<dyn Visitor>] {
        &self.visitors
    }

    pub fn iteration(&self) -> Iteration {
        self.iteration
    }

    /// Run the recipe over `root` without limits.
    pub fn run(&self, root: &Arc<Node>) -> Result<RecipeRun, ExecutionError> {
        self.run_with(root, &WalkLimits::none())
    }

    /// Run the recipe over `root`.
    ///
    /// The first visitor failure aborts the run for this tree; no partial
    /// result is returned.
    pub fn run_with(
        &self,
        root: &Arc<Node>,
        limits: &WalkLimits,
    ) -> Result<RecipeRun, ExecutionError> {
        let max_cycles = self.iteration.max_cycles();
        let mut tree = Arc::clone(root);
        let mut changed = false;
        let mut cycles = 0;
        let mut converged = true;

        while cycles < max_cycles {
            cycles += 1;
            let cycle_changed = self.cycle(&mut tree, cycles, limits)?;
            changed |= cycle_changed;
            if !cycle_changed {
                break;
            }
            if cycles == max_cycles && matches!(self.iteration, Iteration::UntilStable { .. }) {
                converged = false;
                warn!(
                    recipe = %self.name,
                    cycles,
                    "recipe did not converge within its cycle limit"
                );
            }
        }

        Ok(RecipeRun {
            tree,
            changed,
            cycles,
            converged,
        })
    }

    /// Apply every visitor once. Returns whether any of them changed `tree`.
    fn cycle(
        &self,
        tree: &mut Arc<Node>,
        cycle: usize,
        limits: &WalkLimits,
    ) -> Result<bool, ExecutionError> {
        let mut changed = false;
        for visitor in &self.visitors {
            let after = walk_with(visitor.as_ref(), tree, limits)
                .map_err(|failure| ExecutionError::new(&self.name, visitor.name(), failure))?;
            let visitor_changed = !Arc::ptr_eq(&after, tree) && !after.content_eq(tree);
            debug!(
                recipe = %self.name,
                visitor = visitor.name(),
                cycle,
                changed = visitor_changed,
                "visitor applied"
            );
            if visitor_changed {
                *tree = after;
                changed = true;
            }
        }
        Ok(changed)
    }
}

impl fmt::Debug for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visitors: Vec<&str> = self.visitors.iter().map(|v| v.name()).collect();
        f.debug_struct("Recipe")
            .field("name", &self.name)
            .field("visitors", &visitors)
            .field("iteration", &self.iteration)
            .finish()
    }
}
