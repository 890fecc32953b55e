// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Batch execution of one recipe over many trees.
//!
//! Roots are independent: each runs on the rayon pool, and a failure,
//! panic, cancellation or timeout in one root never affects another.
//! Results come back in input order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::ExecutionError;
use crate::recipe::{Recipe, RecipeRun};
use crate::tree::Node;
use crate::visitor::WalkLimits;

/// Shared flag that asks running walks to stop at the next node boundary.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Limits applied to every root of a batch.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Wall-clock limit for the whole recipe run over one root.
    pub timeout: Option<Duration>,
    pub cancellation: Option<CancellationToken>,
}

impl RunOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn limits(&self) -> WalkLimits {
        WalkLimits {
            cancellation: self.cancellation.clone(),
            deadline: self.timeout.map(|t| Instant::now() + t),
        }
    }
}

/// Outcome for one root of a batch.
#[derive(Debug, Clone)]
pub struct RootResult {
    pub original: Arc<Node>,
    pub outcome: Result<RecipeRun, ExecutionError>,
}

impl RootResult {
    /// True when the recipe succeeded and changed the tree.
    pub fn changed(&self) -> bool {
        self.outcome.as_ref().is_ok_and(|run| run.changed)
    }

    /// The resulting tree, or `None` when the run failed.
    pub fn tree(&self) -> Option<&Arc<Node>> {
        self.outcome.as_ref().ok().map(|run| &run.tree)
    }

    pub fn error(&self) -> Option<&ExecutionError> {
        self.outcome.as_ref().err()
    }
}

/// Run `recipe` over every root in parallel.
pub fn run_batch(recipe: &Recipe, roots: &[Arc<Node>], options: &RunOptions) -> Vec<RootResult> {
    info!(recipe = recipe.name(), roots = roots.len(), "starting batch");

    let results: Vec<RootResult> = roots
        .par_iter()
        .map(|root| {
            let limits = options.limits();
            let outcome = recipe.run_with(root, &limits);
            if let Err(err) = &outcome {
                warn!(recipe = recipe.name(), root = %root.id(), error = %err, "root failed");
            }
            RootResult {
                original: Arc::clone(root),
                outcome,
            }
        })
        .collect();

    let failed = results.iter().filter(|r| r.outcome.is_err()).count();
    let changed = results.iter().filter(|r| r.changed()).count();
    info!(
        recipe = recipe.name(),
        roots = results.len(),
        changed,
        failed,
        "batch finished"
    );
    results
}
