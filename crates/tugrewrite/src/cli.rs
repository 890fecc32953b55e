// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Command implementations behind the `tugrewrite` binary.
//!
//! - `run` - load a recipe document, run it over files and directories,
//!   report a diff per changed file and write the results back
//! - `print` - parse one file and print it again, checking the round trip
//! - `visitors` - list the visitors a recipe document can name
//!
//! ## Error Handling
//!
//! Setup failures (bad recipe, missing input) return a [`RewriteError`].
//! Failures on a single file never stop a run: they are reported in that
//! file's [`FileReport`] and every other file is still processed.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use tugrewrite_core::diff::generate_unified_diff;
use tugrewrite_core::output::{
    FileReport, PrintResponse, RunResponse, VisitorInfo, VisitorsResponse, SCHEMA_VERSION,
};
use tugrewrite_core::{RewriteError, RewriteResult};
use tugrewrite_java::JavaParser;
use tugrewrite_lst::recipe::load_recipe;
use tugrewrite_lst::{
    print, run_batch, Node, ParserSet, PlainTextParser, RunOptions, VisitorRegistry,
};

/// Language name of the fallback front end.
const PLAIN_TEXT: &str = "text";

/// Options for [`Workbench::run`].
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// Report diffs without writing files.
    pub dry_run: bool,
    /// Limit for the whole recipe over one file.
    pub timeout: Option<Duration>,
}

/// The parsers and visitors available to the CLI.
pub struct Workbench {
    parsers: ParserSet,
    registry: VisitorRegistry,
}

impl Default for Workbench {
    fn default() -> Self {
        Workbench::new()
    }
}

/// A file that parsed and waits for the batch.
struct Parsed {
    path: String,
    file: PathBuf,
    language: String,
    source: String,
}

impl Workbench {
    /// Every front end and visitor this workspace ships.
    pub fn new() -> Self {
        let mut registry = VisitorRegistry::with_builtins();
        tugrewrite_java::register(&mut registry);
        Workbench {
            parsers: ParserSet::new().with(JavaParser).with(PlainTextParser),
            registry,
        }
    }

    pub fn parsers(&self) -> &ParserSet {
        &self.parsers
    }

    pub fn registry(&self) -> &VisitorRegistry {
        &self.registry
    }

    /// Expand `paths` into the files to rewrite.
    ///
    /// Files named directly are always taken. Directories are walked
    /// recursively, skipping hidden entries and keeping only files a
    /// language front end claims, so plain text never comes from a walk.
    /// The result is sorted and free of duplicates.
    pub fn collect_inputs(&self, paths: &[PathBuf]) -> RewriteResult<Vec<PathBuf>> {
        let mut files = BTreeSet::new();
        for path in paths {
            if path.is_file() {
                files.insert(path.clone());
                continue;
            }
            if !path.is_dir() {
                return Err(RewriteError::file_not_found(path.display().to_string()));
            }
            for entry in WalkDir::new(path)
                .follow_links(false)
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
            {
                let entry = entry.map_err(|e| RewriteError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let claimed = self
                    .parsers
                    .parser_for(entry.path())
                    .is_some_and(|p| p.language() != PLAIN_TEXT);
                if claimed {
                    files.insert(entry.into_path());
                }
            }
        }
        Ok(files.into_iter().collect())
    }

    /// Run the recipe document at `recipe_path` over `paths`.
    ///
    /// The recipe is built before any file is read, so a bad document fails
    /// the whole run. After that every file gets a report of its own.
    pub fn run(
        &self,
        recipe_path: &Path,
        paths: &[PathBuf],
        args: &RunArgs,
    ) -> RewriteResult<RunResponse> {
        let recipe = load_recipe(recipe_path, &self.registry)?;
        let inputs = self.collect_inputs(paths)?;
        info!(recipe = recipe.name(), files = inputs.len(), dry_run = args.dry_run, "run");

        let mut reports: Vec<Option<FileReport>> = Vec::with_capacity(inputs.len());
        let mut parsed = Vec::new();
        let mut roots = Vec::new();
        for file in inputs {
            match self.parse_file(&file) {
                Ok((language, source, tree)) => {
                    parsed.push((
                        reports.len(),
                        Parsed {
                            path: file.display().to_string(),
                            file,
                            language,
                            source,
                        },
                    ));
                    roots.push(tree);
                    reports.push(None);
                }
                Err(err) => {
                    warn!(file = %file.display(), error = %err, "skipping file");
                    reports.push(Some(FileReport::failed(file.display().to_string(), &err)));
                }
            }
        }

        let mut options = RunOptions::default();
        if let Some(timeout) = args.timeout {
            options = options.with_timeout(timeout);
        }
        let results = run_batch(&recipe, &roots, &options);

        for ((slot, input), result) in parsed.into_iter().zip(results) {
            let report = match result.outcome {
                Ok(run) if run.changed => self.finish(&input, &run.tree, args.dry_run),
                Ok(_) => FileReport::unchanged(input.path, &input.language),
                Err(err) => FileReport::failed(input.path, &RewriteError::from(err)),
            };
            reports[slot] = Some(report);
        }

        let files = reports.into_iter().flatten().collect();
        Ok(RunResponse::new(recipe.name(), args.dry_run, files))
    }

    /// Print a changed tree, diff it and write it back.
    fn finish(&self, input: &Parsed, tree: &Node, dry_run: bool) -> FileReport {
        let printed = match print(tree) {
            Ok(printed) => printed,
            Err(err) => return FileReport::failed(&input.path, &RewriteError::from(err)),
        };
        if printed == input.source {
            return FileReport::unchanged(&input.path, &input.language);
        }
        let diff = generate_unified_diff(&input.path, &input.source, &printed);
        if !dry_run {
            if let Err(err) = fs::write(&input.file, &printed) {
                return FileReport::failed(&input.path, &RewriteError::io(&input.path, &err));
            }
            debug!(file = %input.path, bytes = printed.len(), "wrote");
        }
        FileReport::changed(&input.path, &input.language, diff)
    }

    /// Parse one file and print it back.
    pub fn print_file(&self, path: &Path) -> RewriteResult<PrintResponse> {
        if !path.is_file() {
            return Err(RewriteError::file_not_found(path.display().to_string()));
        }
        let (language, source, tree) = self.parse_file(path)?;
        let text = print(&tree)?;
        Ok(PrintResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            path: path.display().to_string(),
            language,
            nodes: tree.preorder().len(),
            identical: text == source,
            text,
        })
    }

    /// Registered visitors in name order.
    pub fn visitors(&self) -> VisitorsResponse {
        VisitorsResponse::new(
            self.registry
                .describe()
                .map(|(name, description)| VisitorInfo {
                    name: name.to_string(),
                    description: description.to_string(),
                })
                .collect(),
        )
    }

    fn parse_file(&self, path: &Path) -> RewriteResult<(String, String, Arc<Node>)> {
        let parser = self
            .parsers
            .parser_for(path)
            .ok_or_else(|| {
                RewriteError::invalid_args(format!("no parser for {}", path.display()))
            })?;
        let source = fs::read_to_string(path)
            .map_err(|e| RewriteError::io(path.display().to_string(), &e))?;
        let tree = parser.parse(&source, Some(path))?;
        debug!(file = %path.display(), language = parser.language(), "parsed");
        Ok((parser.language().to_string(), source, tree))
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}
