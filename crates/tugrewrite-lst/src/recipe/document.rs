// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Recipe documents.
//!
//! A recipe is configured in TOML or JSON:
//!
//! ```toml
//! name = "text.ChangeTextTwice"
//! iteration = "until-stable"
//! max-cycles = 3
//!
//! [[visitors]]
//! type = "change-text"
//! toText = "Hello Jon"
//!
//! [[visitors]]
//! type = "change-text"
//! toText = "Hello Jonathan!"
//! ```
//!
//! Every key of a `[[visitors]]` entry other than `type` is a parameter for
//! that visitor. The whole document is validated, and every visitor built,
//! before a recipe is returned.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{RecipeError, RecipeResult};

use super::registry::{VisitorParams, VisitorRegistry};
use super::{Iteration, Recipe, DEFAULT_MAX_CYCLES};

/// `iteration` setting of a recipe document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IterationMode {
    #[default]
    SinglePass,
    UntilStable,
}

/// A parsed recipe document, not yet resolved against a registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RecipeDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub iteration: IterationMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cycles: Option<usize>,
    #[serde(default)]
    pub visitors: Vec<VisitorSpec>,
}

/// One `[[visitors]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitorSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub params: BTreeMap<String, Value>,
}

impl RecipeDocument {
    pub fn from_toml_str(text: &str) -> RecipeResult<Self> {
        toml::from_str(text).map_err(|e| RecipeError::Document {
            message: e.to_string(),
        })
    }

    pub fn from_json_str(text: &str) -> RecipeResult<Self> {
        serde_json::from_str(text).map_err(|e| RecipeError::Document {
            message: e.to_string(),
        })
    }

    /// Read a document, choosing the format by extension: `.json` is JSON,
    /// anything else TOML.
    pub fn from_path(path: &Path) -> RecipeResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| RecipeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => RecipeDocument::from_json_str(&text),
            _ => RecipeDocument::from_toml_str(&text),
        }
    }

    /// The iteration mode the document asks for.
    pub fn iteration(&self) -> RecipeResult<Iteration> {
        match (self.iteration, self.max_cycles) {
            (IterationMode::SinglePass, None) => Ok(Iteration::SinglePass),
            (IterationMode::SinglePass, Some(_)) => Err(RecipeError::Document {
                message: "max-cycles requires iteration = \"until-stable\"".to_string(),
            }),
            (IterationMode::UntilStable, Some(0)) => Err(RecipeError::Document {
                message: "max-cycles must be at least 1".to_string(),
            }),
            (IterationMode::UntilStable, max_cycles) => Ok(Iteration::UntilStable {
                max_cycles: max_cycles.unwrap_or(DEFAULT_MAX_CYCLES),
            }),
        }
    }

    /// Build the recipe, constructing every visitor through `registry`.
    pub fn into_recipe(self, registry: &VisitorRegistry) -> RecipeResult<Recipe> {
        if self.name.trim().is_empty() {
            return Err(RecipeError::Document {
                message: "recipe name must not be empty".to_string(),
            });
        }
        let mut recipe = Recipe::new(self.name.as_str()).with_iteration(self.iteration()?);
        for spec in self.visitors {
            let params = VisitorParams::from_values(&spec.kind, spec.params);
            recipe.push(registry.create(&spec.kind, &params)?);
        }
        debug!(
            recipe = recipe.name(),
            visitors = recipe.visitors().len(),
            "recipe built"
        );
        Ok(recipe)
    }
}

/// Read the document at `path` and build its recipe.
pub fn load_recipe(path: &Path, registry: &VisitorRegistry) -> RecipeResult<Recipe> {
    RecipeDocument::from_path(path)?.into_recipe(registry)
}
