// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Name to visitor factory registry.
//!
//! Recipe documents refer to visitors by name. Each front end registers the
//! visitors it provides; [`VisitorRegistry::with_builtins`] holds the
//! language-independent ones.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{RecipeError, RecipeResult};
use crate::visitor::Visitor;
use crate::visitors::{ChangeText, FindIdentifier, RenameIdentifier};

/// Builds a configured visitor from its parameters.
pub type VisitorFactory =
    Arc<dyn Fn(&VisitorParams) -> RecipeResult<Arc<dyn Visitor>> + Send + Sync>;

struct Entry {
    description: &'static str,
    factory: VisitorFactory,
}

/// Visitors available to recipe documents, keyed by name.
#[derive(Default)]
pub struct VisitorRegistry {
    entries: BTreeMap<String, Entry>,
}

impl VisitorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        VisitorRegistry::default()
    }

    /// A registry with the language-independent visitors.
    pub fn with_builtins() -> Self {
        let mut registry = VisitorRegistry::new();
        registry.register(
            ChangeText::NAME,
            "Replace the whole text of a plain text file (`toText`)",
            |params| Ok(Arc::new(ChangeText::from_params(params)?)),
        );
        registry.register(
            RenameIdentifier::NAME,
            "Rename every identifier token spelled `from` to `to`",
            |params| Ok(Arc::new(RenameIdentifier::from_params(params)?)),
        );
        registry.register(
            FindIdentifier::NAME,
            "Mark identifier tokens spelled `name` as search results",
            |params| Ok(Arc::new(FindIdentifier::from_params(params)?)),
        );
        registry
    }

    /// Add or replace a visitor factory.
    pub fn register<F>(&mut self, name: &str, description: &'static str, factory: F)
    where
        F: Fn(&VisitorParams) -> RecipeResult<Arc<dyn Visitor>> + Send + Sync + 'static,
    {
        self.entries.insert(
            name.to_string(),
            Entry {
                description,
                factory: Arc::new(factory),
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(name, description)` pairs in sorted order.
    pub fn describe(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.description))
    }

    /// Build the visitor registered as `name`.
    pub fn create(&self, name: &str, params: &VisitorParams) -> RecipeResult<Arc<dyn Visitor>> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| RecipeError::UnknownVisitor {
                name: name.to_string(),
            })?;
        (entry.factory)(params)
    }
}

impl fmt::Debug for VisitorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

/// Parameters of one visitor entry in a recipe document.
#[derive(Debug, Clone, Default)]
pub struct VisitorParams {
    visitor: String,
    values: BTreeMap<String, Value>,
}

impl VisitorParams {
    pub fn new(visitor: impl Into<String>) -> Self {
        VisitorParams {
            visitor: visitor.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub(crate) fn from_values(visitor: &str, values: BTreeMap<String, Value>) -> Self {
        VisitorParams {
            visitor: visitor.to_string(),
            values,
        }
    }

    /// Name of the visitor these parameters configure.
    pub fn visitor(&self) -> &str {
        &self.visitor
    }

    pub fn required_str(&self, key: &str) -> RecipeResult<String> {
        self.optional_str(key)?
            .ok_or_else(|| RecipeError::MissingParameter {
                visitor: self.visitor.clone(),
                parameter: key.to_string(),
            })
    }

    pub fn optional_str(&self, key: &str) -> RecipeResult<Option<String>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.invalid(key, format!("expected a string, found {}", other))),
        }
    }

    pub fn optional_bool(&self, key: &str) -> RecipeResult<Option<bool>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.invalid(key, format!("expected a boolean, found {}", other))),
        }
    }

    pub fn optional_u64(&self, key: &str) -> RecipeResult<Option<u64>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                self.invalid(
                    key,
                    format!("expected a non-negative integer, found {}", value),
                )
            }),
        }
    }

    /// Reject any parameter not in `known`.
    pub fn expect_only(&self, known: &[&str]) -> RecipeResult<()> {
        match self.values.keys().find(|k| !known.contains(&k.as_str())) {
            Some(unknown) => Err(self.invalid(unknown, "unknown parameter")),
            None => Ok(()),
        }
    }

    /// An [`RecipeError::InvalidParameter`] for `key`.
    pub fn invalid(&self, key: &str, reason: impl Into<String>) -> RecipeError {
        RecipeError::InvalidParameter {
            visitor: self.visitor.clone(),
            parameter: key.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered_in_order() {
        let registry = VisitorRegistry::with_builtins();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["change-text", "find-identifier", "rename-identifier"]);
        assert!(registry.describe().all(|(_, d)| !d.is_empty()));
    }

    #[test]
    fn unknown_visitor() {
        let registry = VisitorRegistry::with_builtins();
        let err = registry
            .create("no-such-visitor", &VisitorParams::new("no-such-visitor"))
            .err()
            .unwrap();
        assert!(matches!(err, RecipeError::UnknownVisitor { name } if name == "no-such-visitor"));
    }

    #[test]
    fn create_passes_params_to_factory() {
        let registry = VisitorRegistry::with_builtins();
        let params = VisitorParams::new("change-text").with("toText", "Hello");
        let visitor = registry.create("change-text", &params).unwrap();
        assert_eq!(visitor.name(), "change-text");
    }

    #[test]
    fn typed_accessors() {
        let params = VisitorParams::new("v")
            .with("s", "x")
            .with("b", true)
            .with("n", 3u64);
        assert_eq!(params.required_str("s").unwrap(), "x");
        assert_eq!(params.optional_bool("b").unwrap(), Some(true));
        assert_eq!(params.optional_u64("n").unwrap(), Some(3));
        assert_eq!(params.optional_str("missing").unwrap(), None);

        assert!(matches!(
            params.required_str("missing"),
            Err(RecipeError::MissingParameter { .. })
        ));
        assert!(matches!(
            params.optional_bool("s"),
            Err(RecipeError::InvalidParameter { .. })
        ));
        assert!(matches!(
            params.required_str("n"),
            Err(RecipeError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn expect_only_rejects_unknown_keys() {
        let params = VisitorParams::new("v").with("toText", "x").with("totext", "y");
        assert!(params.expect_only(&["toText", "totext"]).is_ok());
        let err = params.expect_only(&["toText"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "visitor `v` parameter `totext` is invalid: unknown parameter"
        );
    }
}
