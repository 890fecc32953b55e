// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Out-of-band annotations on nodes. Markers never print unless asked to.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Marker {
    /// The node matched a search.
    SearchResult { description: Option<String> },
    /// A message about the node.
    Diagnostic { severity: Severity, message: String },
    /// Free-form label.
    Tag { name: String },
}

/// Ordered marker list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Markers(Vec<Marker>);

impl Markers {
    pub const EMPTY: Markers = Markers(Vec::new());

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.0.iter()
    }

    /// A copy with `marker` appended. Adding a marker already present is a
    /// no-op so repeated passes do not pile up duplicates.
    pub fn with(&self, marker: Marker) -> Markers {
        let mut markers = self.0.clone();
        if !markers.contains(&marker) {
            markers.push(marker);
        }
        Markers(markers)
    }

    pub fn contains(&self, marker: &Marker) -> bool {
        self.0.contains(marker)
    }

    pub fn search_results(&self) -> impl Iterator<Item = Option<&str>> {
        self.0.iter().filter_map(|m| match m {
            Marker::SearchResult { description } => Some(description.as_deref()),
            _ => None,
        })
    }
}

impl FromIterator<Marker> for Markers {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        let mut markers = Markers::default();
        for marker in iter {
            markers = markers.with(marker);
        }
        markers
    }
}
