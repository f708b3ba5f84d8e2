//! Scale categories and the run-wide category column accumulator

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum number of `Category N` columns written for scales
pub const MIN_CATEGORY_COLUMNS: usize = 10;

/// One discrete value option of a scale, written as `key=label`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleCategory {
    /// Text before `=`, trimmed (the category's synonym, usually its code)
    pub key: String,
    /// Text after `=`, trimmed
    pub label: String,
}

impl ScaleCategory {
    /// Parse a `key=label` category definition.
    ///
    /// Only the first `=` separates; a value without `=` yields the whole
    /// trimmed text as both key and label.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('=') {
            Some((key, label)) => Self {
                key: key.trim().to_string(),
                label: label.trim().to_string(),
            },
            None => {
                let text = raw.trim().to_string();
                Self {
                    key: text.clone(),
                    label: text,
                }
            }
        }
    }
}

/// Ordered category definitions of one scale, keyed by 1-based column index.
///
/// Gaps are allowed: an absent `Category 3` does not move `Category 4`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categories(BTreeMap<usize, String>);

impl Categories {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw definition at `index`; blank values clear the slot
    pub fn set(&mut self, index: usize, raw: impl Into<String>) {
        let raw = raw.into();
        if index == 0 {
            return;
        }
        if raw.trim().is_empty() {
            self.0.remove(&index);
        } else {
            self.0.insert(index, raw);
        }
    }

    /// Raw definition at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(&index).map(String::as_str)
    }

    /// Highest populated index, 0 when empty
    #[must_use]
    pub fn max_index(&self) -> usize {
        self.0.keys().next_back().copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Raw definitions in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(index, raw)| (*index, raw.as_str()))
    }

    /// Parsed categories in index order
    pub fn parsed(&self) -> impl Iterator<Item = (usize, ScaleCategory)> + '_ {
        self.0
            .iter()
            .map(|(index, raw)| (*index, ScaleCategory::parse(raw)))
    }
}

/// Grow-only count of category columns observed during one run.
///
/// Threaded through the read phase and consulted when writing, so every
/// output carries `Category 1..=width()` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryWidth {
    max_seen: usize,
}

impl Default for CategoryWidth {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryWidth {
    #[must_use]
    pub fn new() -> Self {
        Self { max_seen: 0 }
    }

    /// Record an observed category index
    pub fn observe(&mut self, index: usize) {
        self.max_seen = self.max_seen.max(index);
    }

    /// Highest index observed so far
    #[must_use]
    pub fn max_seen(&self) -> usize {
        self.max_seen
    }

    /// Number of category columns to write
    #[must_use]
    pub fn width(&self) -> usize {
        self.max_seen.max(MIN_CATEGORY_COLUMNS)
    }

    /// `Category 1..=width()` column headers
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        (1..=self.width()).map(crate::schema::category_column).collect()
    }
}
