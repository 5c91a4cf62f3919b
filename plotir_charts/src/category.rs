// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Categorical axis ordering.
//!
//! Category labels get integer positions along the axis. The order is chosen by a
//! [`CategoryOrder`] policy on top of the *encounter order*: the order labels first appear in
//! the series data. The encounter order is captured once per axis and only ever grows, so
//! switching policies back and forth always lands on the same positions.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};

/// Ordering policy for a category axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CategoryOrder {
    /// Encounter order across the series data.
    #[default]
    Trace,
    /// Lexicographic by label.
    CategoryAscending,
    /// Reverse lexicographic by label.
    CategoryDescending,
    /// Explicit order from a category array; unlisted labels follow in encounter order.
    Array,
}

impl CategoryOrder {
    /// Parses a policy name.
    ///
    /// Unset or unrecognized values resolve to [`CategoryOrder::Trace`].
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("trace") | None => Self::Trace,
            Some("category ascending") => Self::CategoryAscending,
            Some("category descending") => Self::CategoryDescending,
            Some("array") => Self::Array,
            Some(_other) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(value = _other, "unknown category order, using trace order");
                Self::Trace
            }
        }
    }

    /// Returns the policy name accepted by [`CategoryOrder::parse`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::CategoryAscending => "category ascending",
            Self::CategoryDescending => "category descending",
            Self::Array => "array",
        }
    }

    /// Resolves the effective policy for an axis.
    ///
    /// With no policy given, a non-empty category array selects [`CategoryOrder::Array`].
    /// [`CategoryOrder::Array`] without an array falls back to [`CategoryOrder::Trace`].
    pub fn resolve(value: Option<&str>, array: Option<&[String]>) -> Self {
        let has_array = array.is_some_and(|a| !a.is_empty());
        match (value, has_array) {
            (None, true) => Self::Array,
            (v, has_array) => match Self::parse(v) {
                Self::Array if !has_array => Self::Trace,
                order => order,
            },
        }
    }
}

/// Orders `encounter` under `order`.
///
/// Sorting is stable, so labels that compare equal keep their encounter order. For
/// [`CategoryOrder::Array`] every label of `explicit` is kept, including labels that never
/// occur in the data; duplicates in `explicit` are dropped.
pub fn order_categories(
    encounter: &[String],
    order: CategoryOrder,
    explicit: Option<&[String]>,
) -> Vec<String> {
    match order {
        CategoryOrder::Trace => encounter.to_vec(),
        CategoryOrder::CategoryAscending => {
            let mut out = encounter.to_vec();
            out.sort();
            out
        }
        CategoryOrder::CategoryDescending => {
            let mut out = encounter.to_vec();
            out.sort_by(|a, b| b.cmp(a));
            out
        }
        CategoryOrder::Array => {
            let explicit = explicit.unwrap_or(&[]);
            let mut seen: HashSet<&str> = HashSet::with_capacity(explicit.len());
            let mut out = Vec::with_capacity(explicit.len() + encounter.len());
            for label in explicit.iter().chain(encounter) {
                if seen.insert(label.as_str()) {
                    out.push(label.clone());
                }
            }
            out
        }
    }
}

/// Per-axis category state: encounter cache, resolved order and positions.
#[derive(Clone, Debug, Default)]
pub struct CategoryDomain {
    encounter: Vec<String>,
    seen: HashSet<String>,
    categories: Vec<String>,
    positions: HashMap<String, usize>,
}

impl CategoryDomain {
    /// Creates an empty domain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records labels in data order.
    ///
    /// Labels already seen keep their place; new labels are appended.
    pub fn observe<'a>(&mut self, labels: impl IntoIterator<Item = &'a str>) {
        for label in labels {
            if !self.seen.contains(label) {
                self.seen.insert(String::from(label));
                self.encounter.push(String::from(label));
            }
        }
    }

    /// Recomputes the ordered categories and their positions.
    pub fn resolve(&mut self, order: CategoryOrder, explicit: Option<&[String]>) -> &[String] {
        self.categories = order_categories(&self.encounter, order, explicit);
        self.positions.clear();
        for (i, label) in self.categories.iter().enumerate() {
            self.positions.insert(label.clone(), i);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            order = order.as_str(),
            count = self.categories.len(),
            "resolved category positions"
        );

        &self.categories
    }

    /// Labels in encounter order.
    pub fn encounter_order(&self) -> &[String] {
        &self.encounter
    }

    /// Labels in resolved order (position `i` holds the label at `i`).
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Position of `label`, if resolved.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// Label at `position`.
    pub fn label(&self, position: usize) -> Option<&str> {
        self.categories.get(position).map(String::as_str)
    }

    /// Number of resolved categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns `true` if no category is resolved.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| String::from(*s)).collect()
    }

    fn zoo() -> CategoryDomain {
        let mut d = CategoryDomain::new();
        d.observe(["giraffes", "orangutans", "monkeys"]);
        d
    }

    #[test]
    fn unknown_or_missing_policy_is_trace() {
        assert_eq!(CategoryOrder::parse(None), CategoryOrder::Trace);
        assert_eq!(CategoryOrder::parse(Some("by size")), CategoryOrder::Trace);
        assert_eq!(
            CategoryOrder::parse(Some("category descending")),
            CategoryOrder::CategoryDescending
        );
    }

    #[test]
    fn array_is_the_default_only_when_an_array_exists() {
        let arr = labels(&["a"]);
        assert_eq!(CategoryOrder::resolve(None, Some(arr.as_slice())), CategoryOrder::Array);
        assert_eq!(CategoryOrder::resolve(None, Some(&[][..])), CategoryOrder::Trace);
        assert_eq!(CategoryOrder::resolve(Some("array"), None), CategoryOrder::Trace);
        assert_eq!(
            CategoryOrder::resolve(Some("category ascending"), Some(arr.as_slice())),
            CategoryOrder::CategoryAscending
        );
    }

    #[test]
    fn descending_then_trace_restores_encounter_positions() {
        let mut d = zoo();
        d.resolve(CategoryOrder::Trace, None);
        let before: Vec<_> = ["giraffes", "orangutans", "monkeys"]
            .iter()
            .map(|l| d.position(l))
            .collect();

        d.resolve(CategoryOrder::CategoryDescending, None);
        assert_eq!(d.categories(), labels(&["orangutans", "monkeys", "giraffes"]));

        d.resolve(CategoryOrder::Trace, None);
        let after: Vec<_> = ["giraffes", "orangutans", "monkeys"]
            .iter()
            .map(|l| d.position(l))
            .collect();
        assert_eq!(before, after);
        assert_eq!(d.categories(), labels(&["giraffes", "orangutans", "monkeys"]));
    }

    #[test]
    fn array_order_keeps_unknown_labels_and_appends_unlisted() {
        let mut d = zoo();
        let explicit = labels(&["monkeys", "zebras", "monkeys"]);
        d.resolve(CategoryOrder::Array, Some(explicit.as_slice()));
        assert_eq!(
            d.categories(),
            labels(&["monkeys", "zebras", "giraffes", "orangutans"])
        );
        assert_eq!(d.position("zebras"), Some(1));
        assert_eq!(d.label(3), Some("orangutans"));
    }

    #[test]
    fn ascending_sort_is_stable_and_lexicographic() {
        let encounter = labels(&["b", "B", "a", "b2"]);
        let out = order_categories(&encounter, CategoryOrder::CategoryAscending, None);
        assert_eq!(out, labels(&["B", "a", "b", "b2"]));
    }

    #[test]
    fn observe_appends_only_new_labels() {
        let mut d = zoo();
        d.observe(["monkeys", "zebras", "giraffes"]);
        assert_eq!(
            d.encounter_order(),
            labels(&["giraffes", "orangutans", "monkeys", "zebras"])
        );
        assert!(d.is_empty(), "nothing resolved yet");
        d.resolve(CategoryOrder::Trace, None);
        assert_eq!(d.len(), 4);
        assert_eq!(vec![d.position("zebras")], vec![Some(3)]);
    }
}
