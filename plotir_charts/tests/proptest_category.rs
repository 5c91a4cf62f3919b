// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for category ordering.
//!
//! - Every ordering is a permutation of the encounter order (plus explicit extras for arrays).
//! - Switching to any policy and back to trace order restores every position.
//! - Resolving twice with the same inputs gives the same positions.

use std::collections::BTreeSet;

use plotir_charts::{CategoryDomain, CategoryOrder, order_categories};
use proptest::prelude::*;

fn label_strategy() -> impl Strategy<Value = String> {
    "[a-dA-D]{1,3}"
}

fn policy_strategy() -> impl Strategy<Value = CategoryOrder> {
    prop::sample::select(vec![
        CategoryOrder::Trace,
        CategoryOrder::CategoryAscending,
        CategoryOrder::CategoryDescending,
        CategoryOrder::Array,
    ])
}

fn encounter_of(labels: &[String]) -> Vec<String> {
    let mut domain = CategoryDomain::new();
    domain.observe(labels.iter().map(String::as_str));
    domain.encounter_order().to_vec()
}

proptest! {
    #[test]
    fn non_array_orders_permute_the_encounter_order(
        labels in prop::collection::vec(label_strategy(), 0..12),
        policy in policy_strategy(),
    ) {
        prop_assume!(policy != CategoryOrder::Array);
        let encounter = encounter_of(&labels);
        let ordered = order_categories(&encounter, policy, None);
        let a: BTreeSet<_> = encounter.iter().collect();
        let b: BTreeSet<_> = ordered.iter().collect();
        prop_assert_eq!(a, b);
        prop_assert_eq!(ordered.len(), encounter.len());
    }

    #[test]
    fn array_order_lists_explicit_labels_first(
        labels in prop::collection::vec(label_strategy(), 0..12),
        explicit in prop::collection::vec(label_strategy(), 1..6),
    ) {
        let encounter = encounter_of(&labels);
        let ordered =
            order_categories(&encounter, CategoryOrder::Array, Some(explicit.as_slice()));

        let mut seen = BTreeSet::new();
        let explicit_unique: Vec<&String> =
            explicit.iter().filter(|l| seen.insert(l.as_str())).collect();
        prop_assert_eq!(
            ordered.iter().take(explicit_unique.len()).collect::<Vec<_>>(),
            explicit_unique
        );
        for label in &encounter {
            prop_assert!(ordered.contains(label));
        }
        let distinct: BTreeSet<_> = ordered.iter().collect();
        prop_assert_eq!(distinct.len(), ordered.len());
    }

    #[test]
    fn reverting_to_trace_order_restores_positions(
        labels in prop::collection::vec(label_strategy(), 0..12),
        explicit in prop::collection::vec(label_strategy(), 0..4),
        policies in prop::collection::vec(policy_strategy(), 1..4),
    ) {
        let mut domain = CategoryDomain::new();
        domain.observe(labels.iter().map(String::as_str));
        domain.resolve(CategoryOrder::Trace, None);
        let before: Vec<Option<usize>> =
            labels.iter().map(|l| domain.position(l)).collect();

        for policy in policies {
            domain.resolve(policy, Some(explicit.as_slice()));
            let first = domain.categories().to_vec();
            domain.resolve(policy, Some(explicit.as_slice()));
            prop_assert_eq!(domain.categories(), first.as_slice());
        }

        domain.resolve(CategoryOrder::Trace, None);
        let after: Vec<Option<usize>> =
            labels.iter().map(|l| domain.position(l)).collect();
        prop_assert_eq!(before, after);
    }
}
