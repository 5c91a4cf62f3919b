// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconciliation: old keyed elements + new series descriptors -> ordered operations.

extern crate alloc;

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::key::ElementKey;
use crate::series::SeriesDescriptor;

/// One element lifecycle operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementOp {
    /// No record exists for the key yet.
    Create {
        /// Element key.
        key: ElementKey,
    },
    /// The record exists and is still wanted; refresh it in place.
    Update {
        /// Element key.
        key: ElementKey,
    },
    /// The record exists but is no longer wanted.
    Destroy {
        /// Element key.
        key: ElementKey,
    },
}

impl ElementOp {
    /// The key this operation applies to.
    pub fn key(&self) -> ElementKey {
        match *self {
            Self::Create { key } | Self::Update { key } | Self::Destroy { key } => key,
        }
    }
}

/// Operation counts for one reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Number of created elements.
    pub created: usize,
    /// Number of updated elements.
    pub updated: usize,
    /// Number of destroyed elements.
    pub destroyed: usize,
}

impl ReconcileStats {
    /// Tallies a list of operations.
    pub fn from_ops(ops: &[ElementOp]) -> Self {
        let mut stats = Self::default();
        for op in ops {
            stats.record(op);
        }
        stats
    }

    pub(crate) fn record(&mut self, op: &ElementOp) {
        match op {
            ElementOp::Create { .. } => self.created += 1,
            ElementOp::Update { .. } => self.updated += 1,
            ElementOp::Destroy { .. } => self.destroyed += 1,
        }
    }
}

/// Computes the operations that turn `existing` into the elements wanted by `series`.
///
/// `existing` may be given in any order. The result is sorted by key, so operations come in
/// ascending series order and, within a series, in role paint order. A key that is both
/// existing and wanted always yields [`ElementOp::Update`].
pub fn reconcile(
    existing: impl IntoIterator<Item = ElementKey>,
    series: &[SeriesDescriptor],
) -> Vec<ElementOp> {
    let mut old: Vec<ElementKey> = existing.into_iter().collect();
    old.sort_unstable();
    old.dedup();

    let mut wanted: Vec<ElementKey> = series.iter().flat_map(|s| s.wanted_keys()).collect();
    wanted.sort_unstable();
    wanted.dedup();

    let mut ops = Vec::with_capacity(old.len().max(wanted.len()));
    let mut old_iter = old.into_iter().peekable();
    let mut new_iter = wanted.into_iter().peekable();

    loop {
        let op = match (old_iter.peek(), new_iter.peek()) {
            (None, None) => break,
            (Some(&key), None) => {
                old_iter.next();
                ElementOp::Destroy { key }
            }
            (None, Some(&key)) => {
                new_iter.next();
                ElementOp::Create { key }
            }
            (Some(&o), Some(&n)) => match o.cmp(&n) {
                Ordering::Less => {
                    old_iter.next();
                    ElementOp::Destroy { key: o }
                }
                Ordering::Greater => {
                    new_iter.next();
                    ElementOp::Create { key: n }
                }
                Ordering::Equal => {
                    old_iter.next();
                    new_iter.next();
                    ElementOp::Update { key: o }
                }
            },
        };
        ops.push(op);
    }

    #[cfg(feature = "tracing")]
    {
        let stats = ReconcileStats::from_ops(&ops);
        tracing::debug!(
            created = stats.created,
            updated = stats.updated,
            destroyed = stats.destroyed,
            "reconciled series descriptors"
        );
    }

    ops
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::key::{Role, SeriesIndex};
    use crate::series::{SeriesDescriptor, TraceKind};

    fn area(index: u32, fill: Role) -> SeriesDescriptor {
        SeriesDescriptor::new(SeriesIndex(index), TraceKind::Scatter)
            .with_role(fill)
            .with_role(Role::Line)
    }

    fn key(index: u32, role: Role) -> ElementKey {
        ElementKey::new(SeriesIndex(index), role)
    }

    #[test]
    fn first_pass_creates_in_series_then_role_order() {
        let series = [area(1, Role::FillToNext), area(0, Role::FillToZero)];
        let ops = reconcile(core::iter::empty(), &series);
        assert_eq!(
            ops,
            vec![
                ElementOp::Create { key: key(0, Role::FillToZero) },
                ElementOp::Create { key: key(0, Role::Line) },
                ElementOp::Create { key: key(1, Role::FillToNext) },
                ElementOp::Create { key: key(1, Role::Line) },
            ]
        );
    }

    #[test]
    fn surviving_keys_update_and_hidden_series_are_destroyed() {
        let existing = [
            key(1, Role::Line),
            key(0, Role::FillToZero),
            key(1, Role::FillToNext),
            key(0, Role::Line),
        ];
        let series = [
            area(0, Role::FillToZero),
            area(1, Role::FillToNext).with_visibility(false),
        ];
        let ops = reconcile(existing, &series);
        assert_eq!(
            ops,
            vec![
                ElementOp::Update { key: key(0, Role::FillToZero) },
                ElementOp::Update { key: key(0, Role::Line) },
                ElementOp::Destroy { key: key(1, Role::FillToNext) },
                ElementOp::Destroy { key: key(1, Role::Line) },
            ]
        );
    }

    #[test]
    fn dropped_role_is_destroyed_and_new_role_created() {
        let existing = [key(0, Role::FillToZero), key(0, Role::Line)];
        let series = [SeriesDescriptor::new(SeriesIndex(0), TraceKind::Scatter)
            .with_role(Role::Line)
            .with_role(Role::Markers)];
        let ops = reconcile(existing, &series);
        assert_eq!(
            ops,
            vec![
                ElementOp::Destroy { key: key(0, Role::FillToZero) },
                ElementOp::Update { key: key(0, Role::Line) },
                ElementOp::Create { key: key(0, Role::Markers) },
            ]
        );
    }

    #[test]
    fn hidden_series_without_records_emit_nothing() {
        let series = [area(4, Role::FillToZero).with_visibility(false)];
        assert!(reconcile(core::iter::empty(), &series).is_empty());
    }

    #[test]
    fn removed_series_are_destroyed() {
        let existing = [key(2, Role::Bars)];
        let ops = reconcile(existing, &[]);
        assert_eq!(ops, vec![ElementOp::Destroy { key: key(2, Role::Bars) }]);
    }

    #[test]
    fn duplicate_descriptors_create_once() {
        let series = [area(0, Role::FillToZero), area(0, Role::FillToZero)];
        let stats = ReconcileStats::from_ops(&reconcile(core::iter::empty(), &series));
        assert_eq!(
            stats,
            ReconcileStats {
                created: 2,
                updated: 0,
                destroyed: 0
            }
        );
    }
}
