// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed element store.
//!
//! Records live in a generational arena and are indexed by [`ElementKey`]. A record keeps its
//! [`ElementHandle`] (and its host node) for as long as its key keeps being wanted; once
//! destroyed, the slot's generation is bumped so a later record for the same key is
//! distinguishable from the one it replaces.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::ops::Bound;

use crate::key::{ElementKey, Role, SeriesIndex};
use crate::reconcile::{ElementOp, ReconcileStats, reconcile};
use crate::series::{SeriesDescriptor, TraceKind};

/// The rendering side of the store: creates, refreshes and drops host nodes.
///
/// Hosts receive calls in key order, which is also paint order.
pub trait ElementHost {
    /// Host node type (a retained scene node, a DOM element, an SVG fragment, ...).
    type Node;

    /// Creates the node for `key`.
    ///
    /// `before` is the node of the next existing element in key order, if any; inserting the new
    /// node before it keeps paint order consistent with descriptor order.
    fn create(
        &mut self,
        key: ElementKey,
        series: &SeriesDescriptor,
        before: Option<&Self::Node>,
    ) -> Self::Node;

    /// Refreshes geometry/style of an existing node. The node stays the same instance.
    fn update(&mut self, key: ElementKey, node: &mut Self::Node, series: &SeriesDescriptor);

    /// Drops the node for `key`.
    fn destroy(&mut self, key: ElementKey, node: Self::Node);
}

/// Errors returned when applying operations that disagree with the store contents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A create was requested for a key that already has a record.
    #[error("element {0:?} already exists")]
    DuplicateKey(ElementKey),
    /// An update or destroy was requested for a key without a record.
    #[error("element {0:?} does not exist")]
    MissingKey(ElementKey),
    /// A create or update referenced a series absent from the descriptor list.
    #[error("no descriptor for series {0:?}")]
    MissingSeries(SeriesIndex),
    /// Every `u32` slot index is in use.
    #[error("element store is full")]
    CapacityExceeded,
}

/// Stable identity of a live record.
///
/// Two handles compare equal only if they refer to the same record instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    index: u32,
    generation: u32,
}

impl ElementHandle {
    /// Arena slot index.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Slot generation at creation time.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// A live visual element.
#[derive(Clone, Debug)]
pub struct ElementRecord<N> {
    /// Identity key.
    pub key: ElementKey,
    /// Trace kind of the owning series when the record was last refreshed.
    pub kind: TraceKind,
    /// Record identity.
    pub handle: ElementHandle,
    /// Host node.
    pub node: N,
}

impl<N> ElementRecord<N> {
    /// Owning series.
    pub fn series(&self) -> SeriesIndex {
        self.key.series
    }

    /// Role within the owning series.
    pub fn role(&self) -> Role {
        self.key.role
    }
}

#[derive(Debug)]
struct Slot<N> {
    generation: u32,
    record: Option<ElementRecord<N>>,
}

/// Arena + ordered key index of live element records.
#[derive(Debug)]
pub struct ElementStore<N> {
    slots: Vec<Slot<N>>,
    free: Vec<u32>,
    index: BTreeMap<ElementKey, ElementHandle>,
}

impl<N> Default for ElementStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> ElementStore<N> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no record is alive.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if a record exists for `key`.
    pub fn contains(&self, key: ElementKey) -> bool {
        self.index.contains_key(&key)
    }

    /// Handle of the record for `key`.
    pub fn handle(&self, key: ElementKey) -> Option<ElementHandle> {
        self.index.get(&key).copied()
    }

    /// Record for `key`.
    pub fn get(&self, key: ElementKey) -> Option<&ElementRecord<N>> {
        self.resolve(self.handle(key)?)
    }

    /// Record for a handle, if that record instance is still alive.
    pub fn resolve(&self, handle: ElementHandle) -> Option<&ElementRecord<N>> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.record.as_ref()
    }

    /// Live keys in key (paint) order.
    pub fn keys(&self) -> impl Iterator<Item = ElementKey> + '_ {
        self.index.keys().copied()
    }

    /// Live records in key (paint) order.
    pub fn iter(&self) -> impl Iterator<Item = &ElementRecord<N>> + '_ {
        self.index.values().filter_map(|&h| self.resolve(h))
    }

    /// Live records owned by `series`, in role order.
    pub fn series_records(
        &self,
        series: SeriesIndex,
    ) -> impl Iterator<Item = &ElementRecord<N>> + '_ {
        let lo = ElementKey::new(series, Role::ALL[0]);
        let hi = ElementKey::new(series, Role::ALL[Role::ALL.len() - 1]);
        self.index
            .range(lo..=hi)
            .filter_map(|(_, &h)| self.resolve(h))
    }

    /// Reconciles against `series` and applies the result through `host`.
    ///
    /// Returns the applied operations.
    pub fn sync<H>(
        &mut self,
        series: &[SeriesDescriptor],
        host: &mut H,
    ) -> Result<Vec<ElementOp>, StoreError>
    where
        H: ElementHost<Node = N>,
    {
        let ops = reconcile(self.keys(), series);
        self.apply(&ops, series, host)?;
        Ok(ops)
    }

    /// Applies operations in order.
    ///
    /// On error, operations before the failing one stay applied.
    pub fn apply<H>(
        &mut self,
        ops: &[ElementOp],
        series: &[SeriesDescriptor],
        host: &mut H,
    ) -> Result<ReconcileStats, StoreError>
    where
        H: ElementHost<Node = N>,
    {
        let mut stats = ReconcileStats::default();
        for op in ops {
            match *op {
                ElementOp::Create { key } => {
                    if self.contains(key) {
                        return Err(StoreError::DuplicateKey(key));
                    }
                    let desc = find_series(series, key.series)?;
                    let index = self.reserve_slot()?;
                    let node = host.create(key, desc, self.next_node(key));
                    self.insert(index, key, desc.kind, node);
                }
                ElementOp::Update { key } => {
                    let desc = find_series(series, key.series)?;
                    let record = self.get_mut(key).ok_or(StoreError::MissingKey(key))?;
                    record.kind = desc.kind;
                    host.update(key, &mut record.node, desc);
                }
                ElementOp::Destroy { key } => {
                    let record = self.remove(key).ok_or(StoreError::MissingKey(key))?;
                    host.destroy(key, record.node);
                }
            }
            stats.record(op);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            created = stats.created,
            updated = stats.updated,
            destroyed = stats.destroyed,
            live = self.len(),
            "applied element ops"
        );

        Ok(stats)
    }

    /// Destroys every record (graph teardown).
    pub fn clear<H>(&mut self, host: &mut H) -> usize
    where
        H: ElementHost<Node = N>,
    {
        let keys: Vec<ElementKey> = self.keys().collect();
        let count = keys.len();
        for key in keys {
            if let Some(record) = self.remove(key) {
                host.destroy(key, record.node);
            }
        }
        count
    }

    fn next_node(&self, key: ElementKey) -> Option<&N> {
        let (_, &h) = self
            .index
            .range((Bound::Excluded(key), Bound::Unbounded))
            .next()?;
        self.resolve(h).map(|r| &r.node)
    }

    fn get_mut(&mut self, key: ElementKey) -> Option<&mut ElementRecord<N>> {
        let handle = self.handle(key)?;
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.record.as_mut()
    }

    fn reserve_slot(&mut self) -> Result<u32, StoreError> {
        if let Some(&index) = self.free.last() {
            return Ok(index);
        }
        let index = slot_index(self.slots.len())?;
        self.slots.push(Slot {
            generation: 0,
            record: None,
        });
        self.free.push(index);
        Ok(index)
    }

    fn insert(&mut self, index: u32, key: ElementKey, kind: TraceKind, node: N) -> ElementHandle {
        if self.free.last() == Some(&index) {
            self.free.pop();
        }
        let slot = &mut self.slots[index as usize];
        let handle = ElementHandle {
            index,
            generation: slot.generation,
        };
        slot.record = Some(ElementRecord {
            key,
            kind,
            handle,
            node,
        });
        self.index.insert(key, handle);
        handle
    }

    fn remove(&mut self, key: ElementKey) -> Option<ElementRecord<N>> {
        let handle = self.index.remove(&key)?;
        let slot = self.slots.get_mut(handle.index as usize)?;
        let record = slot.record.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Some(record)
    }
}

fn find_series(
    series: &[SeriesDescriptor],
    index: SeriesIndex,
) -> Result<&SeriesDescriptor, StoreError> {
    // Descriptors are normally laid out by index.
    if let Some(desc) = series.get(index.position())
        && desc.index == index
    {
        return Ok(desc);
    }
    series
        .iter()
        .find(|s| s.index == index)
        .ok_or(StoreError::MissingSeries(index))
}

fn slot_index(len: usize) -> Result<u32, StoreError> {
    u32::try_from(len).map_err(|_| StoreError::CapacityExceeded)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use std::format;

    use super::*;
    use crate::series::Visibility;

    /// Host that hands out unique node ids and logs calls.
    #[derive(Debug, Default)]
    struct LogHost {
        next: u64,
        log: Vec<String>,
    }

    impl ElementHost for LogHost {
        type Node = u64;

        fn create(
            &mut self,
            key: ElementKey,
            _series: &SeriesDescriptor,
            before: Option<&u64>,
        ) -> u64 {
            self.next += 1;
            self.log.push(format!(
                "create {}:{} before {:?}",
                key.series.0,
                key.role.class_name(),
                before
            ));
            self.next
        }

        fn update(&mut self, key: ElementKey, node: &mut u64, _series: &SeriesDescriptor) {
            self.log
                .push(format!("update {}:{} #{node}", key.series.0, key.role.class_name()));
        }

        fn destroy(&mut self, key: ElementKey, node: u64) {
            self.log
                .push(format!("destroy {}:{} #{node}", key.series.0, key.role.class_name()));
        }
    }

    fn scatter(index: u32, fill: Role, visible: bool) -> SeriesDescriptor {
        SeriesDescriptor::new(SeriesIndex(index), TraceKind::Scatter)
            .with_role(fill)
            .with_role(Role::Line)
            .with_visibility(visible)
    }

    #[test]
    fn slot_indices_past_u32_are_rejected() {
        assert_eq!(slot_index(7), Ok(7));
        assert_eq!(slot_index(u32::MAX as usize), Ok(u32::MAX));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            slot_index(u32::MAX as usize + 1),
            Err(StoreError::CapacityExceeded)
        );
    }

    #[test]
    fn freed_slots_are_reused_with_a_new_generation() {
        let mut store = ElementStore::new();
        let mut host = LogHost::default();
        let key = ElementKey::new(SeriesIndex(0), Role::Line);
        let line = [SeriesDescriptor::new(SeriesIndex(0), TraceKind::Scatter).with_role(Role::Line)];

        store.sync(&line, &mut host).unwrap();
        let first = store.handle(key).unwrap();
        store.sync(&[], &mut host).unwrap();
        store.sync(&line, &mut host).unwrap();
        let second = store.handle(key).unwrap();

        assert_eq!(second.index(), first.index());
        assert_ne!(second.generation(), first.generation());
        assert!(store.resolve(first).is_none());
    }

    #[test]
    fn surviving_records_keep_handles_and_nodes() {
        let mut store = ElementStore::new();
        let mut host = LogHost::default();

        let both = [
            scatter(0, Role::FillToZero, true),
            scatter(1, Role::FillToNext, true),
        ];
        store.sync(&both, &mut host).unwrap();
        assert_eq!(store.len(), 4);

        let a_fill = ElementKey::new(SeriesIndex(0), Role::FillToZero);
        let b_fill = ElementKey::new(SeriesIndex(1), Role::FillToNext);
        let a_before = store.handle(a_fill).unwrap();
        let b_before = store.handle(b_fill).unwrap();
        let a_node = store.get(a_fill).unwrap().node;

        let hidden = [
            scatter(0, Role::FillToZero, true),
            scatter(1, Role::FillToNext, false),
        ];
        store.sync(&hidden, &mut host).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.resolve(b_before).map(|r| r.key), None);

        store.sync(&both, &mut host).unwrap();
        assert_eq!(store.handle(a_fill), Some(a_before));
        assert_eq!(store.get(a_fill).unwrap().node, a_node);
        assert_ne!(store.handle(b_fill), Some(b_before));
    }

    #[test]
    fn creates_pass_next_sibling_for_ordered_insertion() {
        let mut store = ElementStore::new();
        let mut host = LogHost::default();
        let series = [
            scatter(0, Role::FillToZero, false),
            scatter(1, Role::FillToNext, true),
        ];
        store.sync(&series, &mut host).unwrap();
        host.log.clear();

        let series = [
            scatter(0, Role::FillToZero, true),
            scatter(1, Role::FillToNext, true),
        ];
        store.sync(&series, &mut host).unwrap();
        assert_eq!(
            host.log,
            vec![
                "create 0:fill-tozero before Some(1)",
                "create 0:line before Some(1)",
                "update 1:fill-tonext #1",
                "update 1:line #2",
            ]
        );
    }

    #[test]
    fn hiding_everything_twice_converges_to_empty() {
        let mut store = ElementStore::new();
        let mut host = LogHost::default();
        store
            .sync(&[scatter(0, Role::FillToZero, true)], &mut host)
            .unwrap();

        let hidden = [scatter(0, Role::FillToZero, false)];
        let first = store.sync(&hidden, &mut host).unwrap();
        let second = store.sync(&hidden, &mut host).unwrap();
        assert_eq!(first.len(), 2);
        assert!(second.is_empty(), "second pass has nothing left to do");
        assert!(store.is_empty());
    }

    #[test]
    fn apply_rejects_ops_that_disagree_with_contents() {
        let mut store: ElementStore<u64> = ElementStore::new();
        let mut host = LogHost::default();
        let key = ElementKey::new(SeriesIndex(0), Role::Line);
        let series = [scatter(0, Role::FillToZero, true)];

        let err = store
            .apply(&[ElementOp::Update { key }], &series, &mut host)
            .unwrap_err();
        assert_eq!(err, StoreError::MissingKey(key));

        store
            .apply(&[ElementOp::Create { key }], &series, &mut host)
            .unwrap();
        let err = store
            .apply(&[ElementOp::Create { key }], &series, &mut host)
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateKey(key));

        let other = ElementKey::new(SeriesIndex(9), Role::Line);
        let err = store
            .apply(&[ElementOp::Create { key: other }], &series, &mut host)
            .unwrap_err();
        assert_eq!(err, StoreError::MissingSeries(SeriesIndex(9)));
    }

    #[test]
    fn series_records_are_scoped_to_one_series() {
        let mut store = ElementStore::new();
        let mut host = LogHost::default();
        let series = [
            scatter(0, Role::FillToZero, true),
            scatter(1, Role::FillToNext, true),
            SeriesDescriptor::new(SeriesIndex(2), TraceKind::Bar)
                .with_role(Role::Bars)
                .with_visibility(Visibility::Visible),
        ];
        store.sync(&series, &mut host).unwrap();
        let roles: Vec<Role> = store.series_records(SeriesIndex(1)).map(|r| r.role()).collect();
        assert_eq!(roles, vec![Role::FillToNext, Role::Line]);
        assert_eq!(store.series_records(SeriesIndex(2)).count(), 1);
    }

    #[test]
    fn clear_destroys_every_record() {
        let mut store = ElementStore::new();
        let mut host = LogHost::default();
        store
            .sync(&[scatter(0, Role::FillToZero, true)], &mut host)
            .unwrap();
        assert_eq!(store.clear(&mut host), 2);
        assert!(store.is_empty());
        assert_eq!(store.keys().count(), 0);
    }
}
