// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental scene reconciliation for `plotir`.
//!
//! Charts are described declaratively, one [`SeriesDescriptor`] per data series. Each series
//! asks for a small set of visual elements (fills, a line, markers), identified by an
//! [`ElementKey`] derived from the series' stable index and the element's [`Role`].
//!
//! On every update:
//! - [`reconcile`] compares the live keys with the freshly built descriptors and produces an
//!   ordered list of [`ElementOp`]s (create / update / destroy), and
//! - [`ElementStore`] applies them through an [`ElementHost`], keeping each surviving record
//!   (and its host node) alive across updates.
//!
//! Geometry, styling and drawing belong to the host.

#![no_std]

extern crate alloc;

mod key;
mod reconcile;
mod series;
mod store;

pub use key::{ElementKey, Role, SeriesIndex};
pub use reconcile::{ElementOp, ReconcileStats, reconcile};
pub use series::{RoleSet, SeriesDescriptor, TraceKind, Visibility};
pub use store::{ElementHandle, ElementHost, ElementRecord, ElementStore, StoreError};
