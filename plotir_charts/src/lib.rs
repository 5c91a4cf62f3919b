// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interactive chart layer on top of `plotir_core`.
//!
//! - **Traces and axes**: [`Trace`]s are lowered into `plotir_core` series descriptors;
//!   [`AxisSpec`]s resolve into [`ResolvedAxis`] values (type detection, autorange, category
//!   positions).
//! - **Category ordering**: [`CategoryOrder`] policies over a per-axis [`CategoryDomain`] that
//!   remembers encounter order, so reverting a policy restores the original positions.
//! - **Zoom**: [`ZoomDrag`] turns pointer input into overlay events and axis range commits.
//! - **Figures**: [`Figure`] ties it together and keeps host elements alive across
//!   `plot` / `restyle` / `relayout`.
//!
//! Drawing is left to the [`plotir_core::ElementHost`]; [`Figure::geometry`] gives hosts the
//! pixel shape of each element.

#![no_std]

extern crate alloc;

mod axis;
mod category;
mod figure;
mod geometry;
mod layout;
mod scale;
mod trace;
mod zoom;

pub use axis::{AxisName, AxisSpec, AxisType, ResolvedAxis};
pub use category::{CategoryDomain, CategoryOrder, order_categories};
pub use figure::{
    Figure, FigureConfig, FigureError, FigureMapping, PointerError, TraceAttr, UpdateSummary,
};
pub use geometry::{
    ElementGeometry, bar_rects, element_geometry, fill_between_path, fill_to_baseline_path,
    line_path, series_points,
};
pub use layout::{FullLayout, LayoutSpec, LayoutUpdate};
pub use scale::{ScaleLinear, extent};
pub use trace::{Fill, ScatterMode, Trace, TraceValues, fill_target, series_descriptors};
pub use zoom::{
    DragEvent, DragMode, DragState, PlotMapping, PointerInput, ZoomAxes, ZoomCommit, ZoomConfig,
    ZoomDrag, ZoomGesture, ZoomOverlay,
};
