// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The update orchestrator.
//!
//! A [`Figure`] owns the traces, the authored and resolved layout, the element store and the
//! zoom gesture. Every update (`plot`, `restyle`, `relayout`, a zoom commit) rebuilds the
//! series descriptors, re-resolves the axes and reconciles the element store against the
//! host. Calls run to completion before returning; `&mut self` keeps them from overlapping.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;
use plotir_core::{
    ElementHost, ElementKey, ElementOp, ElementStore, ReconcileStats, StoreError, Visibility,
};

use crate::geometry::{ElementGeometry, element_geometry};
use crate::layout::{FullLayout, LayoutSpec, LayoutUpdate};
use crate::scale::ScaleLinear;
use crate::trace::{Fill, ScatterMode, Trace, series_descriptors};
use crate::zoom::{
    DragEvent, DragMode, PlotMapping, PointerInput, ZoomCommit, ZoomConfig, ZoomDrag,
};

/// Figure-wide settings.
#[derive(Clone, Debug)]
pub struct FigureConfig {
    /// Plot area in device pixels.
    pub plot: Rect,
    /// Zoom overlay settings.
    pub zoom: ZoomConfig,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            plot: Rect::new(80.0, 100.0, 620.0, 370.0),
            zoom: ZoomConfig::default(),
        }
    }
}

impl FigureConfig {
    /// Sets the plot area.
    pub fn with_plot(mut self, plot: Rect) -> Self {
        self.plot = plot;
        self
    }

    /// Sets the zoom settings.
    pub fn with_zoom(mut self, zoom: ZoomConfig) -> Self {
        self.zoom = zoom;
        self
    }
}

/// A per-trace attribute for `restyle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceAttr {
    /// `visible`.
    Visible(Visibility),
    /// `mode` (scatter only).
    Mode(ScatterMode),
    /// `fill` (scatter only).
    Fill(Fill),
}

impl TraceAttr {
    fn apply(self, trace: &mut Trace) {
        match self {
            Self::Visible(v) => trace.visible = v,
            Self::Mode(m) => trace.mode = m,
            Self::Fill(f) => trace.fill = f,
        }
    }
}

/// Errors from figure updates. The figure is left unchanged unless noted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FigureError {
    /// A restyle targeted a trace that does not exist.
    #[error("trace index {index} out of range ({len} traces)")]
    TraceIndex {
        /// Requested index.
        index: usize,
        /// Number of traces.
        len: usize,
    },
    /// A per-trace restyle was given no values.
    #[error("restyle needs at least one value")]
    EmptyValues,
    /// The element store rejected an operation. Earlier operations of the pass stay applied.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A zoom commit could not be applied. The gesture has still finished.
#[derive(Debug, Clone, thiserror::Error)]
#[error("zoom commit failed: {source}")]
pub struct PointerError {
    /// Events of the input, overlay removal included.
    pub events: Vec<DragEvent>,
    /// Why the commit failed.
    #[source]
    pub source: FigureError,
}

/// What an update did to the element store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Applied operations, in key order.
    pub ops: Vec<ElementOp>,
    /// Operation counts.
    pub stats: ReconcileStats,
}

/// Pixel to data mapping over the resolved axes of a figure.
#[derive(Clone, Copy, Debug)]
pub struct FigureMapping {
    plot: Rect,
    x: ScaleLinear,
    y: ScaleLinear,
}

impl PlotMapping for FigureMapping {
    fn plot_area(&self) -> Rect {
        self.plot
    }

    fn x_to_data(&self, px: f64) -> f64 {
        self.x.invert(px)
    }

    fn y_to_data(&self, py: f64) -> f64 {
        self.y.invert(py)
    }
}

/// An interactive chart bound to an [`ElementHost`].
pub struct Figure<H: ElementHost> {
    config: FigureConfig,
    host: H,
    traces: Vec<Trace>,
    layout: LayoutSpec,
    full_layout: FullLayout,
    store: ElementStore<H::Node>,
    drag: ZoomDrag,
}

impl<H> fmt::Debug for Figure<H>
where
    H: ElementHost + fmt::Debug,
    H::Node: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Figure")
            .field("config", &self.config)
            .field("host", &self.host)
            .field("traces", &self.traces)
            .field("layout", &self.layout)
            .field("full_layout", &self.full_layout)
            .field("store", &self.store)
            .field("drag", &self.drag)
            .finish()
    }
}

impl<H: ElementHost> Figure<H> {
    /// Creates an empty figure.
    pub fn new(host: H, config: FigureConfig) -> Self {
        let layout = LayoutSpec::default();
        let full_layout = FullLayout::resolve(&layout, &[], None);
        let drag = ZoomDrag::new(config.zoom.clone());
        Self {
            config,
            host,
            traces: Vec::new(),
            layout,
            full_layout,
            store: ElementStore::new(),
            drag,
        }
    }

    /// Replaces traces and layout.
    ///
    /// Category encounter orders start over from the new data.
    pub fn plot(
        &mut self,
        traces: Vec<Trace>,
        layout: LayoutSpec,
    ) -> Result<UpdateSummary, FigureError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(traces = traces.len(), "plot");

        self.drag.cancel();
        self.traces = traces;
        self.layout = layout;
        self.refresh(false)
    }

    /// Sets one attribute on the `targets` traces (all traces for `None`).
    pub fn restyle(
        &mut self,
        attr: TraceAttr,
        targets: Option<&[usize]>,
    ) -> Result<UpdateSummary, FigureError> {
        self.restyle_each(&[attr], targets)
    }

    /// Sets `values[i % values.len()]` on the `i`-th target trace.
    pub fn restyle_each(
        &mut self,
        values: &[TraceAttr],
        targets: Option<&[usize]>,
    ) -> Result<UpdateSummary, FigureError> {
        if values.is_empty() {
            return Err(FigureError::EmptyValues);
        }
        let targets: Vec<usize> = match targets {
            Some(t) => t.to_vec(),
            None => (0..self.traces.len()).collect(),
        };
        let len = self.traces.len();
        if let Some(&index) = targets.iter().find(|&&i| i >= len) {
            return Err(FigureError::TraceIndex { index, len });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(?values, ?targets, "restyle");

        for (i, &index) in targets.iter().enumerate() {
            if let Some(trace) = self.traces.get_mut(index) {
                values[i % values.len()].apply(trace);
            }
        }
        self.refresh(true)
    }

    /// Applies layout updates, then re-resolves and re-syncs.
    ///
    /// Switching away from [`DragMode::Zoom`] cancels an active gesture.
    pub fn relayout(&mut self, updates: &[LayoutUpdate]) -> Result<UpdateSummary, FigureError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(?updates, "relayout");

        for update in updates {
            self.layout.apply(update);
        }
        if self.layout.drag_mode != DragMode::Zoom {
            self.drag.cancel();
        }
        self.refresh(true)
    }

    /// Dispatches a pointer input to the zoom gesture.
    ///
    /// A commit is applied as a range relayout before returning. If that fails, the error
    /// still carries the input's events. With [`DragMode::Off`] input is ignored.
    pub fn pointer(&mut self, input: PointerInput) -> Result<Vec<DragEvent>, PointerError> {
        if self.layout.drag_mode != DragMode::Zoom {
            return Ok(Vec::new());
        }
        let mapping = self.mapping();
        let events = self.drag.handle(input, &mapping);
        apply_commits(events, |commit| {
            self.relayout(&commit.updates()).map(|_| ())
        })
    }

    /// Switches the drag mode, cancelling any active gesture.
    ///
    /// Returns the cancellation events.
    pub fn set_drag_mode(&mut self, mode: DragMode) -> Vec<DragEvent> {
        self.layout.drag_mode = mode;
        self.full_layout.drag_mode = mode;
        self.drag.cancel()
    }

    /// Tears the figure down: destroys every element and forgets traces and layout.
    ///
    /// Returns the number of destroyed elements.
    pub fn purge(&mut self) -> usize {
        self.drag.cancel();
        let destroyed = self.store.clear(&mut self.host);
        self.traces.clear();
        self.layout = LayoutSpec::default();
        self.full_layout = FullLayout::resolve(&self.layout, &[], None);

        #[cfg(feature = "tracing")]
        tracing::debug!(destroyed, "purged figure");

        destroyed
    }

    /// Authored layout, as last set.
    pub fn layout(&self) -> &LayoutSpec {
        &self.layout
    }

    /// Resolved layout.
    pub fn full_layout(&self) -> &FullLayout {
        &self.full_layout
    }

    /// Current traces.
    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    /// Live element records.
    pub fn store(&self) -> &ElementStore<H::Node> {
        &self.store
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The zoom gesture.
    pub fn drag(&self) -> &ZoomDrag {
        &self.drag
    }

    /// Settings.
    pub fn config(&self) -> &FigureConfig {
        &self.config
    }

    /// Pixel to data mapping over the current axes.
    pub fn mapping(&self) -> FigureMapping {
        FigureMapping {
            plot: self.config.plot,
            x: self.full_layout.xaxis.scale(self.config.plot),
            y: self.full_layout.yaxis.scale(self.config.plot),
        }
    }

    /// Pixel geometry for the element `key`.
    pub fn geometry(&self, key: ElementKey) -> Option<ElementGeometry> {
        element_geometry(&self.traces, &self.full_layout, self.config.plot, key)
    }

    fn refresh(&mut self, keep_categories: bool) -> Result<UpdateSummary, FigureError> {
        let previous = keep_categories.then_some(&self.full_layout);
        let full_layout = FullLayout::resolve(&self.layout, &self.traces, previous);
        self.full_layout = full_layout;

        let series = series_descriptors(&self.traces);
        let ops = self.store.sync(&series, &mut self.host)?;
        let stats = ReconcileStats::from_ops(&ops);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            created = stats.created,
            updated = stats.updated,
            destroyed = stats.destroyed,
            live = self.store.len(),
            "figure synced"
        );

        Ok(UpdateSummary { ops, stats })
    }
}

fn apply_commits(
    events: Vec<DragEvent>,
    mut apply: impl FnMut(&ZoomCommit) -> Result<(), FigureError>,
) -> Result<Vec<DragEvent>, PointerError> {
    let commits: Vec<ZoomCommit> = events
        .iter()
        .filter_map(|e| match e {
            DragEvent::Committed(c) => Some(*c),
            _ => None,
        })
        .collect();
    for commit in &commits {
        if let Err(source) = apply(commit) {
            #[cfg(feature = "tracing")]
            tracing::warn!(%source, "zoom commit failed");
            return Err(PointerError { events, source });
        }
    }
    Ok(events)
}
