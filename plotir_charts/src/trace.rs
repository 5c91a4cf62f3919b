// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace descriptions and their lowering into series descriptors.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use plotir_core::{Role, SeriesDescriptor, SeriesIndex, TraceKind, Visibility};

/// Values along one trace dimension.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceValues {
    /// Numeric values.
    Numbers(Vec<f64>),
    /// Category labels.
    Labels(Vec<String>),
}

impl Default for TraceValues {
    fn default() -> Self {
        Self::Numbers(Vec::new())
    }
}

impl TraceValues {
    /// Convenience for label values.
    pub fn labels<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self::Labels(labels.into_iter().map(Into::into).collect())
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            Self::Numbers(v) => v.len(),
            Self::Labels(v) => v.len(),
        }
    }

    /// Returns `true` if there are no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for label values.
    pub fn is_labels(&self) -> bool {
        matches!(self, Self::Labels(_))
    }
}

impl From<Vec<f64>> for TraceValues {
    fn from(value: Vec<f64>) -> Self {
        Self::Numbers(value)
    }
}

/// Drawing mode of a scatter trace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScatterMode {
    /// Connecting line only.
    #[default]
    Lines,
    /// Point markers only.
    Markers,
    /// Line and markers.
    LinesMarkers,
    /// Neither; only a fill (if any) is drawn.
    None,
}

impl ScatterMode {
    /// Returns `true` if the mode draws a line.
    pub fn has_lines(self) -> bool {
        matches!(self, Self::Lines | Self::LinesMarkers)
    }

    /// Returns `true` if the mode draws markers.
    pub fn has_markers(self) -> bool {
        matches!(self, Self::Markers | Self::LinesMarkers)
    }
}

/// Fill mode of a scatter trace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Fill {
    /// No fill.
    #[default]
    None,
    /// Fill down to `y = 0`.
    ToZeroY,
    /// Fill down to the previous visible scatter trace.
    ToNextY,
}

/// One data trace.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trace {
    /// Trace kind.
    pub kind: TraceKind,
    /// Optional display name.
    pub name: Option<String>,
    /// Values along x.
    pub x: TraceValues,
    /// Values along y.
    pub y: TraceValues,
    /// Drawing mode (scatter only).
    pub mode: ScatterMode,
    /// Fill mode (scatter only).
    pub fill: Fill,
    /// Visibility.
    pub visible: Visibility,
}

impl Trace {
    /// A scatter trace drawn as a line.
    pub fn scatter(x: impl Into<TraceValues>, y: impl Into<TraceValues>) -> Self {
        Self {
            kind: TraceKind::Scatter,
            x: x.into(),
            y: y.into(),
            ..Self::default()
        }
    }

    /// A bar trace.
    pub fn bar(x: impl Into<TraceValues>, y: impl Into<TraceValues>) -> Self {
        Self {
            kind: TraceKind::Bar,
            x: x.into(),
            y: y.into(),
            ..Self::default()
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the scatter mode.
    pub fn with_mode(mut self, mode: ScatterMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the fill mode.
    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    /// Sets the visibility.
    pub fn with_visible(mut self, visible: impl Into<Visibility>) -> Self {
        self.visible = visible.into();
        self
    }

    /// Number of points (the shorter of the two dimensions).
    pub fn len(&self) -> usize {
        self.x.len().min(self.y.len())
    }

    /// Returns `true` if the trace has no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds one descriptor per trace, in input order.
///
/// A `ToNextY` fill on the first rendered scatter trace has nothing to fill to and becomes a
/// to-zero fill. Hidden traces get descriptors too, so their indices stay stable.
pub fn series_descriptors(traces: &[Trace]) -> Vec<SeriesDescriptor> {
    let mut out = Vec::with_capacity(traces.len());
    let mut has_previous_scatter = false;

    for (i, trace) in traces.iter().enumerate() {
        let mut d = SeriesDescriptor::new(SeriesIndex::from_position(i), trace.kind)
            .with_visibility(trace.visible);
        match trace.kind {
            TraceKind::Scatter => {
                match trace.fill {
                    Fill::None => {}
                    Fill::ToZeroY => d.insert_role(Role::FillToZero),
                    Fill::ToNextY if has_previous_scatter => d.insert_role(Role::FillToNext),
                    Fill::ToNextY => d.insert_role(Role::FillToZero),
                }
                if trace.mode.has_lines() {
                    d.insert_role(Role::Line);
                }
                if trace.mode.has_markers() {
                    d.insert_role(Role::Markers);
                }
                if trace.visible.is_rendered() {
                    has_previous_scatter = true;
                }
            }
            TraceKind::Bar => d.insert_role(Role::Bars),
        }
        out.push(d);
    }

    out
}

/// Index of the scatter trace a `ToNextY` fill of `traces[index]` fills down to.
///
/// This is the closest rendered scatter trace before `index`.
pub fn fill_target(traces: &[Trace], index: usize) -> Option<usize> {
    traces
        .get(..index)?
        .iter()
        .rposition(|t| t.kind == TraceKind::Scatter && t.visible.is_rendered())
}
