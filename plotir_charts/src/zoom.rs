// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-to-zoom interaction.
//!
//! [`ZoomDrag`] is a small state machine fed with [`PointerInput`]s. Every input returns the
//! [`DragEvent`]s it produced; a released gesture with a valid box yields a
//! [`DragEvent::Committed`] carrying data-space axis ranges.
//!
//! The overlay (shaded zoom box plus corner handles) exists only between the first move of a
//! gesture and its release or cancellation.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{BezPath, Point, Rect, Shape};
use peniko::Brush;
use peniko::color::palette::css;
use smallvec::SmallVec;

use crate::axis::AxisName;
use crate::layout::LayoutUpdate;

/// Curve tolerance used when flattening rectangles into paths.
const PATH_TOLERANCE: f64 = 0.1;

/// What a pointer drag over the plot area does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragMode {
    /// Drag a box to zoom.
    #[default]
    Zoom,
    /// Pointer drags are ignored.
    Off,
}

/// Pixel to data conversion for the plot area a gesture runs over.
pub trait PlotMapping {
    /// Plot area in device pixels.
    fn plot_area(&self) -> Rect;
    /// Data-space x coordinate of a pixel column.
    fn x_to_data(&self, px: f64) -> f64;
    /// Data-space y coordinate of a pixel row.
    fn y_to_data(&self, py: f64) -> f64;
}

/// Raw pointer input, in device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    /// Button pressed.
    Down(Point),
    /// Pointer moved.
    Move(Point),
    /// Button released.
    Up(Point),
}

/// Thresholds and paint for the zoom overlay.
#[derive(Clone, Debug)]
pub struct ZoomConfig {
    /// Minimum span in pixels for an axis to take part in the zoom.
    pub min_drag: f64,
    /// Length of the corner handle strokes.
    pub corner_size: f64,
    /// Paint for the area outside the zoom box.
    pub shade: Brush,
    /// Stroke paint for the corner handles.
    pub corner_stroke: Brush,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_drag: 8.0,
            corner_size: 8.0,
            shade: Brush::Solid(css::BLACK.with_alpha(0.2)),
            corner_stroke: Brush::Solid(css::BLACK),
        }
    }
}

impl ZoomConfig {
    /// Sets the minimum drag span.
    pub fn with_min_drag(mut self, min_drag: f64) -> Self {
        self.min_drag = min_drag.max(0.0);
        self
    }

    /// Sets the corner handle length.
    pub fn with_corner_size(mut self, corner_size: f64) -> Self {
        self.corner_size = corner_size.max(0.0);
        self
    }

    /// Sets the shade paint.
    pub fn with_shade(mut self, shade: impl Into<Brush>) -> Self {
        self.shade = shade.into();
        self
    }

    /// Sets the corner handle paint.
    pub fn with_corner_stroke(mut self, stroke: impl Into<Brush>) -> Self {
        self.corner_stroke = stroke.into();
        self
    }
}

/// Axes a zoom box applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZoomAxes {
    /// Both axes.
    Xy,
    /// Horizontal only; the box spans the full plot height.
    X,
    /// Vertical only; the box spans the full plot width.
    Y,
}

impl ZoomAxes {
    /// Classifies a drag from `origin` to `current` inside `plot`.
    ///
    /// Returns `None` when both spans are below `min_drag`. A zero span never counts, even
    /// with a `min_drag` of zero.
    pub fn classify(origin: Point, current: Point, min_drag: f64) -> Option<Self> {
        let dx = (current.x - origin.x).abs();
        let dy = (current.y - origin.y).abs();
        let passes = |d: f64| d > 0.0 && d >= min_drag;
        match (passes(dx), passes(dy)) {
            (true, true) => Some(Self::Xy),
            (true, false) => Some(Self::X),
            (false, true) => Some(Self::Y),
            (false, false) => None,
        }
    }

    /// Box for `axes` between two clamped points.
    pub fn zoom_box(self, origin: Point, current: Point, plot: Rect) -> Rect {
        let r = Rect::from_points(origin, current).abs();
        match self {
            Self::Xy => r,
            Self::X => Rect::new(r.x0, plot.y0, r.x1, plot.y1),
            Self::Y => Rect::new(plot.x0, r.y0, plot.x1, r.y1),
        }
    }
}

/// Overlay geometry for the current zoom box.
#[derive(Clone, Debug)]
pub struct ZoomOverlay {
    /// Zoom box; zero-sized at the origin while hidden.
    pub rect: Rect,
    /// Axes the box applies to; `None` while hidden.
    pub axes: Option<ZoomAxes>,
    /// Plot area with the box cut out (fill with the even-odd rule).
    pub shade: BezPath,
    /// Corner handle strokes; empty while hidden.
    pub corners: BezPath,
}

impl ZoomOverlay {
    fn new(origin: Point, current: Point, plot: Rect, config: &ZoomConfig) -> Self {
        let axes = ZoomAxes::classify(origin, current, config.min_drag);
        let rect = match axes {
            Some(axes) => axes.zoom_box(origin, current, plot),
            None => Rect::from_points(origin, origin),
        };

        let mut shade = plot.to_path(PATH_TOLERANCE);
        if axes.is_some() {
            shade.extend(rect.path_elements(PATH_TOLERANCE));
        }

        let corners = match axes {
            Some(axes) => corner_path(axes, rect, origin, config.corner_size),
            None => BezPath::new(),
        };

        Self {
            rect,
            axes,
            shade,
            corners,
        }
    }

    /// Returns `true` if the box is too small to zoom.
    pub fn is_hidden(&self) -> bool {
        self.axes.is_none()
    }
}

fn corner_path(axes: ZoomAxes, r: Rect, origin: Point, size: f64) -> BezPath {
    let mut p = BezPath::new();
    match axes {
        ZoomAxes::Xy => {
            let cx = size.min(r.width() / 2.0);
            let cy = size.min(r.height() / 2.0);
            for (x, y, sx, sy) in [
                (r.x0, r.y0, 1.0, 1.0),
                (r.x1, r.y0, -1.0, 1.0),
                (r.x1, r.y1, -1.0, -1.0),
                (r.x0, r.y1, 1.0, -1.0),
            ] {
                p.move_to((x + sx * cx, y));
                p.line_to((x, y));
                p.line_to((x, y + sy * cy));
            }
        }
        // Brackets on the moving edges, centered on the gesture origin.
        ZoomAxes::X => {
            for (x, sx) in [(r.x0, -1.0), (r.x1, 1.0)] {
                p.move_to((x, origin.y - size));
                p.line_to((x + sx * size / 2.0, origin.y - size));
                p.line_to((x + sx * size / 2.0, origin.y + size));
                p.line_to((x, origin.y + size));
            }
        }
        ZoomAxes::Y => {
            for (y, sy) in [(r.y0, -1.0), (r.y1, 1.0)] {
                p.move_to((origin.x - size, y));
                p.line_to((origin.x - size, y + sy * size / 2.0));
                p.line_to((origin.x + size, y + sy * size / 2.0));
                p.line_to((origin.x + size, y));
            }
        }
    }
    p
}

/// A gesture in progress.
#[derive(Clone, Debug)]
pub struct ZoomGesture {
    origin: Point,
    current: Point,
    overlay: Option<ZoomOverlay>,
}

impl ZoomGesture {
    /// Clamped pointer-down position.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Clamped latest pointer position.
    pub fn current(&self) -> Point {
        self.current
    }

    /// The overlay, once the first move arrived.
    pub fn overlay(&self) -> Option<&ZoomOverlay> {
        self.overlay.as_ref()
    }
}

/// State of a [`ZoomDrag`].
#[derive(Clone, Debug, Default)]
pub enum DragState {
    /// No gesture.
    #[default]
    Idle,
    /// Button held.
    Dragging(ZoomGesture),
}

/// Data-space ranges produced by a finished zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomCommit {
    /// New x range (`min <= max`), if the zoom applies to x.
    pub x: Option<(f64, f64)>,
    /// New y range (`min <= max`), if the zoom applies to y.
    pub y: Option<(f64, f64)>,
}

impl ZoomCommit {
    /// The commit as layout range updates.
    pub fn updates(&self) -> SmallVec<[LayoutUpdate; 2]> {
        let mut out = SmallVec::new();
        if let Some(range) = self.x {
            out.push(LayoutUpdate::AxisRange {
                axis: AxisName::X,
                range,
            });
        }
        if let Some(range) = self.y {
            out.push(LayoutUpdate::AxisRange {
                axis: AxisName::Y,
                range,
            });
        }
        out
    }
}

/// Output of [`ZoomDrag`] transitions.
#[derive(Clone, Debug)]
pub enum DragEvent {
    /// The overlay appeared.
    OverlayCreated(ZoomOverlay),
    /// The overlay changed.
    OverlayUpdated(ZoomOverlay),
    /// The overlay went away.
    OverlayRemoved,
    /// A gesture finished with a valid box.
    Committed(ZoomCommit),
    /// A gesture was abandoned without a commit.
    Cancelled,
}

/// Drag-to-zoom state machine.
#[derive(Clone, Debug, Default)]
pub struct ZoomDrag {
    config: ZoomConfig,
    state: DragState,
}

impl ZoomDrag {
    /// Creates an idle state machine.
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            config,
            state: DragState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Returns `true` while a gesture is active.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// The live overlay, if any.
    pub fn overlay(&self) -> Option<&ZoomOverlay> {
        match &self.state {
            DragState::Dragging(g) => g.overlay(),
            DragState::Idle => None,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    /// Feeds one pointer input.
    pub fn handle(&mut self, input: PointerInput, mapping: &impl PlotMapping) -> Vec<DragEvent> {
        let plot = mapping.plot_area();
        let mut events = Vec::new();
        match input {
            PointerInput::Down(p) => {
                if self.is_dragging() {
                    self.abandon(&mut events);
                }
                let origin = clamp(p, plot);
                #[cfg(feature = "tracing")]
                tracing::trace!(x = origin.x, y = origin.y, "zoom gesture started");
                self.state = DragState::Dragging(ZoomGesture {
                    origin,
                    current: origin,
                    overlay: None,
                });
            }
            PointerInput::Move(p) => {
                if let DragState::Dragging(g) = &mut self.state {
                    g.current = clamp(p, plot);
                    let overlay = ZoomOverlay::new(g.origin, g.current, plot, &self.config);
                    let event = if g.overlay.is_some() {
                        DragEvent::OverlayUpdated(overlay.clone())
                    } else {
                        DragEvent::OverlayCreated(overlay.clone())
                    };
                    g.overlay = Some(overlay);
                    events.push(event);
                }
            }
            PointerInput::Up(p) => {
                if let DragState::Dragging(g) = core::mem::take(&mut self.state) {
                    if g.overlay.is_some() {
                        events.push(DragEvent::OverlayRemoved);
                    }
                    let current = clamp(p, plot);
                    match ZoomAxes::classify(g.origin, current, self.config.min_drag) {
                        Some(axes) => {
                            let zoomed = axes.zoom_box(g.origin, current, plot);
                            let commit = zoom_commit(axes, zoomed, mapping);
                            #[cfg(feature = "tracing")]
                            tracing::debug!(?axes, x = ?commit.x, y = ?commit.y, "zoom committed");
                            events.push(DragEvent::Committed(commit));
                        }
                        None => {
                            #[cfg(feature = "tracing")]
                            tracing::trace!("zoom box too small, no commit");
                        }
                    }
                }
            }
        }
        events
    }

    /// Abandons an active gesture without committing.
    pub fn cancel(&mut self) -> Vec<DragEvent> {
        let mut events = Vec::new();
        self.abandon(&mut events);
        events
    }

    fn abandon(&mut self, events: &mut Vec<DragEvent>) {
        if let DragState::Dragging(g) = core::mem::take(&mut self.state) {
            if g.overlay.is_some() {
                events.push(DragEvent::OverlayRemoved);
            }
            events.push(DragEvent::Cancelled);
            #[cfg(feature = "tracing")]
            tracing::trace!("zoom gesture cancelled");
        }
    }
}

fn clamp(p: Point, plot: Rect) -> Point {
    Point::new(
        p.x.clamp(plot.x0.min(plot.x1), plot.x0.max(plot.x1)),
        p.y.clamp(plot.y0.min(plot.y1), plot.y0.max(plot.y1)),
    )
}

fn zoom_commit(axes: ZoomAxes, r: Rect, mapping: &impl PlotMapping) -> ZoomCommit {
    let ordered = |a: f64, b: f64| if a <= b { (a, b) } else { (b, a) };
    let x = ordered(mapping.x_to_data(r.x0), mapping.x_to_data(r.x1));
    let y = ordered(mapping.y_to_data(r.y0), mapping.y_to_data(r.y1));
    match axes {
        ZoomAxes::Xy => ZoomCommit {
            x: Some(x),
            y: Some(y),
        },
        ZoomAxes::X => ZoomCommit { x: Some(x), y: None },
        ZoomAxes::Y => ZoomCommit { x: None, y: Some(y) },
    }
}
