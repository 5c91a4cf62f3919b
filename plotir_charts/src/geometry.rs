// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel geometry for keyed elements.
//!
//! Hosts receive element keys; these helpers turn a key plus the figure state into the shape
//! to draw.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{BezPath, Point, Rect};
use plotir_core::{ElementKey, Role};

use crate::layout::FullLayout;
use crate::trace::{Trace, fill_target};

/// Fraction of the category step left empty between bars.
const BAR_GAP: f64 = 0.2;

/// Shape of one element, in device pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementGeometry {
    /// Closed fill region.
    Fill(BezPath),
    /// Open polyline.
    Line(BezPath),
    /// Marker centers.
    Markers(Vec<Point>),
    /// One rectangle per bar.
    Bars(Vec<Rect>),
}

/// Pixel positions of the points of `traces[index]` that map onto both axes.
pub fn series_points(traces: &[Trace], layout: &FullLayout, plot: Rect, index: usize) -> Vec<Point> {
    let Some(trace) = traces.get(index) else {
        return Vec::new();
    };
    let xs = layout.xaxis.scale(plot);
    let ys = layout.yaxis.scale(plot);
    (0..trace.len())
        .filter_map(|i| {
            let x = layout.xaxis.coordinate(&trace.x, i)?;
            let y = layout.yaxis.coordinate(&trace.y, i)?;
            Some(Point::new(xs.map(x), ys.map(y)))
        })
        .collect()
}

/// Polyline through `points`.
pub fn line_path(points: &[Point]) -> BezPath {
    let mut p = BezPath::new();
    for (i, pt) in points.iter().enumerate() {
        if i == 0 {
            p.move_to(*pt);
        } else {
            p.line_to(*pt);
        }
    }
    p
}

/// Region between `points` and the horizontal line at `baseline`.
pub fn fill_to_baseline_path(points: &[Point], baseline: f64) -> BezPath {
    let mut p = BezPath::new();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return p;
    };
    p.move_to((first.x, baseline));
    for pt in points {
        p.line_to(*pt);
    }
    p.line_to((last.x, baseline));
    p.close_path();
    p
}

/// Region between `upper` and `lower`; `lower` is walked backwards to close the shape.
pub fn fill_between_path(upper: &[Point], lower: &[Point]) -> BezPath {
    let mut p = line_path(upper);
    if p.elements().is_empty() {
        return p;
    }
    for pt in lower.iter().rev() {
        p.line_to(*pt);
    }
    p.close_path();
    p
}

/// Bar rectangles from `baseline` up to each point, `width` wide.
pub fn bar_rects(points: &[Point], baseline: f64, width: f64) -> Vec<Rect> {
    let half = width / 2.0;
    points
        .iter()
        .map(|pt| Rect::new(pt.x - half, pt.y, pt.x + half, baseline).abs())
        .collect()
}

/// Bar width: the smallest gap between distinct x positions, minus [`BAR_GAP`].
fn bar_width(points: &[Point], unit: f64) -> f64 {
    let mut xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    xs.sort_by(f64::total_cmp);
    let step = xs
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| *d > 0.0)
        .fold(f64::INFINITY, f64::min);
    let step = if step.is_finite() { step } else { unit };
    step * (1.0 - BAR_GAP)
}

/// Geometry for the element `key`.
///
/// Returns `None` if the key's series does not exist.
pub fn element_geometry(
    traces: &[Trace],
    layout: &FullLayout,
    plot: Rect,
    key: ElementKey,
) -> Option<ElementGeometry> {
    let index = key.series.position();
    traces.get(index)?;
    let points = series_points(traces, layout, plot, index);
    let zero_y = layout.yaxis.scale(plot).map(0.0);

    let geometry = match key.role {
        Role::FillToZero => ElementGeometry::Fill(fill_to_baseline_path(&points, zero_y)),
        Role::FillToNext => match fill_target(traces, index) {
            Some(target) => {
                let lower = series_points(traces, layout, plot, target);
                ElementGeometry::Fill(fill_between_path(&points, &lower))
            }
            None => ElementGeometry::Fill(fill_to_baseline_path(&points, zero_y)),
        },
        Role::Line => ElementGeometry::Line(line_path(&points)),
        Role::Markers => ElementGeometry::Markers(points),
        Role::Bars => {
            let xs = layout.xaxis.scale(plot);
            let width = bar_width(&points, (xs.map(1.0) - xs.map(0.0)).abs());
            ElementGeometry::Bars(bar_rects(&points, zero_y, width))
        }
    };
    Some(geometry)
}
