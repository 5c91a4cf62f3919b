// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG host for `plotir_demo`.
//!
//! The host keeps one `<g>`-like node per element key in paint order; rendering asks the
//! figure for each element's geometry.

use kurbo::{Point, Rect};
use peniko::Brush;
use peniko::color::palette::css;
use plotir_charts::{ElementGeometry, Figure, ZoomConfig, ZoomOverlay};
use plotir_core::{ElementHost, ElementKey, SeriesDescriptor};

const MARKER_RADIUS: f64 = 3.0;

/// One live SVG element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SvgNode {
    pub(crate) id: u64,
    pub(crate) class: String,
}

/// Host counting calls and keeping nodes in paint order.
#[derive(Debug, Default)]
pub(crate) struct SvgHost {
    next_id: u64,
    order: Vec<(ElementKey, u64)>,
    created: usize,
    updated: usize,
    destroyed: usize,
}

impl ElementHost for SvgHost {
    type Node = SvgNode;

    fn create(
        &mut self,
        key: ElementKey,
        series: &SeriesDescriptor,
        before: Option<&SvgNode>,
    ) -> SvgNode {
        self.next_id += 1;
        self.created += 1;
        let at = before
            .and_then(|b| self.order.iter().position(|(_, id)| *id == b.id))
            .unwrap_or(self.order.len());
        self.order.insert(at, (key, self.next_id));
        tracing::trace!(?key, at, "svg create");
        SvgNode {
            id: self.next_id,
            class: format!("{} {}", series.kind.name(), key.role.class_name()),
        }
    }

    fn update(&mut self, _key: ElementKey, _node: &mut SvgNode, _series: &SeriesDescriptor) {
        self.updated += 1;
    }

    fn destroy(&mut self, _key: ElementKey, node: SvgNode) {
        self.destroyed += 1;
        self.order.retain(|(_, id)| *id != node.id);
    }
}

impl SvgHost {
    pub(crate) fn counts(&self) -> (usize, usize, usize) {
        (self.created, self.updated, self.destroyed)
    }

    /// Element keys in paint order.
    pub(crate) fn paint_order(&self) -> impl Iterator<Item = ElementKey> + '_ {
        self.order.iter().map(|(k, _)| *k)
    }
}

fn series_brush(series: usize) -> Brush {
    let palette = [
        css::CORNFLOWER_BLUE,
        css::ORANGE,
        css::MEDIUM_SEA_GREEN,
        css::CRIMSON,
    ];
    Brush::Solid(palette[series % palette.len()])
}

/// Renders the live elements of `figure`, plus the zoom overlay if one is up.
pub(crate) fn render(figure: &Figure<SvgHost>) -> String {
    let plot = figure.config().plot;
    let view = plot.inflate(40.0, 40.0);
    let mut out = String::new();

    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
    out.push_str(&format!(
        r#"viewBox="{} {} {} {}" width="{}" height="{}">"#,
        view.x0,
        view.y0,
        view.width(),
        view.height(),
        view.width(),
        view.height()
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}"/>"#,
        plot.x0,
        plot.y0,
        plot.width(),
        plot.height(),
        "#cccccc"
    ));
    out.push('\n');

    for key in figure.host().paint_order() {
        let (Some(record), Some(geometry)) = (figure.store().get(key), figure.geometry(key))
        else {
            continue;
        };
        let series = key.series.position();
        let brush = series_brush(series);
        let name = figure
            .traces()
            .get(series)
            .and_then(|t| t.name.as_deref())
            .unwrap_or("");
        out.push_str(&format!(
            r#"<g class="{}" data-id="{}" data-name="{}">"#,
            record.node.class,
            record.node.id,
            escape_xml(name)
        ));
        write_geometry(&mut out, &geometry, &brush);
        out.push_str("</g>\n");
    }

    if let Some(overlay) = figure.drag().overlay() {
        write_overlay(&mut out, overlay, figure.drag().config());
    }

    out.push_str("</svg>\n");
    out
}

fn write_geometry(out: &mut String, geometry: &ElementGeometry, brush: &Brush) {
    match geometry {
        ElementGeometry::Fill(path) => {
            out.push_str(&format!(r#"<path d="{}""#, path.to_svg()));
            write_paint_attr(out, "fill", brush);
            out.push_str(r#" fill-opacity="0.5"/>"#);
        }
        ElementGeometry::Line(path) => {
            out.push_str(&format!(r#"<path d="{}" fill="none""#, path.to_svg()));
            write_paint_attr(out, "stroke", brush);
            out.push_str(r#" stroke-width="2"/>"#);
        }
        ElementGeometry::Markers(points) => {
            for Point { x, y } in points {
                out.push_str(&format!(
                    r#"<circle cx="{x}" cy="{y}" r="{MARKER_RADIUS}""#
                ));
                write_paint_attr(out, "fill", brush);
                out.push_str("/>");
            }
        }
        ElementGeometry::Bars(rects) => {
            for r in rects {
                write_rect(out, *r, brush);
            }
        }
    }
}

fn write_rect(out: &mut String, r: Rect, brush: &Brush) {
    out.push_str(&format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
        r.x0,
        r.y0,
        r.width(),
        r.height(),
    ));
    write_paint_attr(out, "fill", brush);
    out.push_str("/>");
}

fn write_overlay(out: &mut String, overlay: &ZoomOverlay, config: &ZoomConfig) {
    out.push_str(&format!(
        r#"<path class="zoombox" d="{}" fill-rule="evenodd""#,
        overlay.shade.to_svg()
    ));
    write_paint_attr(out, "fill", &config.shade);
    out.push_str("/>\n");
    out.push_str(&format!(
        r#"<path class="zoombox-corners" d="{}" fill="none" stroke-width="1""#,
        overlay.corners.to_svg()
    ));
    write_paint_attr(out, "stroke", &config.corner_stroke);
    out.push_str("/>\n");
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
