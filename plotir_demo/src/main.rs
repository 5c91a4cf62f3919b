// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Figure update demo for `plotir_charts`.
//!
//! Plots an area chart into an SVG host, toggles a trace, drags a zoom box and reorders a
//! category axis, writing an SVG snapshot after each step. Set `RUST_LOG=debug` (or `trace`)
//! to watch the reconciliation.

mod svg;

use std::error::Error;
use std::path::PathBuf;

use kurbo::Point;
use plotir_charts::{
    AxisName, Figure, FigureConfig, Fill, LayoutSpec, LayoutUpdate, PointerInput, ScatterMode,
    Trace, TraceAttr, TraceValues, UpdateSummary,
};
use plotir_core::Visibility;
use tracing::info;
use tracing_subscriber::EnvFilter;

use svg::SvgHost;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| ".".into()));
    let mut snapshots = Snapshots::new(out_dir);

    let mut fig = Figure::new(SvgHost::default(), FigureConfig::default());

    // Areas: a to-zero fill with a to-next fill stacked on top.
    let traces = vec![
        Trace::scatter(vec![1.0, 2.0, 3.0, 4.0], vec![0.0, 2.0, 3.0, 5.0])
            .with_name("base")
            .with_fill(Fill::ToZeroY),
        Trace::scatter(vec![1.0, 2.0, 3.0, 4.0], vec![3.0, 5.0, 1.0, 7.0])
            .with_name("top")
            .with_fill(Fill::ToNextY)
            .with_mode(ScatterMode::LinesMarkers),
    ];
    report("plot", &fig.plot(traces, LayoutSpec::default())?);
    snapshots.write("area", &fig)?;

    report(
        "hide top",
        &fig.restyle(TraceAttr::Visible(Visibility::Hidden), Some(&[1][..]))?,
    );
    report(
        "show top",
        &fig.restyle(TraceAttr::Visible(Visibility::Visible), Some(&[1][..]))?,
    );

    // Drag a box over the middle of the plot.
    let plot = fig.config().plot;
    let from = Point::new(plot.x0 + plot.width() * 0.25, plot.y0 + plot.height() * 0.2);
    let to = Point::new(plot.x0 + plot.width() * 0.6, plot.y0 + plot.height() * 0.8);
    fig.pointer(PointerInput::Down(from))?;
    fig.pointer(PointerInput::Move(from.lerp(to, 0.5)))?;
    fig.pointer(PointerInput::Move(to))?;
    snapshots.write("zoom-drag", &fig)?;
    let events = fig.pointer(PointerInput::Up(to))?;
    info!(?events, x = ?fig.layout().xaxis.range, y = ?fig.layout().yaxis.range, "zoomed");
    snapshots.write("zoomed", &fig)?;

    // Bars on a category axis, then reorder it.
    let bars = vec![Trace::bar(
        TraceValues::labels(["giraffes", "orangutans", "monkeys"]),
        vec![20.0, 14.0, 23.0],
    )];
    report("plot bars", &fig.plot(bars, LayoutSpec::default())?);
    snapshots.write("bars", &fig)?;

    report(
        "descending",
        &fig.relayout(&[LayoutUpdate::category_order(
            AxisName::X,
            Some("category descending"),
        )])?,
    );
    info!(
        categories = ?fig.full_layout().xaxis.initial_categories(),
        "category order"
    );
    snapshots.write("bars-descending", &fig)?;

    report(
        "array",
        &fig.relayout(&[
            LayoutUpdate::category_order(AxisName::X, None),
            LayoutUpdate::category_array(AxisName::X, ["monkeys", "giraffes", "orangutans"]),
        ])?,
    );
    info!(
        categories = ?fig.full_layout().xaxis.initial_categories(),
        "category order"
    );
    snapshots.write("bars-array", &fig)?;

    let destroyed = fig.purge();
    let (created, updated, destroyed_total) = fig.host().counts();
    info!(destroyed, created, updated, destroyed_total, "purged");
    Ok(())
}

fn report(step: &str, summary: &UpdateSummary) {
    let stats = summary.stats;
    info!(
        step,
        created = stats.created,
        updated = stats.updated,
        destroyed = stats.destroyed,
        "update"
    );
    for op in &summary.ops {
        tracing::debug!(step, ?op, "op");
    }
}

/// Numbered SVG snapshots in one directory.
struct Snapshots {
    dir: PathBuf,
    count: usize,
}

impl Snapshots {
    fn new(dir: PathBuf) -> Self {
        Self { dir, count: 0 }
    }

    fn write(&mut self, name: &str, fig: &Figure<SvgHost>) -> std::io::Result<()> {
        self.count += 1;
        let path = self.dir.join(format!("plotir_{:02}_{name}.svg", self.count));
        std::fs::write(&path, svg::render(fig))?;
        info!(path = %path.display(), "wrote snapshot");
        Ok(())
    }
}
