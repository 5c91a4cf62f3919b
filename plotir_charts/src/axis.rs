// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis configuration and resolution.
//!
//! An [`AxisSpec`] is what the caller authored. A [`ResolvedAxis`] is what the figure
//! actually uses after looking at the data: a concrete axis type, a numeric range, and for
//! category axes the [`CategoryDomain`] with its positions.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use plotir_core::TraceKind;

use crate::category::{CategoryDomain, CategoryOrder};
use crate::scale::{ScaleLinear, extent};
use crate::trace::{Fill, Trace, TraceValues};

/// Range used when an axis has nothing to fit.
const DEFAULT_RANGE: (f64, f64) = (-1.0, 6.0);

/// Which axis of the (single) subplot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisName {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

impl AxisName {
    /// Layout attribute name (`"xaxis"` / `"yaxis"`).
    pub fn attr(self) -> &'static str {
        match self {
            Self::X => "xaxis",
            Self::Y => "yaxis",
        }
    }

    fn values(self, trace: &Trace) -> &TraceValues {
        match self {
            Self::X => &trace.x,
            Self::Y => &trace.y,
        }
    }
}

/// Axis type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AxisType {
    /// Category when any trace carries labels on this axis, linear otherwise.
    #[default]
    Auto,
    /// Continuous numeric axis.
    Linear,
    /// Category axis.
    Category,
}

/// Authored axis configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisSpec {
    /// Axis type.
    pub kind: AxisType,
    /// Explicit range; `None` autoranges.
    pub range: Option<(f64, f64)>,
    /// Category ordering policy name (see [`CategoryOrder::parse`]).
    pub category_order: Option<String>,
    /// Explicit category order.
    pub category_array: Option<Vec<String>>,
}

impl AxisSpec {
    /// Sets the axis type.
    pub fn with_type(mut self, kind: AxisType) -> Self {
        self.kind = kind;
        self
    }

    /// Sets an explicit range.
    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range = Some(range);
        self
    }

    /// Sets the category ordering policy.
    pub fn with_category_order(mut self, order: impl Into<String>) -> Self {
        self.category_order = Some(order.into());
        self
    }

    /// Sets the explicit category order.
    pub fn with_category_array<S: Into<String>>(
        mut self,
        array: impl IntoIterator<Item = S>,
    ) -> Self {
        self.category_array = Some(array.into_iter().map(Into::into).collect());
        self
    }
}

/// Axis configuration as used for rendering.
#[derive(Clone, Debug)]
pub struct ResolvedAxis {
    /// Which axis.
    pub name: AxisName,
    /// Resolved type; never [`AxisType::Auto`].
    pub kind: AxisType,
    /// Numeric range (category axes range over positions).
    pub range: (f64, f64),
    /// Whether `range` was computed from the data.
    pub autorange: bool,
    /// Effective ordering policy.
    pub category_order: CategoryOrder,
    /// The authored category array, echoed back unchanged.
    pub category_array: Option<Vec<String>>,
    /// Category state (empty for linear axes).
    pub domain: CategoryDomain,
}

impl ResolvedAxis {
    /// Resolves `spec` against `traces`.
    ///
    /// The category encounter order of `previous` (if it was a category axis) is kept and only
    /// extended, so positions do not move unless the ordering inputs change.
    pub fn resolve(
        name: AxisName,
        spec: &AxisSpec,
        traces: &[Trace],
        previous: Option<&Self>,
    ) -> Self {
        let kind = match spec.kind {
            AxisType::Auto => {
                if traces.iter().any(|t| name.values(t).is_labels()) {
                    AxisType::Category
                } else {
                    AxisType::Linear
                }
            }
            explicit => explicit,
        };

        let category_order =
            CategoryOrder::resolve(spec.category_order.as_deref(), spec.category_array.as_deref());

        let mut domain = match previous {
            Some(prev) if kind == AxisType::Category && prev.kind == AxisType::Category => {
                prev.domain.clone()
            }
            _ => CategoryDomain::new(),
        };
        if kind == AxisType::Category {
            for trace in traces {
                match name.values(trace) {
                    TraceValues::Labels(labels) => domain.observe(labels.iter().map(String::as_str)),
                    TraceValues::Numbers(values) => {
                        let labels: Vec<String> = values.iter().map(|v| format!("{v}")).collect();
                        domain.observe(labels.iter().map(String::as_str));
                    }
                }
            }
            domain.resolve(category_order, spec.category_array.as_deref());
        }

        let mut axis = Self {
            name,
            kind,
            range: DEFAULT_RANGE,
            autorange: spec.range.is_none(),
            category_order,
            category_array: spec.category_array.clone(),
            domain,
        };
        axis.range = match spec.range {
            Some(range) => range,
            None => axis.auto_range(traces),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            axis = name.attr(),
            kind = ?axis.kind,
            range = ?axis.range,
            autorange = axis.autorange,
            categories = axis.domain.len(),
            "resolved axis"
        );

        axis
    }

    /// Resolved category order (the `_initialCategories` of the axis).
    pub fn initial_categories(&self) -> &[String] {
        self.domain.categories()
    }

    /// Axis coordinate of the `index`-th value of `values`.
    ///
    /// Category axes map labels to positions; numbers are matched by their printed form.
    /// Linear axes accept numbers and numeric labels.
    pub fn coordinate(&self, values: &TraceValues, index: usize) -> Option<f64> {
        match (self.kind, values) {
            (AxisType::Category, TraceValues::Labels(labels)) => {
                let pos = self.domain.position(labels.get(index)?)?;
                Some(pos as f64)
            }
            (AxisType::Category, TraceValues::Numbers(numbers)) => {
                let label = format!("{}", numbers.get(index)?);
                Some(self.domain.position(&label)? as f64)
            }
            (_, TraceValues::Numbers(numbers)) => {
                numbers.get(index).copied().filter(|v| v.is_finite())
            }
            (_, TraceValues::Labels(labels)) => labels
                .get(index)?
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite()),
        }
    }

    /// Scale mapping axis coordinates onto the plot rectangle.
    ///
    /// The y axis grows upwards, so it maps onto `plot.y1 .. plot.y0`.
    pub fn scale(&self, plot: Rect) -> ScaleLinear {
        let range = match self.name {
            AxisName::X => (plot.x0, plot.x1),
            AxisName::Y => (plot.y1, plot.y0),
        };
        ScaleLinear::new(self.range, range)
    }

    fn auto_range(&self, traces: &[Trace]) -> (f64, f64) {
        if self.kind == AxisType::Category {
            let n = self.domain.len().max(1) as f64;
            return (-0.5, n - 0.5);
        }

        let rendered = traces.iter().filter(|t| t.visible.is_rendered());
        let mut coords: Vec<f64> = Vec::new();
        let mut include_zero = false;
        for trace in rendered {
            let values = self.name.values(trace);
            coords.extend((0..values.len()).filter_map(|i| self.coordinate(values, i)));
            if self.name == AxisName::Y
                && (trace.kind == TraceKind::Bar || trace.fill != Fill::None)
            {
                include_zero = true;
            }
        }
        if include_zero {
            coords.push(0.0);
        }

        match extent(coords) {
            None => DEFAULT_RANGE,
            Some((lo, hi)) if lo == hi => (lo - 1.0, hi + 1.0),
            Some(range) => range,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn zoo_bars() -> Vec<Trace> {
        vec![Trace::bar(
            TraceValues::labels(["giraffes", "orangutans", "monkeys"]),
            vec![20.0, 14.0, 23.0],
        )]
    }

    #[test]
    fn labels_make_an_auto_axis_categorical() {
        let x = ResolvedAxis::resolve(AxisName::X, &AxisSpec::default(), &zoo_bars(), None);
        assert_eq!(x.kind, AxisType::Category);
        assert_eq!(x.initial_categories(), ["giraffes", "orangutans", "monkeys"]);
        assert_eq!(x.range, (-0.5, 2.5));

        let y = ResolvedAxis::resolve(AxisName::Y, &AxisSpec::default(), &zoo_bars(), None);
        assert_eq!(y.kind, AxisType::Linear);
        assert_eq!(y.range, (0.0, 23.0), "bars include the zero baseline");
    }

    #[test]
    fn category_coordinates_follow_the_order() {
        let spec = AxisSpec::default().with_category_order("category descending");
        let x = ResolvedAxis::resolve(AxisName::X, &spec, &zoo_bars(), None);
        let values = &zoo_bars()[0].x;
        assert_eq!(x.coordinate(values, 0), Some(2.0));
        assert_eq!(x.coordinate(values, 1), Some(0.0));
        assert_eq!(x.coordinate(values, 5), None);
    }

    #[test]
    fn explicit_range_and_array_are_echoed() {
        let spec = AxisSpec::default()
            .with_range((-1.0, 4.0))
            .with_category_array(["monkeys", "lions"]);
        let x = ResolvedAxis::resolve(AxisName::X, &spec, &zoo_bars(), None);
        assert!(!x.autorange);
        assert_eq!(x.range, (-1.0, 4.0));
        assert_eq!(x.category_order, CategoryOrder::Array);
        assert_eq!(
            x.category_array.as_deref(),
            Some(&[String::from("monkeys"), String::from("lions")][..])
        );
        assert_eq!(x.domain.position("lions"), Some(1));
    }

    #[test]
    fn encounter_order_survives_reresolution() {
        let first = ResolvedAxis::resolve(AxisName::X, &AxisSpec::default(), &zoo_bars(), None);
        let mut traces = zoo_bars();
        traces.insert(
            0,
            Trace::bar(TraceValues::labels(["zebras", "monkeys"]), vec![1.0, 2.0]),
        );
        let second =
            ResolvedAxis::resolve(AxisName::X, &AxisSpec::default(), &traces, Some(&first));
        assert_eq!(
            second.initial_categories(),
            ["giraffes", "orangutans", "monkeys", "zebras"]
        );
    }

    #[test]
    fn switching_to_linear_drops_the_categories() {
        let first = ResolvedAxis::resolve(AxisName::X, &AxisSpec::default(), &zoo_bars(), None);
        let linear = ResolvedAxis::resolve(
            AxisName::X,
            &AxisSpec::default().with_type(AxisType::Linear),
            &zoo_bars(),
            Some(&first),
        );
        assert_eq!(linear.kind, AxisType::Linear);
        assert!(linear.domain.is_empty());
        assert!(linear.initial_categories().is_empty());
    }

    #[test]
    fn linear_autorange_skips_hidden_traces() {
        let traces = vec![
            Trace::scatter(vec![0.0, 10.0], vec![1.0, 2.0]),
            Trace::scatter(vec![-50.0, 99.0], vec![1.0, 2.0]).with_visible(false),
        ];
        let x = ResolvedAxis::resolve(AxisName::X, &AxisSpec::default(), &traces, None);
        assert_eq!(x.range, (0.0, 10.0));
        let y = ResolvedAxis::resolve(AxisName::Y, &AxisSpec::default(), &traces[1..], None);
        assert_eq!(y.range, DEFAULT_RANGE);
    }

    #[test]
    fn y_scale_points_up() {
        let y = ResolvedAxis::resolve(
            AxisName::Y,
            &AxisSpec::default().with_range((0.0, 10.0)),
            &[],
            None,
        );
        let s = y.scale(Rect::new(0.0, 0.0, 100.0, 200.0));
        assert_eq!(s.map(0.0), 200.0);
        assert_eq!(s.map(10.0), 0.0);
    }
}
