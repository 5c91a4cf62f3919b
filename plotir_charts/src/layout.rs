// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Figure layout: authored input, resolved output and incremental updates.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::axis::{AxisName, AxisSpec, AxisType, ResolvedAxis};
use crate::trace::Trace;
use crate::zoom::DragMode;

/// Authored layout.
///
/// After a `relayout` this reads back exactly what was set, never the resolved values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutSpec {
    /// Horizontal axis.
    pub xaxis: AxisSpec,
    /// Vertical axis.
    pub yaxis: AxisSpec,
    /// What a pointer drag on the plot area does.
    pub drag_mode: DragMode,
}

impl LayoutSpec {
    /// Sets the horizontal axis.
    pub fn with_xaxis(mut self, axis: AxisSpec) -> Self {
        self.xaxis = axis;
        self
    }

    /// Sets the vertical axis.
    pub fn with_yaxis(mut self, axis: AxisSpec) -> Self {
        self.yaxis = axis;
        self
    }

    /// Sets the drag mode.
    pub fn with_drag_mode(mut self, mode: DragMode) -> Self {
        self.drag_mode = mode;
        self
    }

    /// The authored axis `name`.
    pub fn axis(&self, name: AxisName) -> &AxisSpec {
        match name {
            AxisName::X => &self.xaxis,
            AxisName::Y => &self.yaxis,
        }
    }

    fn axis_mut(&mut self, name: AxisName) -> &mut AxisSpec {
        match name {
            AxisName::X => &mut self.xaxis,
            AxisName::Y => &mut self.yaxis,
        }
    }

    /// Applies one update in place.
    pub fn apply(&mut self, update: &LayoutUpdate) {
        match update {
            LayoutUpdate::AxisType { axis, kind } => self.axis_mut(*axis).kind = *kind,
            LayoutUpdate::AxisRange { axis, range } => {
                let (lo, hi) = *range;
                self.axis_mut(*axis).range = Some((lo, hi));
            }
            LayoutUpdate::Autorange { axis } => self.axis_mut(*axis).range = None,
            LayoutUpdate::CategoryOrder { axis, order } => {
                self.axis_mut(*axis).category_order = order.clone();
            }
            LayoutUpdate::CategoryArray { axis, array } => {
                self.axis_mut(*axis).category_array = array.clone();
            }
            LayoutUpdate::DragMode(mode) => self.drag_mode = *mode,
        }
    }
}

/// One `relayout` change.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutUpdate {
    /// Sets the axis type.
    AxisType {
        /// Target axis.
        axis: AxisName,
        /// New type.
        kind: AxisType,
    },
    /// Sets an explicit range and turns autorange off.
    AxisRange {
        /// Target axis.
        axis: AxisName,
        /// New range.
        range: (f64, f64),
    },
    /// Clears the explicit range.
    Autorange {
        /// Target axis.
        axis: AxisName,
    },
    /// Sets (or with `None`, clears) `categoryorder`.
    CategoryOrder {
        /// Target axis.
        axis: AxisName,
        /// Policy name.
        order: Option<String>,
    },
    /// Sets (or with `None`, clears) `categoryarray`.
    CategoryArray {
        /// Target axis.
        axis: AxisName,
        /// Explicit order.
        array: Option<Vec<String>>,
    },
    /// Switches the drag mode.
    DragMode(DragMode),
}

impl LayoutUpdate {
    /// `categoryorder` update from an optional policy name.
    pub fn category_order(axis: AxisName, order: Option<&str>) -> Self {
        Self::CategoryOrder {
            axis,
            order: order.map(String::from),
        }
    }

    /// `categoryarray` update from labels.
    pub fn category_array<S: Into<String>>(
        axis: AxisName,
        array: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::CategoryArray {
            axis,
            array: Some(array.into_iter().map(Into::into).collect()),
        }
    }

    /// Axis the update targets, if any.
    pub fn axis(&self) -> Option<AxisName> {
        match self {
            Self::AxisType { axis, .. }
            | Self::AxisRange { axis, .. }
            | Self::Autorange { axis }
            | Self::CategoryOrder { axis, .. }
            | Self::CategoryArray { axis, .. } => Some(*axis),
            Self::DragMode(_) => None,
        }
    }
}

/// Layout as resolved against the current traces.
#[derive(Clone, Debug)]
pub struct FullLayout {
    /// Resolved horizontal axis.
    pub xaxis: ResolvedAxis,
    /// Resolved vertical axis.
    pub yaxis: ResolvedAxis,
    /// Drag mode in effect.
    pub drag_mode: DragMode,
}

impl FullLayout {
    /// Resolves `layout` against `traces`, carrying category state over from `previous`.
    pub fn resolve(layout: &LayoutSpec, traces: &[Trace], previous: Option<&Self>) -> Self {
        Self {
            xaxis: ResolvedAxis::resolve(
                AxisName::X,
                &layout.xaxis,
                traces,
                previous.map(|p| &p.xaxis),
            ),
            yaxis: ResolvedAxis::resolve(
                AxisName::Y,
                &layout.yaxis,
                traces,
                previous.map(|p| &p.yaxis),
            ),
            drag_mode: layout.drag_mode,
        }
    }

    /// The resolved axis `name`.
    pub fn axis(&self, name: AxisName) -> &ResolvedAxis {
        match name {
            AxisName::X => &self.xaxis,
            AxisName::Y => &self.yaxis,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn updates_echo_into_the_input_layout() {
        let mut layout = LayoutSpec::default();
        layout.apply(&LayoutUpdate::category_order(AxisName::X, Some("category descending")));
        layout.apply(&LayoutUpdate::category_array(AxisName::X, ["b", "a"]));
        layout.apply(&LayoutUpdate::AxisRange {
            axis: AxisName::Y,
            range: (1.0, 2.0),
        });
        assert_eq!(
            layout.xaxis.category_order.as_deref(),
            Some("category descending")
        );
        assert_eq!(
            layout.xaxis.category_array,
            Some(alloc::vec![String::from("b"), String::from("a")])
        );
        assert_eq!(layout.yaxis.range, Some((1.0, 2.0)));

        layout.apply(&LayoutUpdate::category_order(AxisName::X, None));
        layout.apply(&LayoutUpdate::Autorange { axis: AxisName::Y });
        layout.apply(&LayoutUpdate::DragMode(DragMode::Off));
        assert_eq!(layout.xaxis.category_order, None);
        assert_eq!(layout.yaxis.range, None);
        assert_eq!(layout.drag_mode, DragMode::Off);
    }

    #[test]
    fn update_targets() {
        assert_eq!(
            LayoutUpdate::Autorange { axis: AxisName::Y }.axis(),
            Some(AxisName::Y)
        );
        assert_eq!(LayoutUpdate::DragMode(DragMode::Zoom).axis(), None);
    }
}
