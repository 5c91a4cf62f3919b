// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Series descriptors: the declarative per-series input to reconciliation.

use smallvec::SmallVec;

use crate::key::{ElementKey, Role, SeriesIndex};

/// Series visibility.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Rendered.
    #[default]
    Visible,
    /// Not rendered.
    Hidden,
    /// Not rendered in the plot area, only listed in a legend.
    LegendOnly,
}

impl Visibility {
    /// Returns `true` if the series owns elements in the plot area.
    pub fn is_rendered(self) -> bool {
        matches!(self, Self::Visible)
    }
}

impl From<bool> for Visibility {
    fn from(value: bool) -> Self {
        if value { Self::Visible } else { Self::Hidden }
    }
}

/// Trace kind of a series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TraceKind {
    /// Points, lines and fills.
    #[default]
    Scatter,
    /// Bars.
    Bar,
}

impl TraceKind {
    /// A short class-like name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Scatter => "scatter",
            Self::Bar => "bar",
        }
    }
}

/// Role set of a series, kept sorted and deduplicated.
pub type RoleSet = SmallVec<[Role; 4]>;

/// Declarative description of one series.
///
/// Descriptors are rebuilt on every update; reconciliation only reads them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeriesDescriptor {
    /// Stable index of the series in the input list.
    pub index: SeriesIndex,
    /// Whether the series is rendered.
    pub visibility: Visibility,
    /// Trace kind.
    pub kind: TraceKind,
    roles: RoleSet,
}

impl SeriesDescriptor {
    /// Creates a visible descriptor with no roles.
    pub fn new(index: SeriesIndex, kind: TraceKind) -> Self {
        Self {
            index,
            visibility: Visibility::Visible,
            kind,
            roles: RoleSet::new(),
        }
    }

    /// Sets the visibility.
    pub fn with_visibility(mut self, visibility: impl Into<Visibility>) -> Self {
        self.visibility = visibility.into();
        self
    }

    /// Adds a required role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.insert_role(role);
        self
    }

    /// Adds a required role in place.
    pub fn insert_role(&mut self, role: Role) {
        if let Err(at) = self.roles.binary_search(&role) {
            self.roles.insert(at, role);
        }
    }

    /// Returns `true` if the series requires `role`.
    pub fn requires(&self, role: Role) -> bool {
        self.roles.binary_search(&role).is_ok()
    }

    /// Required roles in paint order, regardless of visibility.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Keys of the elements this series wants rendered.
    ///
    /// Empty unless the series is [`Visibility::Visible`].
    pub fn wanted_keys(&self) -> impl Iterator<Item = ElementKey> + '_ {
        let roles: &[Role] = if self.visibility.is_rendered() {
            self.roles.as_slice()
        } else {
            &[]
        };
        roles.iter().map(|&role| ElementKey::new(self.index, role))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn roles_stay_sorted_and_unique() {
        let d = SeriesDescriptor::new(SeriesIndex(0), TraceKind::Scatter)
            .with_role(Role::Line)
            .with_role(Role::FillToNext)
            .with_role(Role::Line)
            .with_role(Role::FillToZero);
        assert_eq!(
            d.roles(),
            &[Role::FillToZero, Role::FillToNext, Role::Line]
        );
        assert!(d.requires(Role::FillToNext));
        assert!(!d.requires(Role::Markers));
    }

    #[test]
    fn only_visible_series_want_keys() {
        let base = SeriesDescriptor::new(SeriesIndex(3), TraceKind::Scatter).with_role(Role::Line);
        assert_eq!(base.wanted_keys().count(), 1);

        let hidden = base.clone().with_visibility(false);
        assert_eq!(hidden.wanted_keys().count(), 0);

        let legend_only = base.with_visibility(Visibility::LegendOnly);
        let keys: Vec<_> = legend_only.wanted_keys().collect();
        assert!(keys.is_empty(), "legend-only series render nothing");
    }
}
