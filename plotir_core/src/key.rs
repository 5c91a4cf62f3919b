// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element identity keys.
//!
//! A visual element (a fill region, a connecting line, a group of markers) is identified by the
//! series that owns it and the sub-role it plays for that series. The key never depends on where
//! the element sits among the currently rendered elements, so hiding one series cannot shift the
//! identity of another.

/// Stable index of a series in the input series list.
///
/// This is the position of the series as authored, not its position among visible series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesIndex(pub u32);

impl SeriesIndex {
    /// Converts a list position into a series index.
    ///
    /// Positions beyond `u32::MAX` saturate.
    pub fn from_position(position: usize) -> Self {
        Self(u32::try_from(position).unwrap_or(u32::MAX))
    }

    /// Returns the index as a list position.
    pub fn position(self) -> usize {
        self.0 as usize
    }
}

/// A visual sub-role a series may require.
///
/// The declaration order is the paint order within a series: fills are drawn below the line,
/// and markers above it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Region filled between the series and the zero baseline.
    FillToZero,
    /// Region filled between the series and the previous visible series.
    FillToNext,
    /// Connecting line through the series points.
    Line,
    /// Point markers.
    Markers,
    /// Bar rectangles.
    Bars,
}

impl Role {
    /// All roles in paint order.
    pub const ALL: [Self; 5] = [
        Self::FillToZero,
        Self::FillToNext,
        Self::Line,
        Self::Markers,
        Self::Bars,
    ];

    /// Small integer code, unique per role and ordered like [`Role::ALL`].
    pub const fn code(self) -> u8 {
        match self {
            Self::FillToZero => 0,
            Self::FillToNext => 1,
            Self::Line => 2,
            Self::Markers => 3,
            Self::Bars => 4,
        }
    }

    /// Returns `true` for the fill roles.
    pub const fn is_fill(self) -> bool {
        matches!(self, Self::FillToZero | Self::FillToNext)
    }

    /// A short class-like name, convenient for hosts that tag rendered nodes.
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::FillToZero => "fill-tozero",
            Self::FillToNext => "fill-tonext",
            Self::Line => "line",
            Self::Markers => "markers",
            Self::Bars => "bars",
        }
    }
}

/// Identity of a visual element: `(series index, role)`.
///
/// Keys order by series first and role second, which is the order reconciliation emits
/// operations in and the order hosts should paint surviving elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementKey {
    /// Owning series.
    pub series: SeriesIndex,
    /// Sub-role within the series.
    pub role: Role,
}

impl ElementKey {
    const ROLE_BITS: u32 = 3;

    /// Creates the key for a series role.
    pub const fn new(series: SeriesIndex, role: Role) -> Self {
        Self { series, role }
    }

    /// Packs the key into a flat `u64`.
    ///
    /// Distinct keys always pack to distinct values, and packing preserves key order.
    pub const fn to_raw(self) -> u64 {
        ((self.series.0 as u64) << Self::ROLE_BITS) | self.role.code() as u64
    }

    /// Inverse of [`ElementKey::to_raw`].
    pub fn from_raw(raw: u64) -> Option<Self> {
        let role = match raw & ((1 << Self::ROLE_BITS) - 1) {
            0 => Role::FillToZero,
            1 => Role::FillToNext,
            2 => Role::Line,
            3 => Role::Markers,
            4 => Role::Bars,
            _ => return None,
        };
        let series = u32::try_from(raw >> Self::ROLE_BITS).ok()?;
        Some(Self::new(SeriesIndex(series), role))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn keys_order_by_series_then_paint_order() {
        let a = ElementKey::new(SeriesIndex(0), Role::Line);
        let b = ElementKey::new(SeriesIndex(1), Role::FillToZero);
        let c = ElementKey::new(SeriesIndex(1), Role::FillToNext);
        let d = ElementKey::new(SeriesIndex(1), Role::Line);
        assert!(a < b, "series index dominates role");
        assert!(b < c, "tozero fill paints before tonext fill");
        assert!(c < d, "fills paint before the line");
    }

    #[test]
    fn raw_packing_round_trips_and_keeps_order() {
        let lo = ElementKey::new(SeriesIndex(7), Role::Bars);
        let hi = ElementKey::new(SeriesIndex(8), Role::FillToZero);
        assert_eq!(ElementKey::from_raw(lo.to_raw()), Some(lo));
        assert_eq!(ElementKey::from_raw(hi.to_raw()), Some(hi));
        assert!(lo.to_raw() < hi.to_raw(), "packing preserves order");
        let max = ElementKey::new(SeriesIndex(u32::MAX), Role::Bars);
        assert_eq!(ElementKey::from_raw(max.to_raw()), Some(max));
    }

    #[test]
    fn unknown_role_bits_do_not_decode() {
        assert_eq!(ElementKey::from_raw(0b101), None);
        assert_eq!(ElementKey::from_raw(0b111), None);
    }
}
