// Copyright 2025 the Imperium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive grid geometry: footprints and blocks.

use core::fmt;

/// Overlap area above which two dilated footprints count as connected.
///
/// Two unit-dilated footprints that only touch at a corner intersect in a 2×2
/// square (area 4); anything sharing part of an edge intersects in more.
const ADJACENCY_AREA: i64 = 4;

/// Half-open axis-aligned rectangle on the integer grid.
///
/// Covers `[min_x, max_x) × [min_y, max_y)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Footprint {
    /// Minimum x (left, inclusive)
    pub min_x: i32,
    /// Minimum y (bottom, inclusive)
    pub min_y: i32,
    /// Maximum x (right, exclusive)
    pub max_x: i32,
    /// Maximum y (top, exclusive)
    pub max_y: i32,
}

impl Footprint {
    /// Create a footprint from min/max corners.
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create a footprint from origin and size.
    ///
    /// The far edges saturate at `i32::MAX`.
    pub const fn from_xywh(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x.saturating_add(w),
            max_y: y.saturating_add(h),
        }
    }

    /// Left edge.
    pub const fn x(&self) -> i32 {
        self.min_x
    }

    /// Bottom edge.
    pub const fn y(&self) -> i32 {
        self.min_y
    }

    /// Width; negative when inverted. Saturates for spans wider than `i32::MAX`.
    pub const fn width(&self) -> i32 {
        self.max_x.saturating_sub(self.min_x)
    }

    /// Height; negative when inverted. Saturates for spans taller than `i32::MAX`.
    pub const fn height(&self) -> i32 {
        self.max_y.saturating_sub(self.min_y)
    }

    /// Whether the footprint covers the grid cell at `(x, y)`.
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        self.min_x <= x && x < self.max_x && self.min_y <= y && y < self.max_y
    }

    /// The intersection of two footprints. May be empty or inverted.
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        }
    }

    /// Smallest footprint covering both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grow the footprint by `n` cells on every side, saturating at the `i32` range.
    pub const fn inflate(&self, n: i32) -> Self {
        Self {
            min_x: self.min_x.saturating_sub(n),
            min_y: self.min_y.saturating_sub(n),
            max_x: self.max_x.saturating_add(n),
            max_y: self.max_y.saturating_add(n),
        }
    }

    /// Covered area, widened to `i64`. Zero when empty or inverted, and saturates
    /// at `i64::MAX` for footprints spanning most of the grid.
    pub fn area(&self) -> i64 {
        let w = (i64::from(self.max_x) - i64::from(self.min_x)).max(0);
        let h = (i64::from(self.max_y) - i64::from(self.min_y)).max(0);
        w.saturating_mul(h)
    }

    /// True if the footprint covers no cell.
    pub const fn is_empty(&self) -> bool {
        self.max_x <= self.min_x || self.max_y <= self.min_y
    }

    /// Whether the two footprints share at least one cell.
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Whether the footprints, each grown by one cell, share at least one cell.
    pub fn is_within_one_cell_of(&self, other: &Self) -> bool {
        let (w, h) = self.dilated_overlap(other);
        w > 0 && h > 0
    }

    /// Whether the footprints share part of an edge or overlap.
    ///
    /// Both footprints are dilated by one cell and the blocks are connected when the
    /// dilated rectangles intersect in more than a corner square.
    pub fn is_adjacent_or_overlapping(&self, other: &Self) -> bool {
        let (w, h) = self.dilated_overlap(other);
        w > 0 && h > 0 && w.saturating_mul(h) > ADJACENCY_AREA
    }

    /// Side lengths of the intersection of both footprints dilated by one cell.
    ///
    /// Computed in `i64` so footprints touching the ends of the `i32` range dilate
    /// without clamping.
    fn dilated_overlap(&self, other: &Self) -> (i64, i64) {
        let span = |a_min: i32, a_max: i32, b_min: i32, b_max: i32| {
            let lo = i64::from(a_min.max(b_min)) - 1;
            let hi = i64::from(a_max.min(b_max)) + 1;
            (hi - lo).max(0)
        };
        (
            span(self.min_x, self.max_x, other.min_x, other.max_x),
            span(self.min_y, self.max_y, other.min_y, other.max_y),
        )
    }

    /// Convert to a [`kurbo::Rect`] in grid units, for overlays.
    #[cfg(feature = "kurbo")]
    pub fn to_rect(&self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.min_x),
            f64::from(self.min_y),
            f64::from(self.max_x),
            f64::from(self.max_y),
        )
    }
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x={}, y={}, w={}, h={})",
            self.min_x,
            self.min_y,
            self.width(),
            self.height()
        )
    }
}

/// A square block occupying `[x, x + size) × [y, y + size)`.
///
/// The payload is opaque to the manager and handed back on removal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block<T> {
    x: i32,
    y: i32,
    size: i32,
    data: T,
}

impl<T> Block<T> {
    /// Create a block with its bottom-left corner at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `size` is not positive, or if `x + size` or `y + size` does not
    /// fit in an `i32`.
    pub fn new(x: i32, y: i32, size: i32, data: T) -> Self {
        assert!(size > 0, "block size must be positive, got {size}");
        assert!(
            x.checked_add(size).is_some() && y.checked_add(size).is_some(),
            "block at ({x}, {y}) of size {size} leaves the i32 grid"
        );
        Self { x, y, size, data }
    }

    /// Left edge.
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Bottom edge.
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Edge length.
    pub const fn size(&self) -> i32 {
        self.size
    }

    /// Caller payload.
    pub const fn data(&self) -> &T {
        &self.data
    }

    /// Take the payload back.
    pub fn into_data(self) -> T {
        self.data
    }

    /// Cells covered by the block.
    pub const fn footprint(&self) -> Footprint {
        Footprint::from_xywh(self.x, self.y, self.size, self.size)
    }

    /// Whether the block covers the cell at `(x, y)`.
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        self.footprint().contains_point(x, y)
    }

    /// Whether this block shares part of an edge with, or overlaps, `other`.
    pub fn is_adjacent_or_overlapping<U>(&self, other: &Block<U>) -> bool {
        self.footprint()
            .is_adjacent_or_overlapping(&other.footprint())
    }
}
