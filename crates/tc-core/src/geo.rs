//! Integer tile geometry: positions, footprints, and placements.
//!
//! The grid uses screen orientation: `x` grows to the right and `y` grows
//! downwards, so the "bottom" row of a footprint is its largest `y`.

use std::fmt;

// ── Position ──────────────────────────────────────────────────────────────────

/// A tile coordinate.  Signed so that neighbor arithmetic near the map edge
/// produces out-of-bounds positions instead of wrapping.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan (L1) distance in tiles.
    #[inline]
    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }

    /// The four edge-adjacent tiles in fixed order: up, right, down, left.
    ///
    /// The fixed order is what makes path searches reproducible.
    #[inline]
    pub fn neighbors4(self) -> [Position; 4] {
        [
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(-1, 0),
        ]
    }

    /// `true` if `other` shares an edge with `self`.
    #[inline]
    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── Area ──────────────────────────────────────────────────────────────────────

/// Footprint dimensions in tiles.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Area {
    pub width:  u32,
    pub height: u32,
}

impl Area {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn tile_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for Area {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

// ── Placement ─────────────────────────────────────────────────────────────────

/// Where an object sits on the grid: its top-left tile plus footprint.
///
/// The entrance is derived, never stored, so it can't drift from the
/// footprint.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub position: Position,
    pub area:     Area,
}

impl Placement {
    #[inline]
    pub fn new(position: Position, area: Area) -> Self {
        Self { position, area }
    }

    /// Bottom-centre tile of the footprint.  Always inside the footprint for
    /// any non-empty area.
    #[inline]
    pub fn entrance(&self) -> Position {
        Position::new(
            self.position.x + (self.area.width / 2) as i32,
            self.position.y + self.area.height.max(1) as i32 - 1,
        )
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.position.x
            && pos.y >= self.position.y
            && pos.x < self.position.x + self.area.width as i32
            && pos.y < self.position.y + self.area.height as i32
    }

    /// All footprint tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Position> + '_ {
        let origin = self.position;
        (0..self.area.height as i32).flat_map(move |dy| {
            (0..self.area.width as i32).map(move |dx| origin.offset(dx, dy))
        })
    }

    /// Edge-adjacent ring around the footprint (corners excluded).
    ///
    /// Order: the row below (left to right), the row above, the left column
    /// (top to bottom), then the right column.  The row below comes first
    /// because it borders the entrance.
    pub fn perimeter(&self) -> Vec<Position> {
        let Position { x, y } = self.position;
        let w = self.area.width as i32;
        let h = self.area.height as i32;
        let mut ring = Vec::with_capacity(2 * (w + h) as usize);
        ring.extend((x..x + w).map(|cx| Position::new(cx, y + h)));
        ring.extend((x..x + w).map(|cx| Position::new(cx, y - 1)));
        ring.extend((y..y + h).map(|cy| Position::new(x - 1, cy)));
        ring.extend((y..y + h).map(|cy| Position::new(x + w, cy)));
        ring
    }

    /// `true` if `pos` is on the edge-adjacent ring of the footprint.
    #[inline]
    pub fn borders(&self, pos: Position) -> bool {
        !self.contains(pos) && self.tiles().any(|t| t.is_adjacent(pos))
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}x{}", self.position, self.area.width, self.area.height)
    }
}
