//! The tile grid.
//!
//! # Data layout
//!
//! Tiles are stored row-major in one `Vec<Tile>`; the tile at `(x, y)` lives
//! at index `y * width + x`.  Every public accessor is bounds-checked and
//! returns [`SpatialError::OutOfBounds`] outside the grid.
//!
//! # Revisions
//!
//! Every mutation bumps a revision counter.  Movement code stores the
//! revision a path was planned against and re-plans when it no longer
//! matches, so map edits made between ticks never leave an entity following
//! a path through a tile that has since become blocked.

use tc_core::{BuildingId, Position};

use crate::{SpatialError, SpatialResult};

// ── Terrain & resources ───────────────────────────────────────────────────────

/// Ground type of a tile.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    #[default]
    Grass,
    Sand,
    Forest,
    Road,
    Water,
    Mountain,
}

impl Terrain {
    /// Water and mountains stop every mover.
    #[inline]
    pub fn is_impassable(self) -> bool {
        matches!(self, Terrain::Water | Terrain::Mountain)
    }

    /// ASCII glyph used by [`GridMap::from_ascii`] and [`GridMap::to_ascii`].
    pub fn glyph(self) -> char {
        match self {
            Terrain::Grass    => '.',
            Terrain::Sand     => ',',
            Terrain::Forest   => 'T',
            Terrain::Road     => '#',
            Terrain::Water    => '~',
            Terrain::Mountain => '^',
        }
    }

    pub fn from_glyph(c: char) -> Option<Terrain> {
        match c {
            '.' => Some(Terrain::Grass),
            ',' => Some(Terrain::Sand),
            'T' => Some(Terrain::Forest),
            '#' => Some(Terrain::Road),
            '~' => Some(Terrain::Water),
            '^' => Some(Terrain::Mountain),
            _ => None,
        }
    }
}

/// Harvestable resource types found on tiles.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceKind {
    Wood,
    Stone,
    Iron,
    Clay,
}

/// A resource stock sitting on a tile.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceDeposit {
    pub kind:   ResourceKind,
    pub amount: u32,
}

/// Weak reference from a tile to the placed object covering it.
///
/// The tile never owns the object; the registry does.  A stale handle simply
/// fails to resolve in the registry.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Occupant {
    pub building: BuildingId,
    /// `false` for walk-through objects (plazas, decorations).
    pub blocking: bool,
}

// ── Tile ──────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub terrain:  Terrain,
    /// Elevation step, 0 = sea level.  Raises movement cost.
    pub height:   u8,
    pub resource: Option<ResourceDeposit>,
    pub occupant: Option<Occupant>,
}

impl Tile {
    /// `true` if a blocking object covers this tile.
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.occupant.is_some_and(|o| o.blocking)
    }
}

// ── GridMap ───────────────────────────────────────────────────────────────────

/// Fixed-size 2-D tile grid.
#[derive(Clone, Debug)]
pub struct GridMap {
    width:    u32,
    height:   u32,
    tiles:    Vec<Tile>,
    revision: u64,
}

impl GridMap {
    /// An all-grass map of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::default(); width as usize * height as usize],
            revision: 0,
        }
    }

    /// Parse a map from rows of terrain glyphs (see [`Terrain::glyph`]).
    ///
    /// All rows must have the same length.
    ///
    /// ```
    /// use tc_spatial::{GridMap, Terrain};
    /// use tc_core::Position;
    ///
    /// let map = GridMap::from_ascii(&["..#", "~~#"]).unwrap();
    /// assert_eq!(map.width(), 3);
    /// assert_eq!(map.tile(Position::new(0, 1)).unwrap().terrain, Terrain::Water);
    /// ```
    pub fn from_ascii(rows: &[&str]) -> SpatialResult<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.chars().count()) as u32;
        let mut tiles = Vec::with_capacity(width as usize * height as usize);

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() as u32 != width {
                return Err(SpatialError::Parse(format!(
                    "row {y} has {} tiles, expected {width}",
                    row.chars().count()
                )));
            }
            for (x, c) in row.chars().enumerate() {
                let terrain = Terrain::from_glyph(c).ok_or_else(|| {
                    SpatialError::Parse(format!("unknown terrain glyph {c:?} at ({x}, {y})"))
                })?;
                tiles.push(Tile { terrain, ..Tile::default() });
            }
        }

        Ok(Self { width, height, tiles, revision: 0 })
    }

    /// Render terrain back to glyph rows; blocked tiles show as `B`.
    pub fn to_ascii(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width.max(1) as usize)
            .map(|row| {
                row.iter()
                    .map(|t| if t.is_blocked() { 'B' } else { t.terrain.glyph() })
                    .collect()
            })
            .collect()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Mutation counter; bumped by every setter.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Row-major index of `pos`, or `None` outside the grid.
    #[inline]
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Inverse of [`index_of`](Self::index_of).
    #[inline]
    pub fn position_of(&self, index: usize) -> Position {
        let w = self.width.max(1) as usize;
        Position::new((index % w) as i32, (index / w) as i32)
    }

    fn out_of_bounds(&self, pos: Position) -> SpatialError {
        SpatialError::OutOfBounds { pos, width: self.width, height: self.height }
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// Bounds-checked tile access.
    pub fn tile(&self, pos: Position) -> SpatialResult<&Tile> {
        match self.index_of(pos) {
            Some(i) => Ok(&self.tiles[i]),
            None => Err(self.out_of_bounds(pos)),
        }
    }

    /// Iterator over every in-bounds position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.tiles.len()).map(|i| self.position_of(i))
    }

    // ── Writes (all bump the revision) ────────────────────────────────────

    /// Bounds-checked mutable access.  Counts as a mutation even if the
    /// caller ends up writing nothing.
    pub fn tile_mut(&mut self, pos: Position) -> SpatialResult<&mut Tile> {
        match self.index_of(pos) {
            Some(i) => {
                self.revision += 1;
                Ok(&mut self.tiles[i])
            }
            None => Err(self.out_of_bounds(pos)),
        }
    }

    pub fn set_terrain(&mut self, pos: Position, terrain: Terrain) -> SpatialResult<()> {
        self.tile_mut(pos)?.terrain = terrain;
        Ok(())
    }

    pub fn set_height(&mut self, pos: Position, height: u8) -> SpatialResult<()> {
        self.tile_mut(pos)?.height = height;
        Ok(())
    }

    pub fn set_resource(
        &mut self,
        pos:      Position,
        resource: Option<ResourceDeposit>,
    ) -> SpatialResult<()> {
        self.tile_mut(pos)?.resource = resource;
        Ok(())
    }

    /// Remove up to `amount` units of the tile's resource; returns how many
    /// were actually taken.  An emptied deposit is cleared.
    pub fn take_resource(&mut self, pos: Position, amount: u32) -> SpatialResult<u32> {
        let tile = self.tile_mut(pos)?;
        let Some(deposit) = tile.resource.as_mut() else {
            return Ok(0);
        };
        let taken = deposit.amount.min(amount);
        deposit.amount -= taken;
        if deposit.amount == 0 {
            tile.resource = None;
        }
        Ok(taken)
    }

    /// Mark `pos` as covered by `occupant`.  Fails if another object already
    /// covers it.
    pub fn set_occupant(&mut self, pos: Position, occupant: Occupant) -> SpatialResult<()> {
        if let Some(existing) = self.tile(pos)?.occupant {
            if existing.building != occupant.building {
                return Err(SpatialError::Occupied { pos, by: existing.building });
            }
        }
        self.tile_mut(pos)?.occupant = Some(occupant);
        Ok(())
    }

    pub fn clear_occupant(&mut self, pos: Position) -> SpatialResult<()> {
        self.tile_mut(pos)?.occupant = None;
        Ok(())
    }
}
