//! Navigation profiles: per-mover-kind traversal rules.
//!
//! A profile answers two questions about a tile, `can_enter` and `cost_of`.
//! Implementations must be pure functions of the map and the position so
//! that identical searches produce identical paths.
//!
//! # Cost table
//!
//! | Terrain  | Pedestrian | Vehicle |
//! |----------|-----------:|--------:|
//! | Road     | 1          | 1       |
//! | Grass    | 2          | -       |
//! | Sand     | 2          | -       |
//! | Forest   | 3          | -       |
//! | Water    | -          | -       |
//! | Mountain | -          | -       |
//!
//! plus `height / 4` (pedestrian) or `height / 8` (vehicle).

use tc_core::{NavKind, Position};

use crate::map::{GridMap, Terrain, Tile};

/// Traversal rules for one kind of mover.
pub trait NavigationProfile: Send + Sync {
    /// The mover kind this profile serves.
    fn kind(&self) -> NavKind;

    /// `false` outside the grid, on impassable terrain, or on a tile covered
    /// by a blocking object.
    fn can_enter(&self, map: &GridMap, pos: Position) -> bool;

    /// Cost of stepping onto `pos`.  Only meaningful when `can_enter` holds;
    /// always ≥ [`min_cost`](Self::min_cost).
    fn cost_of(&self, map: &GridMap, pos: Position) -> u32;

    /// Lower bound of `cost_of` over every enterable tile.  The pathfinder
    /// scales its Manhattan heuristic by this so it never overestimates.
    fn min_cost(&self) -> u32 {
        1
    }
}

#[inline]
fn open_tile(map: &GridMap, pos: Position) -> Option<&Tile> {
    map.tile(pos)
        .ok()
        .filter(|t| !t.terrain.is_impassable() && !t.is_blocked())
}

// ── Pedestrian ────────────────────────────────────────────────────────────────

/// Walks anywhere that is neither water, mountain, nor blocked.
#[derive(Copy, Clone, Debug, Default)]
pub struct PedestrianProfile;

impl NavigationProfile for PedestrianProfile {
    fn kind(&self) -> NavKind {
        NavKind::Pedestrian
    }

    fn can_enter(&self, map: &GridMap, pos: Position) -> bool {
        open_tile(map, pos).is_some()
    }

    fn cost_of(&self, map: &GridMap, pos: Position) -> u32 {
        let Ok(tile) = map.tile(pos) else {
            return u32::MAX;
        };
        let base = match tile.terrain {
            Terrain::Road => 1,
            Terrain::Grass | Terrain::Sand => 2,
            Terrain::Forest => 3,
            Terrain::Water | Terrain::Mountain => u32::MAX,
        };
        base.saturating_add(tile.height as u32 / 4)
    }
}

// ── Vehicle ───────────────────────────────────────────────────────────────────

/// Drives on unblocked road tiles only.
#[derive(Copy, Clone, Debug, Default)]
pub struct VehicleProfile;

impl NavigationProfile for VehicleProfile {
    fn kind(&self) -> NavKind {
        NavKind::Vehicle
    }

    fn can_enter(&self, map: &GridMap, pos: Position) -> bool {
        open_tile(map, pos).is_some_and(|t| t.terrain == Terrain::Road)
    }

    fn cost_of(&self, map: &GridMap, pos: Position) -> u32 {
        match map.tile(pos) {
            Ok(tile) if tile.terrain == Terrain::Road => 1 + tile.height as u32 / 8,
            _ => u32::MAX,
        }
    }
}

/// The shared profile instance for `kind`.
pub fn profile_for(kind: NavKind) -> &'static dyn NavigationProfile {
    match kind {
        NavKind::Pedestrian => &PedestrianProfile,
        NavKind::Vehicle    => &VehicleProfile,
    }
}
