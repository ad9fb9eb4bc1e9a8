//! Pathfinding trait and default A* implementation.
//!
//! # Pluggability
//!
//! Movement code calls pathfinding through the [`PathFinder`] trait, so
//! applications can swap in other searches (jump-point search, cached
//! flow fields) without touching the movement service.
//!
//! # Search details
//!
//! - 4-directional expansion in the fixed [`Position::neighbors4`] order.
//! - Heuristic: Manhattan distance × `profile.min_cost()`, which never
//!   overestimates and is consistent, so the first time the goal is popped
//!   its cost is optimal.
//! - The open set is a binary heap keyed by `(f, insertion sequence)`; equal
//!   `f` scores pop in insertion order.
//! - A per-tile best-known `g` table doubles as the open-set membership
//!   index: a neighbour is only pushed when it improves on that table, and
//!   heap entries for tiles already closed are skipped on pop.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tc_core::Position;

use crate::map::GridMap;
use crate::profile::NavigationProfile;
use crate::{SpatialError, SpatialResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// Result of a successful search: the tiles to step onto, in order.
///
/// `tiles` excludes the start tile and ends at the goal.  `cost` is the sum of
/// `profile.cost_of` over `tiles`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    pub tiles: Vec<Position>,
    pub cost:  u32,
}

impl Path {
    /// The path of a search whose start already equals its goal.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Final tile, `None` for an empty path.
    #[inline]
    pub fn goal(&self) -> Option<Position> {
        self.tiles.last().copied()
    }
}

// ── PathFinder trait ──────────────────────────────────────────────────────────

/// Pluggable search engine.
///
/// Implementations must be deterministic: identical `(map, start, goal,
/// profile)` inputs always yield the identical `Path`.
pub trait PathFinder: Send + Sync {
    /// Find a path from `start` to `goal`.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::OutOfBounds`] if either endpoint is off the grid.
    /// - [`SpatialError::GoalNotEnterable`] if `profile` rejects the goal tile.
    /// - [`SpatialError::NoPath`] if the goal is unreachable.
    ///
    /// `start == goal` yields `Ok(Path::empty())`.
    fn find_path(
        &self,
        map:     &GridMap,
        start:   Position,
        goal:    Position,
        profile: &dyn NavigationProfile,
    ) -> SpatialResult<Path>;
}

// ── AStarPathFinder ───────────────────────────────────────────────────────────

/// Classic A* over the tile grid.
#[derive(Copy, Clone, Debug, Default)]
pub struct AStarPathFinder;

impl PathFinder for AStarPathFinder {
    fn find_path(
        &self,
        map:     &GridMap,
        start:   Position,
        goal:    Position,
        profile: &dyn NavigationProfile,
    ) -> SpatialResult<Path> {
        astar(map, start, goal, profile)
    }
}

/// Sentinel for "no predecessor" in the came-from table.
const NO_PARENT: usize = usize::MAX;

fn astar(
    map:     &GridMap,
    start:   Position,
    goal:    Position,
    profile: &dyn NavigationProfile,
) -> SpatialResult<Path> {
    map.tile(start)?;
    map.tile(goal)?;

    if start == goal {
        return Ok(Path::empty());
    }
    if !profile.can_enter(map, goal) {
        tracing::trace!(%goal, kind = %profile.kind(), "goal not enterable");
        return Err(SpatialError::GoalNotEnterable(goal));
    }

    let n = map.tile_count();
    let scale = profile.min_cost().max(1);
    let heuristic = |p: Position| p.manhattan(goal).saturating_mul(scale);

    // g[i] = best known cost to reach tile i; also the membership index.
    let mut g = vec![u32::MAX; n];
    let mut came_from = vec![NO_PARENT; n];
    let mut closed = vec![false; n];

    // Min-heap on (f, seq).  `seq` is the insertion counter: FIFO among ties.
    let mut open: BinaryHeap<Reverse<(u32, u64, usize)>> = BinaryHeap::new();
    let mut seq: u64 = 0;

    let start_idx = start.y as usize * map.width() as usize + start.x as usize;
    g[start_idx] = 0;
    open.push(Reverse((heuristic(start), seq, start_idx)));

    while let Some(Reverse((_, _, idx))) = open.pop() {
        if closed[idx] {
            continue;
        }
        closed[idx] = true;

        let pos = map.position_of(idx);
        if pos == goal {
            return Ok(reconstruct(map, &came_from, idx, g[idx]));
        }

        for next in pos.neighbors4() {
            let Some(next_idx) = map.index_of(next) else {
                continue;
            };
            if closed[next_idx] || !profile.can_enter(map, next) {
                continue;
            }
            let tentative = g[idx].saturating_add(profile.cost_of(map, next));
            if tentative < g[next_idx] {
                g[next_idx] = tentative;
                came_from[next_idx] = idx;
                seq += 1;
                open.push(Reverse((tentative.saturating_add(heuristic(next)), seq, next_idx)));
            }
        }
    }

    tracing::trace!(%start, %goal, kind = %profile.kind(), "open set exhausted");
    Err(SpatialError::NoPath { from: start, to: goal })
}

fn reconstruct(map: &GridMap, came_from: &[usize], goal_idx: usize, cost: u32) -> Path {
    let mut tiles = Vec::new();
    let mut cur = goal_idx;
    // The start tile is the only closed tile without a parent.
    while came_from[cur] != NO_PARENT {
        tiles.push(map.position_of(cur));
        cur = came_from[cur];
    }
    tiles.reverse();
    Path { tiles, cost }
}
