//! The entity movement service: path caching plus one-tile stepping.

use tc_core::{Position, Tick};
use tc_spatial::{GridMap, NavigationProfile, PathFinder};
use tracing::{debug, trace};

use crate::{MobilityResult, MovingEntity};

/// Outcome of one [`EntityMovement::play_movement`] call.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Step {
    /// The entity stepped onto this tile.  It may now stand on its target.
    Moved(Position),
    /// Already on the target; nothing to do.
    Arrived,
    /// Not enough ticks since the previous step.
    Waiting,
    /// No usable path to the target under the current map.
    Stalled,
}

/// Movement operations used by behaviour tasks.
///
/// Object safe so tasks can hold a `&dyn EntityMovement` without knowing
/// which pathfinder sits underneath.
pub trait EntityMovement: Send + Sync {
    /// Set a new target and plan a path to it.
    ///
    /// Any previous path is discarded.  On failure the path stays empty, the
    /// attempt is still recorded (so it is not retried until the target or
    /// map changes) and the error is returned to the caller.
    fn set_target(
        &self,
        entity:  &mut MovingEntity,
        target:  Position,
        map:     &GridMap,
        profile: &dyn NavigationProfile,
    ) -> MobilityResult<()>;

    /// Replan against the entity's stored target regardless of staleness.
    fn recalculate_path(
        &self,
        entity:  &mut MovingEntity,
        map:     &GridMap,
        profile: &dyn NavigationProfile,
    ) -> MobilityResult<()>;

    /// Advance the entity by at most one tile.
    fn play_movement(
        &self,
        entity:  &mut MovingEntity,
        map:     &GridMap,
        profile: &dyn NavigationProfile,
        now:     Tick,
    ) -> Step;

    #[inline]
    fn has_arrived(&self, entity: &MovingEntity) -> bool {
        entity.has_arrived()
    }
}

/// Default [`EntityMovement`] implementation over any [`PathFinder`].
///
/// # Type parameter
///
/// `F` is fixed at compile time (e.g. [`tc_spatial::AStarPathFinder`]).
#[derive(Debug, Clone, Default)]
pub struct EntityMovementService<F: PathFinder> {
    pub finder: F,
}

impl<F: PathFinder> EntityMovementService<F> {
    pub fn new(finder: F) -> Self {
        Self { finder }
    }
}

impl<F: PathFinder> EntityMovement for EntityMovementService<F> {
    fn set_target(
        &self,
        entity:  &mut MovingEntity,
        target:  Position,
        map:     &GridMap,
        profile: &dyn NavigationProfile,
    ) -> MobilityResult<()> {
        entity.target = target;
        self.recalculate_path(entity, map, profile)
    }

    fn recalculate_path(
        &self,
        entity:  &mut MovingEntity,
        map:     &GridMap,
        profile: &dyn NavigationProfile,
    ) -> MobilityResult<()> {
        entity.path.clear();
        entity.planned_for = Some((entity.target, map.revision()));

        match self.finder.find_path(map, entity.position, entity.target, profile) {
            Ok(path) => {
                trace!(from = %entity.position, to = %entity.target, len = path.len(), "path planned");
                entity.path.extend(path.tiles);
                Ok(())
            }
            Err(e) => {
                debug!(from = %entity.position, to = %entity.target, error = %e, "path planning failed");
                Err(e.into())
            }
        }
    }

    fn play_movement(
        &self,
        entity:  &mut MovingEntity,
        map:     &GridMap,
        profile: &dyn NavigationProfile,
        now:     Tick,
    ) -> Step {
        if entity.has_arrived() {
            entity.path.clear();
            return Step::Arrived;
        }
        if !entity.ready_to_step(now) {
            return Step::Waiting;
        }
        if entity.is_path_stale(map.revision()) && self.recalculate_path(entity, map, profile).is_err() {
            return Step::Stalled;
        }

        let Some(next) = entity.path.pop_front() else {
            return Step::Stalled;
        };
        entity.position = next;
        entity.last_step = Some(now);
        trace!(tick = %now, pos = %next, left = entity.path.len(), "step");
        Step::Moved(next)
    }
}
