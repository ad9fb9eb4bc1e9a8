//! Unit tests for tc-mobility.

use std::sync::atomic::{AtomicUsize, Ordering};

use tc_core::{Position, Tick};
use tc_spatial::{
    AStarPathFinder, GridMap, NavigationProfile, Path, PathFinder, PedestrianProfile, SpatialResult,
    Terrain,
};

use crate::{EntityMovement, EntityMovementService, MobilityError, MovingEntity, Step};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A* wrapper that counts how many searches were run.
#[derive(Default)]
struct CountingFinder {
    calls: AtomicUsize,
}

impl CountingFinder {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl PathFinder for CountingFinder {
    fn find_path(
        &self,
        map:     &GridMap,
        start:   Position,
        goal:    Position,
        profile: &dyn NavigationProfile,
    ) -> SpatialResult<Path> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        AStarPathFinder.find_path(map, start, goal, profile)
    }
}

fn service() -> EntityMovementService<CountingFinder> {
    EntityMovementService::new(CountingFinder::default())
}

fn pos(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

// ── MovingEntity ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod moving_entity {
    use super::*;

    #[test]
    fn new_entity_is_stationary() {
        let e = MovingEntity::at(pos(2, 3));
        assert!(e.has_arrived());
        assert_eq!(e.remaining(), 0);
        assert!(e.is_path_stale(0), "never planned");
    }

    #[test]
    fn speed_gate() {
        let mut e = MovingEntity::at(pos(0, 0)).with_speed(3);
        assert!(e.ready_to_step(Tick(0)));
        e.last_step = Some(Tick(10));
        assert!(!e.ready_to_step(Tick(12)));
        assert!(e.ready_to_step(Tick(13)));
        assert_eq!(MovingEntity::at(pos(0, 0)).with_speed(0).ticks_per_tile, 1);
    }

    #[test]
    fn staleness_tracks_target_and_revision() {
        let mut e = MovingEntity::at(pos(0, 0));
        e.target = pos(3, 0);
        e.planned_for = Some((pos(3, 0), 7));
        assert!(!e.is_path_stale(7));
        assert!(e.is_path_stale(8));
        e.target = pos(4, 0);
        assert!(e.is_path_stale(7));
    }

    #[test]
    fn teleport_cancels_trip() {
        let mut e = MovingEntity::at(pos(0, 0));
        e.target = pos(5, 5);
        e.path.push_back(pos(1, 0));
        e.teleport(pos(2, 2));
        assert_eq!(e.position, pos(2, 2));
        assert!(e.has_arrived());
        assert!(e.path.is_empty());
    }
}

// ── EntityMovementService ─────────────────────────────────────────────────────

#[cfg(test)]
mod movement_service {
    use super::*;

    #[test]
    fn five_tiles_in_five_steps() {
        let map = GridMap::new(8, 1);
        let svc = service();
        let mut e = MovingEntity::at(pos(0, 0));
        svc.set_target(&mut e, pos(5, 0), &map, &PedestrianProfile).unwrap();
        assert_eq!(e.remaining(), 5);
        assert_eq!(e.path.back(), Some(&pos(5, 0)));

        for i in 1..=5 {
            let step = svc.play_movement(&mut e, &map, &PedestrianProfile, Tick(i as u64));
            assert_eq!(step, Step::Moved(pos(i, 0)));
        }
        assert_eq!(e.position, pos(5, 0));
        assert!(e.path.is_empty());
        assert!(svc.has_arrived(&e));
        assert_eq!(svc.play_movement(&mut e, &map, &PedestrianProfile, Tick(6)), Step::Arrived);
        assert_eq!(svc.finder.calls(), 1, "no replanning while the path is fresh");
    }

    #[test]
    fn new_target_replaces_path() {
        let map = GridMap::new(8, 8);
        let svc = service();
        let mut e = MovingEntity::at(pos(0, 0));
        svc.set_target(&mut e, pos(7, 0), &map, &PedestrianProfile).unwrap();
        svc.set_target(&mut e, pos(0, 3), &map, &PedestrianProfile).unwrap();
        assert_eq!(e.remaining(), 3);
        assert_eq!(e.path.back(), Some(&pos(0, 3)));
    }

    #[test]
    fn unreachable_target_leaves_empty_path_and_is_not_retried() {
        let map = GridMap::from_ascii(&["..~.."]).unwrap();
        let svc = service();
        let mut e = MovingEntity::at(pos(0, 0));
        let err = svc.set_target(&mut e, pos(4, 0), &map, &PedestrianProfile).unwrap_err();
        assert!(matches!(err, MobilityError::Routing(_)));
        assert!(e.path.is_empty());
        assert_eq!(e.target, pos(4, 0));

        for t in 1..4 {
            assert_eq!(svc.play_movement(&mut e, &map, &PedestrianProfile, Tick(t)), Step::Stalled);
        }
        assert_eq!(e.position, pos(0, 0));
        assert_eq!(svc.finder.calls(), 1);
    }

    #[test]
    fn map_change_triggers_one_replan() {
        let mut map = GridMap::new(5, 3);
        let svc = service();
        let mut e = MovingEntity::at(pos(0, 1));
        svc.set_target(&mut e, pos(4, 1), &map, &PedestrianProfile).unwrap();
        svc.play_movement(&mut e, &map, &PedestrianProfile, Tick(1));
        assert_eq!(e.position, pos(1, 1));

        // Drop a lake on the straight route.
        map.set_terrain(pos(2, 1), Terrain::Water).unwrap();
        let mut t = 2;
        while !e.has_arrived() {
            svc.play_movement(&mut e, &map, &PedestrianProfile, Tick(t));
            assert_ne!(e.position, pos(2, 1));
            t += 1;
        }
        assert_eq!(svc.finder.calls(), 2);
    }

    #[test]
    fn direct_target_write_is_noticed() {
        let map = GridMap::new(6, 1);
        let svc = service();
        let mut e = MovingEntity::at(pos(0, 0));
        svc.set_target(&mut e, pos(2, 0), &map, &PedestrianProfile).unwrap();
        e.target = pos(5, 0);
        for t in 1..=5 {
            svc.play_movement(&mut e, &map, &PedestrianProfile, Tick(t));
        }
        assert_eq!(e.position, pos(5, 0));
        assert_eq!(svc.finder.calls(), 2);
    }

    #[test]
    fn slow_entity_waits_between_steps() {
        let map = GridMap::new(4, 1);
        let svc = service();
        let mut e = MovingEntity::at(pos(0, 0)).with_speed(2);
        svc.set_target(&mut e, pos(2, 0), &map, &PedestrianProfile).unwrap();
        assert_eq!(svc.play_movement(&mut e, &map, &PedestrianProfile, Tick(10)), Step::Moved(pos(1, 0)));
        assert_eq!(svc.play_movement(&mut e, &map, &PedestrianProfile, Tick(11)), Step::Waiting);
        assert_eq!(svc.play_movement(&mut e, &map, &PedestrianProfile, Tick(12)), Step::Moved(pos(2, 0)));
    }

    #[test]
    fn target_equal_to_position_is_immediate_arrival() {
        let map = GridMap::new(3, 3);
        let svc = service();
        let mut e = MovingEntity::at(pos(1, 1));
        svc.set_target(&mut e, pos(1, 1), &map, &PedestrianProfile).unwrap();
        assert_eq!(svc.play_movement(&mut e, &map, &PedestrianProfile, Tick(0)), Step::Arrived);
    }
}
