//! Unit tests for tc-registry.

use tc_agent::{EducationLevel, Profession};
use tc_core::{Area, BuildingId, CitizenId, Placement, Position};
use tc_spatial::{GridMap, PedestrianProfile, SpatialError};

use crate::{
    BuildingKind, BuildingRegistry, Commercial, Housing, RegistryError, RegistryEvent, School,
    UtilityKind, Utilities, Workplace,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn place(x: i32, y: i32, w: u32, h: u32) -> Placement {
    Placement::new(Position::new(x, y), Area { width: w, height: h })
}

fn c(n: u32) -> CitizenId {
    CitizenId(n)
}

/// 10x10 grass map with an empty registry.
fn world() -> (GridMap, BuildingRegistry) {
    (GridMap::new(10, 10), BuildingRegistry::new())
}

// ── Placement ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod placement {
    use super::*;

    #[test]
    fn register_marks_tiles_and_logs() {
        let (mut map, mut reg) = world();
        let p = place(2, 2, 2, 2);
        let id = reg.register(p, BuildingKind::House, true, &mut map).unwrap();

        assert_eq!(reg.placement(id), Some(p));
        assert_eq!(reg.entrance(id), Some(Position::new(3, 3)));
        for t in p.tiles() {
            assert_eq!(map.tile(t).unwrap().occupant.map(|o| o.building), Some(id));
        }
        assert_eq!(
            reg.drain_events(),
            vec![RegistryEvent::Placed { id, placement: p, kind: BuildingKind::House }]
        );
        assert!(reg.drain_events().is_empty());
    }

    #[test]
    fn overlap_and_bounds_are_rejected_without_side_effects() {
        let (mut map, mut reg) = world();
        let first = reg.register(place(0, 0, 3, 3), BuildingKind::House, true, &mut map).unwrap();
        let rev = map.revision();

        let overlap = reg.register(place(2, 2, 2, 2), BuildingKind::Shop, true, &mut map);
        assert_eq!(
            overlap,
            Err(RegistryError::Spatial(SpatialError::Occupied {
                pos: Position::new(2, 2),
                by:  first,
            }))
        );
        let outside = reg.register(place(9, 9, 2, 2), BuildingKind::Shop, true, &mut map);
        assert!(matches!(outside, Err(RegistryError::Spatial(SpatialError::OutOfBounds { .. }))));
        assert_eq!(map.revision(), rev);
        assert!(map.tile(Position::new(9, 9)).unwrap().occupant.is_none());
        assert_eq!(reg.len(), 1);

        let empty = reg.register(place(5, 5, 0, 1), BuildingKind::Shop, true, &mut map);
        assert_eq!(empty, Err(RegistryError::EmptyFootprint));
    }

    #[test]
    fn removal_invalidates_handles_and_reuses_slots() {
        let (mut map, mut reg) = world();
        let a = reg.register(place(1, 1, 2, 1), BuildingKind::Workshop, true, &mut map).unwrap();
        reg.attach(a, Workplace::new(Profession::Labourer, EducationLevel::None, 3)).unwrap();

        reg.remove(a, &mut map).unwrap();
        assert!(!reg.contains(a));
        assert_eq!(reg.placement(a), None);
        assert!(reg.facility::<Workplace>(a).is_none());
        assert!(map.tile(Position::new(1, 1)).unwrap().occupant.is_none());
        assert_eq!(reg.remove(a, &mut map), Err(RegistryError::UnknownBuilding(a)));

        let b = reg.register(place(1, 1, 2, 1), BuildingKind::Shop, true, &mut map).unwrap();
        assert_eq!(b.index, a.index, "slot reused");
        assert_ne!(b, a, "generation differs");
        assert!(!reg.contains(a));
        assert!(reg.facility::<Workplace>(b).is_none());

        let events = reg.drain_events();
        assert!(matches!(events[1], RegistryEvent::Removed { id, .. } if id == a));
    }

    #[test]
    fn building_at_resolves_any_footprint_tile() {
        let (mut map, mut reg) = world();
        let id = reg.register(place(4, 4, 3, 2), BuildingKind::Office, true, &mut map).unwrap();
        assert_eq!(reg.building_at(Position::new(6, 5)), Some(id));
        assert_eq!(reg.building_at(Position::new(7, 5)), None);
    }

    #[test]
    fn attach_requires_live_building() {
        let (_, mut reg) = world();
        let ghost = BuildingId::new(3, 0);
        assert_eq!(reg.attach(ghost, Housing::new(2)), Err(RegistryError::UnknownBuilding(ghost)));
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queries {
    use super::*;

    #[test]
    fn buildings_of_type_in_id_order() {
        let (mut map, mut reg) = world();
        let h1 = reg.register(place(0, 0, 1, 1), BuildingKind::House, true, &mut map).unwrap();
        let shop = reg.register(place(2, 0, 1, 1), BuildingKind::Shop, true, &mut map).unwrap();
        let h2 = reg.register(place(4, 0, 1, 1), BuildingKind::House, true, &mut map).unwrap();
        reg.attach(h2, Housing::new(4)).unwrap();
        reg.attach(h1, Housing::new(2)).unwrap();
        reg.attach(shop, Commercial::new(2, 6, 3)).unwrap();

        let houses: Vec<_> = reg.buildings::<Housing>().map(|(id, h)| (id, h.capacity)).collect();
        assert_eq!(houses, vec![(h1, 2), (h2, 4)]);
        assert_eq!(reg.buildings::<School>().count(), 0);
    }

    #[test]
    fn nearest_respects_filter_and_breaks_ties_by_id() {
        let (mut map, mut reg) = world();
        // Entrances at (1,0) and (7,0); the query point (4,0) is equidistant.
        let left = reg.register(place(1, 0, 1, 1), BuildingKind::Workshop, true, &mut map).unwrap();
        let right = reg.register(place(7, 0, 1, 1), BuildingKind::Workshop, true, &mut map).unwrap();
        let far = reg.register(place(9, 9, 1, 1), BuildingKind::Workshop, true, &mut map).unwrap();
        for id in [left, right, far] {
            reg.attach(id, Workplace::new(Profession::Labourer, EducationLevel::None, 1)).unwrap();
        }

        let from = Position::new(4, 0);
        assert_eq!(reg.nearest::<Workplace, _>(from, |_, _| true), Some(left));
        assert_eq!(reg.nearest::<Workplace, _>(from, |id, _| id != left), Some(right));
        assert_eq!(reg.nearest::<Workplace, _>(from, |id, _| id == far), Some(far));
        assert_eq!(reg.nearest::<Workplace, _>(from, |_, w| w.capacity > 5), None);
        assert_eq!(reg.nearest::<Housing, _>(from, |_, _| true), None);
    }

    #[test]
    fn accessible_neighbors_skip_blocked_and_occupied() {
        let mut map = GridMap::from_ascii(&[
            "......",
            "......",
            "..~...",
            "......",
        ])
        .unwrap();
        let mut reg = BuildingRegistry::new();
        // 2x2 house at (2,0)-(3,1); perimeter: (2,2) (3,2) below, (1,0) (1,1) left,
        // (4,0) (4,1) right; the row above is off the map.
        let house = reg.register(place(2, 0, 2, 2), BuildingKind::House, true, &mut map).unwrap();
        reg.register(place(4, 1, 1, 1), BuildingKind::Shop, true, &mut map).unwrap();

        let tiles = reg.accessible_neighbor_tiles(house, &map, &PedestrianProfile);
        assert_eq!(
            tiles,
            vec![Position::new(3, 2), Position::new(1, 0), Position::new(1, 1), Position::new(4, 0)]
        );

        reg.remove(house, &mut map).unwrap();
        assert!(reg.accessible_neighbor_tiles(house, &map, &PedestrianProfile).is_empty());
    }

    #[test]
    fn release_citizen_clears_every_roster() {
        let (mut map, mut reg) = world();
        let home = reg.register(place(0, 0, 1, 1), BuildingKind::House, true, &mut map).unwrap();
        let school = reg.register(place(2, 0, 1, 1), BuildingKind::School, true, &mut map).unwrap();
        let shop = reg.register(place(4, 0, 1, 1), BuildingKind::Shop, true, &mut map).unwrap();
        reg.attach(home, Housing::new(2)).unwrap();
        reg.attach(school, School::new(EducationLevel::Primary, 5, 10)).unwrap();
        reg.attach(school, Workplace::new(Profession::Teacher, EducationLevel::Secondary, 1)).unwrap();
        reg.attach(shop, Commercial::new(0, 4, 1)).unwrap();

        reg.facility_mut::<Housing>(home).unwrap().move_in(c(1));
        reg.facility_mut::<School>(school).unwrap().enroll(c(1));
        reg.facility_mut::<Workplace>(school).unwrap().hire(c(2));
        reg.facility_mut::<Commercial>(shop).unwrap().try_join_queue(c(1));

        reg.release_citizen(c(1));
        assert!(reg.facility::<Housing>(home).unwrap().residents.is_empty());
        assert!(reg.facility::<School>(school).unwrap().students.is_empty());
        assert_eq!(reg.facility::<Commercial>(shop).unwrap().current_queue(), 0);
        assert_eq!(reg.facility::<Workplace>(school).unwrap().workers, vec![c(2)]);
    }
}

// ── Facilities ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod facilities {
    use super::*;

    #[test]
    fn commercial_queue_is_bounded() {
        let mut shop = Commercial::new(0, 6, 3);
        let joined: Vec<bool> = (0..8).map(|i| shop.try_join_queue(c(i))).collect();
        assert_eq!(joined.iter().filter(|&&j| j).count(), 6);
        assert_eq!(shop.current_queue(), 6);
        assert!(!shop.try_join_queue(c(8)));

        // Capacity frees up once the front is admitted.
        shop.max_visitors = 1;
        assert_eq!(shop.process_queue(), vec![c(0)]);
        assert_eq!(shop.current_queue(), 5);
        assert!(shop.try_join_queue(c(8)));
        assert!(!shop.try_join_queue(c(9)));

        // ...or when someone leaves the queue.
        shop.leave(c(3));
        assert!(shop.try_join_queue(c(9)));
        assert_eq!(shop.current_queue(), 6);
    }

    #[test]
    fn commercial_admits_front_of_queue_only() {
        let mut shop = Commercial::new(1, 4, 2);
        shop.try_join_queue(c(1));
        shop.try_join_queue(c(2));
        assert!(!shop.try_enter(c(2)), "c1 is ahead");
        assert!(shop.try_enter(c(1)));
        assert!(shop.try_enter(c(1)), "entering twice is idempotent");
        assert!(!shop.try_enter(c(2)), "no visitor slot");
        shop.leave(c(1));
        assert!(shop.try_enter(c(2)));
        assert_eq!(shop.current_queue(), 0);
    }

    #[test]
    fn commercial_walk_in_with_empty_queue() {
        let mut shop = Commercial::new(2, 0, 1);
        assert!(!shop.try_join_queue(c(1)), "zero-length queue");
        assert!(shop.try_enter(c(1)));
        assert!(shop.is_visitor(c(1)));
    }

    #[test]
    fn workplace_capacity_and_education() {
        let mut w = Workplace::new(Profession::Clerk, EducationLevel::Secondary, 1);
        assert!(w.accepts(EducationLevel::University));
        assert!(!w.accepts(EducationLevel::Primary));
        assert!(w.hire(c(1)));
        assert!(w.hire(c(1)));
        assert!(!w.hire(c(2)));
        assert!(w.fire(c(1)));
        assert!(w.has_capacity());
    }

    #[test]
    fn school_teaches_next_level() {
        let mut s = School::new(EducationLevel::Secondary, 1, 10);
        assert!(s.teaches(EducationLevel::Primary));
        assert!(!s.teaches(EducationLevel::None));
        assert!(!s.teaches(EducationLevel::Secondary));
        assert!(s.enroll(c(1)));
        assert!(!s.enroll(c(2)));
        assert!(s.graduate(c(1)));
        assert!(!s.graduate(c(1)));
        assert_eq!(s.graduates, 1);
    }

    #[test]
    fn utilities_break_and_fix() {
        let mut u = Utilities::new();
        assert!(!u.needs_repair());
        assert!(u.break_utility(UtilityKind::Water));
        assert!(u.break_utility(UtilityKind::Power));
        assert!(!u.break_utility(UtilityKind::Power));
        assert_eq!(u.broken_utilities(), vec![UtilityKind::Power, UtilityKind::Water]);
        for kind in u.broken_utilities() {
            assert!(u.fix_utility(kind));
        }
        assert!(!u.needs_repair());
        assert_eq!(u.repairs, 2);
    }

    #[test]
    fn housing_vacancy() {
        let mut h = Housing::new(1);
        assert!(h.move_in(c(1)));
        assert!(!h.move_in(c(2)));
        assert!(h.move_out(c(1)));
        assert!(h.has_vacancy());
    }
}
