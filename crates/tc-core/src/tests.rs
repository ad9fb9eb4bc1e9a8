//! Unit tests for tc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{BuildingId, CitizenId};

    #[test]
    fn citizen_ids_allocate_in_order() {
        let id = CitizenId(42);
        assert_eq!(id.next(), CitizenId(43));
        assert!(id < id.next());
    }

    #[test]
    fn display() {
        assert_eq!(CitizenId(7).to_string(), "citizen#7");
        assert_eq!(BuildingId::new(3, 1).to_string(), "building#3v1");
    }

    #[test]
    fn building_generations_differ() {
        assert_ne!(BuildingId::new(0, 0), BuildingId::new(0, 1));
        assert_eq!(BuildingId::new(5, 9).slot(), 5);
    }
}

#[cfg(test)]
mod geo {
    use crate::{Area, Placement, Position};

    #[test]
    fn manhattan_distance() {
        let a = Position::new(0, 0);
        let b = Position::new(3, -4);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(b.manhattan(a), 7);
        assert_eq!(a.manhattan(a), 0);
    }

    #[test]
    fn neighbors_fixed_order() {
        let p = Position::new(5, 5);
        assert_eq!(
            p.neighbors4(),
            [
                Position::new(5, 4),
                Position::new(6, 5),
                Position::new(5, 6),
                Position::new(4, 5),
            ]
        );
        assert!(p.neighbors4().iter().all(|n| n.is_adjacent(p)));
    }

    #[test]
    fn entrance_is_bottom_centre() {
        let pl = Placement::new(Position::new(2, 3), Area::new(3, 2));
        assert_eq!(pl.entrance(), Position::new(3, 4));
        assert!(pl.contains(pl.entrance()));

        let single = Placement::new(Position::new(7, 7), Area::new(1, 1));
        assert_eq!(single.entrance(), Position::new(7, 7));
    }

    #[test]
    fn entrance_inside_for_even_width() {
        let pl = Placement::new(Position::new(0, 0), Area::new(4, 4));
        assert_eq!(pl.entrance(), Position::new(2, 3));
        assert!(pl.contains(pl.entrance()));
    }

    #[test]
    fn tiles_row_major() {
        let pl = Placement::new(Position::new(1, 1), Area::new(2, 2));
        let tiles: Vec<_> = pl.tiles().collect();
        assert_eq!(
            tiles,
            vec![
                Position::new(1, 1),
                Position::new(2, 1),
                Position::new(1, 2),
                Position::new(2, 2),
            ]
        );
    }

    #[test]
    fn perimeter_excludes_corners_and_footprint() {
        let pl = Placement::new(Position::new(2, 2), Area::new(2, 1));
        let ring = pl.perimeter();
        assert_eq!(ring.len(), 6);
        // Row below the footprint comes first.
        assert_eq!(ring[0], Position::new(2, 3));
        assert_eq!(ring[1], Position::new(3, 3));
        assert!(ring.iter().all(|p| !pl.contains(*p)));
        assert!(ring.iter().all(|p| pl.borders(*p)));
        assert!(!ring.contains(&Position::new(1, 1)));
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(3).since(Tick(10)), 0);
    }

    #[test]
    fn clock_calendar() {
        let clock = SimClock::new(4);
        assert_eq!(clock.ticks_per_day(), 96);
        assert_eq!(clock.hour_of_day(Tick(0)), 0);
        assert_eq!(clock.hour_of_day(Tick(4 * 9 + 3)), 9);
        assert_eq!(clock.day(Tick(95)), 0);
        assert_eq!(clock.day(Tick(96)), 1);
        assert_eq!(clock.hour_of_day(Tick(96 + 8)), 2);
    }

    #[test]
    fn zero_ticks_per_hour_clamped() {
        let clock = SimClock::new(0);
        assert_eq!(clock.ticks_per_hour, 1);
    }

    #[test]
    fn hour_windows() {
        let clock = SimClock::new(1);
        assert!(clock.in_hours(Tick(8), 8, 17));
        assert!(!clock.in_hours(Tick(17), 8, 17));
        // Window wrapping midnight.
        assert!(clock.in_hours(Tick(23), 22, 6));
        assert!(clock.in_hours(Tick(2), 22, 6));
        assert!(!clock.in_hours(Tick(12), 22, 6));
    }

    #[test]
    fn clock_advance_and_display() {
        let mut clock = SimClock::new(2);
        for _ in 0..51 {
            clock.advance();
        }
        assert_eq!(clock.current_tick, Tick(51));
        assert_eq!(clock.to_string(), "T51 (day 1 01h+1)");
    }

    #[test]
    fn config_defaults() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.end_tick(), Tick(cfg.total_ticks));
        assert_eq!(cfg.make_clock().ticks_per_hour, cfg.ticks_per_hour);
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentRng, CitizenId, SimRng};

    #[test]
    fn same_seed_same_stream() {
        let mut a = AgentRng::new(42, CitizenId(3));
        let mut b = AgentRng::new(42, CitizenId(3));
        let xs: Vec<u32> = (0..8).map(|_| a.gen_range(0..1000)).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.gen_range(0..1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn different_citizens_diverge() {
        let mut a = AgentRng::new(42, CitizenId(0));
        let mut b = AgentRng::new(42, CitizenId(1));
        let xs: Vec<u64> = (0..4).map(|_| a.gen_range(0..u64::MAX)).collect();
        let ys: Vec<u64> = (0..4).map(|_| b.gen_range(0..u64::MAX)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn gen_bool_extremes() {
        let mut r = SimRng::new(1);
        assert!(!r.gen_bool(0.0));
        assert!(r.gen_bool(1.0));
        assert!(r.gen_bool(7.0)); // clamped
    }

    #[test]
    fn child_streams_are_reproducible_and_distinct() {
        let mut p1 = SimRng::new(9);
        let mut p2 = SimRng::new(9);
        let mut a = p1.child(1);
        let mut b = p2.child(1);
        let xs: Vec<u64> = (0..4).map(|_| a.gen_range(0..u64::MAX)).collect();
        let ys: Vec<u64> = (0..4).map(|_| b.gen_range(0..u64::MAX)).collect();
        assert_eq!(xs, ys);

        let mut p3 = SimRng::new(9);
        let mut c = p3.child(2);
        let zs: Vec<u64> = (0..4).map(|_| c.gen_range(0..u64::MAX)).collect();
        assert_ne!(xs, zs);
    }
}

#[cfg(test)]
mod nav {
    use crate::NavKind;

    #[test]
    fn labels_roundtrip() {
        for kind in [NavKind::Pedestrian, NavKind::Vehicle] {
            assert_eq!(NavKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NavKind::parse("boat"), None);
        assert_eq!(NavKind::default(), NavKind::Pedestrian);
    }
}
