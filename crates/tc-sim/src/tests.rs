//! Integration tests for tc-sim.

use tc_agent::{CitizenBuilder, CitizenState, EducationLevel, Profession};
use tc_behavior::{BehaviorConfig, SimEvent};
use tc_core::{Area, BuildingId, CitizenId, Placement, Position, SimConfig, Tick};
use tc_registry::{BuildingKind, BuildingRegistry, Commercial, Facility, Housing, Utilities, Workplace};
use tc_spatial::{AStarPathFinder, GridMap};

use crate::{NoopObserver, Sim, SimBuilder, SimError, SimObserver, SimSettings};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// One tick per hour so `tick % 24` is the hour of day.
fn test_config(total_ticks: u64) -> SimConfig {
    SimConfig {
        ticks_per_hour:          1,
        total_ticks,
        seed:                    42,
        snapshot_interval_ticks: 0,
    }
}

fn quiet_behavior() -> BehaviorConfig {
    BehaviorConfig {
        shift_hours:            2,
        lesson_hours:           2,
        shopping_chance:        0.0,
        utility_failure_chance: 0.0,
        ..BehaviorConfig::default()
    }
}

fn place<T: Facility>(
    registry: &mut BuildingRegistry,
    map:      &mut GridMap,
    x: i32, y: i32, w: u32, h: u32,
    kind:     BuildingKind,
    facility: T,
) -> BuildingId {
    let p = Placement::new(Position::new(x, y), Area { width: w, height: h });
    let id = registry.register(p, kind, true, map).unwrap();
    registry.attach(id, facility).unwrap();
    id
}

/// 16x6 grass with a 2x2 house at (1,1) and a 2x2 workshop at (10,1).
/// The house's arrival tile is (2,3).
struct Town {
    map:      GridMap,
    registry: BuildingRegistry,
    home:     BuildingId,
    work:     BuildingId,
}

fn town() -> Town {
    let mut map = GridMap::new(16, 6);
    let mut registry = BuildingRegistry::new();
    let home = place(&mut registry, &mut map, 1, 1, 2, 2, BuildingKind::House, Housing::new(3));
    let work = place(
        &mut registry, &mut map, 10, 1, 2, 2, BuildingKind::Workshop,
        Workplace::new(Profession::Labourer, EducationLevel::None, 2),
    );
    Town { map, registry, home, work }
}

fn build(t: Town, total: u64, behavior: BehaviorConfig, citizens: Vec<CitizenBuilder>) -> Sim<AStarPathFinder> {
    SimBuilder::new(test_config(total), t.map, t.registry, AStarPathFinder)
        .behavior(behavior)
        .citizens(citizens)
        .build()
        .unwrap()
}

/// Educated adult living in the test town's house, birthday far away.
fn resident() -> CitizenBuilder {
    CitizenBuilder::new(Position::new(2, 3))
        .age(30)
        .education(EducationLevel::University)
        .home_at(Position::new(1, 1))
        .first_birthday(Tick(u64::MAX))
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn resolves_home_tiles_and_moves_citizens_in() {
        let t = town();
        let home = t.home;
        let sim = build(t, 10, quiet_behavior(), vec![resident(), resident()]);
        assert_eq!(sim.citizens.len(), 2);
        for c in sim.citizens.iter() {
            assert_eq!(c.home, Some(home));
        }
        assert_eq!(
            sim.registry.facility::<Housing>(home).unwrap().residents,
            vec![CitizenId(0), CitizenId(1)]
        );
    }

    #[test]
    fn home_tile_without_building_errors() {
        let t = town();
        let stray = CitizenBuilder::new(Position::new(0, 0)).home_at(Position::new(6, 4));
        let result = SimBuilder::new(test_config(10), t.map, t.registry, AStarPathFinder)
            .citizen(stray)
            .build();
        assert!(matches!(result, Err(SimError::NoBuildingAt { index: 0, .. })));
    }

    #[test]
    fn workshop_is_not_a_home() {
        let t = town();
        let wrong = CitizenBuilder::new(Position::new(0, 0)).home(t.work);
        let result = SimBuilder::new(test_config(10), t.map, t.registry, AStarPathFinder)
            .citizen(wrong)
            .build();
        assert!(matches!(result, Err(SimError::NotHousing { .. })));
    }

    #[test]
    fn overfull_home_errors() {
        let t = town();
        let result = SimBuilder::new(test_config(10), t.map, t.registry, AStarPathFinder)
            .citizens(std::iter::repeat_with(resident).take(4))
            .build();
        assert!(matches!(result, Err(SimError::HomeFull { index: 3, .. })));
    }

    #[test]
    fn citizen_off_the_map_errors() {
        let t = town();
        let result = SimBuilder::new(test_config(10), t.map, t.registry, AStarPathFinder)
            .citizen(CitizenBuilder::new(Position::new(40, 0)))
            .build();
        assert!(matches!(result, Err(SimError::OutOfMap { index: 0, .. })));
    }

    #[test]
    fn invalid_behavior_config_errors() {
        let t = town();
        let bad = BehaviorConfig { shopping_chance: 1.5, ..BehaviorConfig::default() };
        let result = SimBuilder::new(test_config(10), t.map, t.registry, AStarPathFinder)
            .behavior(bad)
            .build();
        assert!(matches!(result, Err(SimError::Behavior(_))));
    }

    #[test]
    fn initial_birthdays_fall_within_the_first_year() {
        let t = town();
        let behavior = quiet_behavior();
        let year = behavior.ticks_per_year;
        let kids = (0..3).map(|_| CitizenBuilder::new(Position::new(0, 5)).age(8));
        let sim = build(t, 10, behavior, kids.collect());
        for c in sim.citizens.iter() {
            assert!(c.next_birthday >= Tick(1) && c.next_birthday <= Tick(year));
        }
    }
}

// ── Settings ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod settings_tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let s = SimSettings::from_toml_str(
            r#"
            [sim]
            seed = 9

            [behavior]
            work_start_hour = 7
            "#,
        )
        .unwrap();
        assert_eq!(s.sim.seed, 9);
        assert_eq!(s.sim.ticks_per_hour, SimConfig::default().ticks_per_hour);
        assert_eq!(s.behavior.work_start_hour, 7);
        assert_eq!(s.behavior.work_end_hour, BehaviorConfig::default().work_end_hour);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(SimSettings::from_toml_str("").unwrap(), SimSettings::default());
    }

    #[test]
    fn malformed_or_invalid_settings_error() {
        assert!(matches!(SimSettings::from_toml_str("[sim]\nseed = \"x\""), Err(SimError::Settings(_))));
        assert!(matches!(SimSettings::from_toml_str("[weather]\nrain = 1"), Err(SimError::Settings(_))));
        assert!(matches!(
            SimSettings::from_toml_str("[sim]\nticks_per_hour = 0"),
            Err(SimError::Config(_))
        ));
        assert!(matches!(
            SimSettings::from_toml_str("[behavior]\nwork_end_hour = 30"),
            Err(SimError::Behavior(_))
        ));
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        starts:    Vec<Tick>,
        ends:      Vec<Tick>,
        snapshots: Vec<(Tick, usize)>,
        events:    Vec<SimEvent>,
        finished:  Option<Tick>,
    }

    impl SimObserver for Recorder {
        fn on_tick_start(&mut self, tick: Tick) {
            self.starts.push(tick);
        }
        fn on_tick_end(&mut self, tick: Tick, events: &[SimEvent]) {
            self.ends.push(tick);
            self.events.extend_from_slice(events);
        }
        fn on_snapshot(&mut self, tick: Tick, citizens: &tc_agent::CitizenStore, _: &BuildingRegistry) {
            self.snapshots.push((tick, citizens.len()));
        }
        fn on_sim_end(&mut self, final_tick: Tick) {
            self.finished = Some(final_tick);
        }
    }

    #[test]
    fn run_calls_every_hook() {
        let t = town();
        let mut sim = SimBuilder::new(
            SimConfig { snapshot_interval_ticks: 2, ..test_config(5) },
            t.map, t.registry, AStarPathFinder,
        )
        .behavior(quiet_behavior())
        .citizen(resident())
        .build()
        .unwrap();

        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert_eq!(rec.starts, (0..5).map(Tick).collect::<Vec<_>>());
        assert_eq!(rec.ends, rec.starts);
        assert_eq!(rec.snapshots, vec![(Tick(0), 1), (Tick(2), 1), (Tick(4), 1)]);
        assert_eq!(rec.finished, Some(Tick(5)));
        assert_eq!(sim.tick(), Tick(5));
        // The observer saw exactly what is still in the log.
        assert_eq!(rec.events, sim.drain_events());
        assert!(sim.events().is_empty());
    }

    #[test]
    fn run_ticks_ignores_end_tick() {
        let t = town();
        let mut sim = build(t, 3, quiet_behavior(), vec![]);
        sim.run_ticks(10, &mut NoopObserver).unwrap();
        assert_eq!(sim.tick(), Tick(10));
    }

    #[test]
    fn unemployed_resident_finds_work_and_works_a_shift() {
        let t = town();
        let work = t.work;
        // Hired at tick 1, leaves at 8, works 19-20, home again at 30.
        let mut sim = build(t, 32, quiet_behavior(), vec![resident()]);
        sim.run(&mut NoopObserver).unwrap();

        let events = sim.drain_events();
        assert!(events.contains(&SimEvent::Hired { citizen: CitizenId(0), building: work }));
        assert!(events.contains(&SimEvent::StateChanged {
            citizen: CitizenId(0),
            from:    CitizenState::GoingToWork,
            to:      CitizenState::Working,
        }));

        let c = sim.citizens.get(CitizenId(0)).unwrap();
        assert_eq!(c.last_work_day, Some(0));
        assert_eq!(c.position(), Position::new(2, 3), "back home");
        assert_eq!(c.state, CitizenState::Idle);
        assert_eq!(sim.registry.facility::<Workplace>(work).unwrap().worked_ticks, 2);

        let census = sim.census();
        assert_eq!(census.population, 1);
        assert_eq!(census.employed, 1);
        assert_eq!(census.homeless, 0);
    }

    #[test]
    fn same_seed_same_history() {
        let behavior = BehaviorConfig {
            shopping_chance:        0.5,
            utility_failure_chance: 0.05,
            ..quiet_behavior()
        };
        let run = || {
            let mut t = town();
            place(&mut t.registry, &mut t.map, 6, 4, 1, 1, BuildingKind::Shop, Commercial::new(1, 2, 2));
            place(&mut t.registry, &mut t.map, 14, 4, 1, 1, BuildingKind::Plant, Utilities::new());
            let mut sim = build(t, 72, behavior.clone(), vec![resident(), resident(), resident()]);
            sim.run(&mut NoopObserver).unwrap();
            sim.drain_events()
        };
        let a = run();
        assert!(!a.is_empty());
        assert_eq!(a, run());
    }

    #[test]
    fn the_dead_leave_every_roster() {
        let t = town();
        let home = t.home;
        let old = resident().age(99).first_birthday(Tick(0));
        let mut sim = build(t, 3, quiet_behavior(), vec![old]);
        sim.run(&mut NoopObserver).unwrap();

        assert!(sim.citizens.is_empty());
        assert!(sim.queues.is_empty());
        assert!(sim.registry.facility::<Housing>(home).unwrap().residents.is_empty());
        assert!(sim.drain_events().contains(&SimEvent::Died { citizen: CitizenId(0), age: 100 }));
    }

    #[test]
    fn birth_wish_becomes_a_newborn_at_home() {
        let t = town();
        let home = t.home;
        let behavior = BehaviorConfig { birth_chance: 1.0, ..quiet_behavior() };
        let parent = resident().first_birthday(Tick(0));
        let mut sim = build(t, 3, behavior, vec![parent]);
        sim.run(&mut NoopObserver).unwrap();

        assert_eq!(sim.citizens.len(), 2);
        let baby = sim.citizens.get(CitizenId(1)).unwrap();
        assert_eq!(baby.age, 0);
        assert_eq!(baby.home, Some(home));
        assert_eq!(baby.position(), Position::new(2, 3));
        assert_eq!(
            sim.registry.facility::<Housing>(home).unwrap().residents,
            vec![CitizenId(0), CitizenId(1)]
        );
        assert!(sim.drain_events().contains(&SimEvent::Born {
            citizen: CitizenId(1),
            parent:  CitizenId(0),
            home,
        }));
        assert!(!sim.citizens.get(CitizenId(0)).unwrap().wants_child);
    }

    #[test]
    fn utilities_break_and_a_technician_repairs_them() {
        let mut t = town();
        let plant = place(&mut t.registry, &mut t.map, 6, 4, 1, 1, BuildingKind::Plant, Utilities::new());
        let mut sim = build(t, 24, quiet_behavior(), vec![]);

        sim.behavior.utility_failure_chance = 1.0;
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        sim.behavior.utility_failure_chance = 0.0;
        assert!(sim.registry.facility::<Utilities>(plant).unwrap().needs_repair());
        assert!(matches!(sim.events()[0], SimEvent::UtilityFailed { building, .. } if building == plant));

        // A technician employed at the workshop, standing next to it.
        let work = sim
            .registry
            .ids()
            .find(|&b| sim.registry.kind(b) == Some(BuildingKind::Workshop))
            .unwrap();
        let tech = sim
            .spawn_citizen(
                CitizenBuilder::new(Position::new(10, 3))
                    .age(40)
                    .education(EducationLevel::University)
                    .first_birthday(Tick(u64::MAX)),
            )
            .unwrap();
        sim.registry.facility_mut::<Workplace>(work).unwrap().hire(tech);
        {
            let c = sim.citizens.get_mut(tech).unwrap();
            c.workplace = Some(work);
            c.profession = Profession::Technician;
        }

        // Repairs only happen in working hours.
        sim.run_ticks(23, &mut NoopObserver).unwrap();
        assert!(!sim.registry.facility::<Utilities>(plant).unwrap().needs_repair());
        assert!(sim.drain_events().iter().any(|e| matches!(
            e,
            SimEvent::Repaired { citizen, building, .. } if *citizen == tech && *building == plant
        )));
    }

    #[test]
    fn spawn_citizen_into_a_full_home_errors() {
        let t = town();
        let mut sim = build(t, 3, quiet_behavior(), vec![resident(), resident(), resident()]);
        assert!(matches!(sim.spawn_citizen(resident()), Err(SimError::HomeFull { .. })));
        assert_eq!(sim.citizens.len(), 3);
    }

    #[test]
    fn commercial_queue_admits_between_ticks() {
        let mut t = town();
        let shop = place(&mut t.registry, &mut t.map, 6, 4, 1, 1, BuildingKind::Shop, Commercial::new(1, 3, 5));
        let mut sim = build(t, 3, quiet_behavior(), vec![]);
        {
            let s = sim.registry.facility_mut::<Commercial>(shop).unwrap();
            assert!(s.try_enter(CitizenId(90)));
            assert!(s.try_join_queue(CitizenId(91)));
            s.leave(CitizenId(90));
        }
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        let s = sim.registry.facility::<Commercial>(shop).unwrap();
        assert!(s.is_visitor(CitizenId(91)));
        assert_eq!(s.current_queue(), 0);
    }
}
