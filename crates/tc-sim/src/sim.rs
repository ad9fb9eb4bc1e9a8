//! The `Sim` struct and its tick loop.

use tc_agent::{CitizenBuilder, CitizenState, CitizenStore};
use tc_behavior::{handle, BehaviorConfig, BehaviorContext, Scheduler, SimEvent, TaskQueues};
use tc_core::{BuildingId, CitizenId, SimClock, SimConfig, SimRng, Tick};
use tc_mobility::EntityMovementService;
use tc_registry::{BuildingRegistry, Commercial, Housing, UtilityKind, Utilities};
use tc_spatial::{profile_for, GridMap, PathFinder};
use tracing::{debug, info};

use crate::builder::{resolve_home, settle};
use crate::{SimObserver, SimResult};

// ── Census ────────────────────────────────────────────────────────────────────

/// Population counts at one instant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Census {
    pub population: usize,
    pub employed:   usize,
    pub students:   usize,
    pub homeless:   usize,
    /// `(state, count)` in `CitizenState::ALL` order, zero counts included.
    pub by_state:   Vec<(CitizenState, usize)>,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<F>` owns the whole world and drives the tick loop:
///
/// 1. **Upkeep**: every commercial building admits queued customers into
///    free slots; every building with utilities may lose one at random.
/// 2. **Citizens** (ascending `CitizenId` for determinism): the state
///    handler runs the current task, then the scheduler refills an empty
///    queue.
/// 3. **Demography**: citizens who died this tick are removed from the
///    store and from every facility roster; birth wishes become newborns
///    in the parent's home if it still has room.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<F: PathFinder> {
    /// Run configuration (ticks per hour, total ticks, seed, …).
    pub config: SimConfig,

    /// Simulation clock: tracks the current tick and the calendar.
    pub clock: SimClock,

    /// Scenario and task tunables.
    pub behavior: BehaviorConfig,

    pub map: GridMap,

    pub registry: BuildingRegistry,

    pub citizens: CitizenStore,

    /// Per-citizen plans.
    pub queues: TaskQueues,

    pub movement: EntityMovementService<F>,

    /// Global RNG for upkeep draws.  Citizens roll on their own RNGs.
    pub rng: SimRng,

    pub(crate) events: Vec<SimEvent>,
}

impl<F: PathFinder> Sim<F> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer);
        }
        Ok(())
    }

    #[inline]
    pub fn tick(&self) -> Tick {
        self.clock.current_tick
    }

    /// Add a citizen mid-run.  Its home (if any) must resolve to housing
    /// with a free slot.
    pub fn spawn_citizen(&mut self, builder: CitizenBuilder) -> SimResult<CitizenId> {
        let index = self.citizens.len();
        let home = resolve_home(&self.registry, &builder, index)?;
        let builder = match home {
            Some(home) => builder.home(home),
            None => builder,
        };
        let first_birthday = self.clock.current_tick + self.behavior.ticks_per_year;
        let id = self.citizens.spawn(builder, self.config.seed, first_birthday);
        if let Some(home) = home {
            settle(&mut self.registry, id, home);
        }
        Ok(id)
    }

    /// Everything recorded since the last drain, in order.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Undrained events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn census(&self) -> Census {
        let mut census = Census {
            population: self.citizens.len(),
            by_state: CitizenState::ALL.iter().map(|&s| (s, self.citizens.count_in(s))).collect(),
            ..Census::default()
        };
        for c in self.citizens.iter() {
            census.employed += usize::from(c.workplace.is_some_and(|w| self.registry.contains(w)));
            census.students += usize::from(c.study_place.is_some_and(|s| self.registry.contains(s)));
            census.homeless += usize::from(!c.home.is_some_and(|h| self.registry.contains(h)));
        }
        census
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock.current_tick;
        let first = self.events.len();

        observer.on_tick_start(now);
        self.process_tick(now);
        observer.on_tick_end(now, &self.events[first..]);

        let interval = self.config.snapshot_interval_ticks;
        if interval > 0 && now.0.is_multiple_of(interval) {
            observer.on_snapshot(now, &self.citizens, &self.registry);
        }
        self.clock.advance();
    }

    fn process_tick(&mut self, now: Tick) {
        self.upkeep(now);
        self.citizen_pass(now);
        self.demography(now);
    }

    /// Phase 1: queues and random breakdowns.
    fn upkeep(&mut self, now: Tick) {
        for (id, shop) in self.registry.buildings_mut::<Commercial>() {
            let admitted = shop.process_queue();
            if !admitted.is_empty() {
                debug!(tick = %now, building = %id, admitted = admitted.len(), "queue advanced");
            }
        }

        let chance = self.behavior.utility_failure_chance;
        if chance <= 0.0 {
            return;
        }
        for (building, utilities) in self.registry.buildings_mut::<Utilities>() {
            if !self.rng.gen_bool(chance) {
                continue;
            }
            let kind = UtilityKind::ALL[self.rng.gen_range(0..UtilityKind::ALL.len())];
            if utilities.break_utility(kind) {
                debug!(tick = %now, %building, utility = ?kind, "utility failed");
                self.events.push(SimEvent::UtilityFailed { building, utility: kind });
            }
        }
    }

    /// Phase 2: handler then scheduler for each citizen, ascending id.
    fn citizen_pass(&mut self, now: Tick) {
        for id in self.citizens.ids() {
            let Some(citizen) = self.citizens.get_mut(id) else { continue };
            if !citizen.alive {
                continue;
            }
            let queue = self.queues.entry(id);
            let mut ctx = BehaviorContext {
                tick:     now,
                clock:    &self.clock,
                config:   &self.behavior,
                map:      &self.map,
                registry: &mut self.registry,
                movement: &self.movement,
                events:   &mut self.events,
            };
            handle(citizen, queue, &mut ctx);
            if citizen.alive {
                Scheduler::plan(citizen, queue, &mut ctx);
            }
        }
    }

    /// Phase 3: remove the dead, then deliver births.
    fn demography(&mut self, now: Tick) {
        let dead: Vec<CitizenId> =
            self.citizens.iter().filter(|c| !c.alive).map(|c| c.id).collect();
        for id in dead {
            let Some(citizen) = self.citizens.remove(id) else { continue };
            self.registry.release_citizen(id);
            self.queues.remove(id);
            info!(tick = %now, citizen = %id, age = citizen.age, "died");
            self.events.push(SimEvent::Died { citizen: id, age: citizen.age });
        }

        let parents: Vec<(CitizenId, Option<BuildingId>)> = self
            .citizens
            .iter_mut()
            .filter(|c| c.wants_child)
            .map(|c| {
                c.wants_child = false;
                (c.id, c.home)
            })
            .collect();
        for (parent, home) in parents {
            self.deliver_child(now, parent, home);
        }
    }

    fn deliver_child(&mut self, now: Tick, parent: CitizenId, home: Option<BuildingId>) {
        let Some(home) = home else { return };
        let room = self.registry.facility::<Housing>(home).is_some_and(Housing::has_vacancy);
        let Some(parent_citizen) = self.citizens.get(parent) else { return };
        if !room {
            debug!(tick = %now, %parent, %home, "birth skipped: home full");
            return;
        }

        // Born next to the home's entrance when possible, else beside the parent.
        let profile = profile_for(parent_citizen.nav);
        let entrance = self.registry.entrance(home);
        let birthplace = self
            .registry
            .accessible_neighbor_tiles(home, &self.map, profile)
            .into_iter()
            .min_by_key(|p| entrance.map_or(0, |e| p.manhattan(e)))
            .unwrap_or(parent_citizen.position());

        let child = CitizenBuilder::new(birthplace)
            .age(0)
            .home(home)
            .first_birthday(now + self.behavior.ticks_per_year);
        let id = self.citizens.spawn(child, self.config.seed, now);
        settle(&mut self.registry, id, home);
        info!(tick = %now, citizen = %id, %parent, %home, "born");
        self.events.push(SimEvent::Born { citizen: id, parent, home });
    }
}
