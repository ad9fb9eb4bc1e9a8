//! Fluent builder for constructing a [`Sim`].

use tc_agent::{CitizenBuilder, CitizenStore};
use tc_behavior::{BehaviorConfig, TaskQueues};
use tc_core::{BuildingId, CitizenId, SimConfig, SimRng, Tick};
use tc_mobility::EntityMovementService;
use tc_registry::{BuildingRegistry, Housing};
use tc_spatial::{GridMap, PathFinder};
use tracing::info;

use crate::{Sim, SimError, SimResult, SimSettings};

/// Seed offset of the stream that staggers initial birthdays.
const BIRTHDAY_STREAM: u64 = 1;
/// Seed offset of the stream used by the tick loop.
const TICK_STREAM: u64 = 2;

/// Fluent builder for [`Sim<F>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: ticks per hour, total ticks, seed, snapshot interval
/// - [`GridMap`] + [`BuildingRegistry`]: the town, buildings already placed
/// - `F: PathFinder`: e.g. [`tc_spatial::AStarPathFinder`]
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                   |
/// |-------------------|---------------------------|
/// | `.behavior(c)`    | `BehaviorConfig::default()` |
/// | `.citizens(v)`    | no citizens               |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, map, registry, AStarPathFinder)
///     .citizens(load_citizens_csv(path)?)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<F: PathFinder> {
    config:     SimConfig,
    behavior:   BehaviorConfig,
    map:        GridMap,
    registry:   BuildingRegistry,
    population: Vec<CitizenBuilder>,
    finder:     F,
}

impl<F: PathFinder> SimBuilder<F> {
    pub fn new(config: SimConfig, map: GridMap, registry: BuildingRegistry, finder: F) -> Self {
        Self {
            config,
            behavior: BehaviorConfig::default(),
            map,
            registry,
            population: Vec::new(),
            finder,
        }
    }

    pub fn behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    /// Take both config tables from loaded settings.
    pub fn settings(mut self, settings: SimSettings) -> Self {
        self.config = settings.sim;
        self.behavior = settings.behavior;
        self
    }

    /// Append citizens.  Ids are assigned in order, starting at 0.
    pub fn citizens(mut self, citizens: impl IntoIterator<Item = CitizenBuilder>) -> Self {
        self.population.extend(citizens);
        self
    }

    pub fn citizen(mut self, citizen: CitizenBuilder) -> Self {
        self.population.push(citizen);
        self
    }

    /// Validate inputs, resolve homes, move citizens in, and return a
    /// ready-to-run [`Sim`].
    ///
    /// # Errors
    ///
    /// Invalid settings, a citizen starting off the map, or a home that does
    /// not resolve to housing with a free slot.
    pub fn build(mut self) -> SimResult<Sim<F>> {
        SimSettings { sim: self.config.clone(), behavior: self.behavior.clone() }.validate()?;

        let mut rng = SimRng::new(self.config.seed);
        let mut birthdays = rng.child(BIRTHDAY_STREAM);
        let tick_rng = rng.child(TICK_STREAM);
        let year = self.behavior.ticks_per_year;

        let mut citizens = CitizenStore::new();
        for (index, builder) in std::mem::take(&mut self.population).into_iter().enumerate() {
            if !self.map.in_bounds(builder.position()) {
                return Err(SimError::OutOfMap { index, position: builder.position() });
            }
            let home = resolve_home(&self.registry, &builder, index)?;
            let builder = match home {
                Some(home) => builder.home(home),
                None => builder,
            };
            let first_birthday = Tick(birthdays.gen_range(1..=year));
            let id = citizens.spawn(builder, self.config.seed, first_birthday);
            if let Some(home) = home {
                settle(&mut self.registry, id, home);
            }
        }

        info!(
            citizens  = citizens.len(),
            buildings = self.registry.len(),
            seed      = self.config.seed,
            "simulation built"
        );

        Ok(Sim {
            clock:    self.config.make_clock(),
            config:   self.config,
            behavior: self.behavior,
            map:      self.map,
            registry: self.registry,
            citizens,
            queues:   TaskQueues::new(),
            movement: EntityMovementService::new(self.finder),
            rng:      tick_rng,
            events:   Vec::new(),
        })
    }
}

/// Resolve a builder's home to a live housing building with a free slot.
///
/// An explicit id wins over a tile hint.  `index` only labels errors.
pub(crate) fn resolve_home(
    registry: &BuildingRegistry,
    builder:  &CitizenBuilder,
    index:    usize,
) -> SimResult<Option<BuildingId>> {
    let home = match (builder.home_id(), builder.home_hint()) {
        (Some(id), _) => id,
        (None, Some(tile)) => registry
            .building_at(tile)
            .ok_or(SimError::NoBuildingAt { index, tile })?,
        (None, None) => return Ok(None),
    };
    match registry.facility::<Housing>(home) {
        None => Err(SimError::NotHousing { index, home }),
        Some(h) if !h.has_vacancy() => Err(SimError::HomeFull { index, home }),
        Some(_) => Ok(Some(home)),
    }
}

/// Add `citizen` to the resident list of an already-checked home.
pub(crate) fn settle(registry: &mut BuildingRegistry, citizen: CitizenId, home: BuildingId) {
    if let Some(housing) = registry.facility_mut::<Housing>(home) {
        housing.move_in(citizen);
    }
}
