//! Fluent builder for a single `Citizen`.
//!
//! # Usage
//!
//! ```rust
//! use tc_agent::{CitizenBuilder, CitizenStore, Profession};
//! use tc_core::{Position, Tick};
//!
//! let mut store = CitizenStore::new();
//! let id = store.spawn(
//!     CitizenBuilder::new(Position::new(3, 4)).age(30).profession(Profession::Clerk),
//!     /*seed=*/ 42,
//!     /*default_birthday=*/ Tick(288),
//! );
//! assert_eq!(store.get(id).map(|c| c.age), Some(30));
//! ```

use tc_core::{AgentRng, BuildingId, CitizenId, NavKind, Position, Tick};
use tc_mobility::MovingEntity;

use crate::{Citizen, CitizenState, EducationLevel, Profession};

/// Collects a citizen's initial attributes.  Everything but the position has
/// a default (adult, unemployed, uneducated pedestrian, homeless).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CitizenBuilder {
    position:       Position,
    age:            u32,
    profession:     Profession,
    education:      EducationLevel,
    nav:            NavKind,
    ticks_per_tile: u32,
    home:           Option<BuildingId>,
    home_at:        Option<Position>,
    next_birthday:  Option<Tick>,
}

impl CitizenBuilder {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            age:            20,
            profession:     Profession::Unemployed,
            education:      EducationLevel::None,
            nav:            NavKind::Pedestrian,
            ticks_per_tile: 1,
            home:           None,
            home_at:        None,
            next_birthday:  None,
        }
    }

    pub fn age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    pub fn profession(mut self, profession: Profession) -> Self {
        self.profession = profession;
        self
    }

    pub fn education(mut self, education: EducationLevel) -> Self {
        self.education = education;
        self
    }

    pub fn nav(mut self, nav: NavKind) -> Self {
        self.nav = nav;
        self
    }

    /// Ticks per tile; see [`MovingEntity::with_speed`].
    pub fn speed(mut self, ticks_per_tile: u32) -> Self {
        self.ticks_per_tile = ticks_per_tile;
        self
    }

    pub fn home(mut self, home: BuildingId) -> Self {
        self.home = Some(home);
        self
    }

    /// Name the home by any tile of its footprint.  Resolved to a
    /// `BuildingId` by whoever owns the registry (see `SimBuilder`).
    pub fn home_at(mut self, tile: Position) -> Self {
        self.home_at = Some(tile);
        self
    }

    pub fn first_birthday(mut self, tick: Tick) -> Self {
        self.next_birthday = Some(tick);
        self
    }

    // ── Accessors used while resolving homes ──────────────────────────────

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn home_id(&self) -> Option<BuildingId> {
        self.home
    }

    #[inline]
    pub fn home_hint(&self) -> Option<Position> {
        self.home_at
    }

    /// Construct the citizen.
    ///
    /// The per-citizen RNG is seeded from `global_seed` and `id`.
    /// `default_birthday` is used when no first birthday was set.
    pub fn build(self, id: CitizenId, global_seed: u64, default_birthday: Tick) -> Citizen {
        Citizen {
            id,
            motion:             MovingEntity::at(self.position).with_speed(self.ticks_per_tile),
            nav:                self.nav,
            age:                self.age,
            profession:         self.profession,
            education:          self.education,
            home:               self.home,
            workplace:          None,
            study_place:        None,
            state:              CitizenState::Idle,
            study_progress:     0,
            last_work_day:      None,
            last_study_day:     None,
            last_visit_day:     None,
            next_birthday:      self.next_birthday.unwrap_or(default_birthday),
            next_job_search:    Tick::ZERO,
            next_school_search: Tick::ZERO,
            plan_after:         Tick::ZERO,
            alive:              true,
            wants_child:        false,
            rng:                AgentRng::new(global_seed, id),
        }
    }
}
