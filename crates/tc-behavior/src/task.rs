//! The closed set of citizen tasks.
//!
//! A task is one step of a plan.  [`Task::execute`] is called once per tick
//! while the task is current; it makes at most one tile of progress or one
//! instantaneous change and returns a [`TaskStatus`].
//!
//! | Task                | Completes when                                   |
//! |---------------------|--------------------------------------------------|
//! | `MoveToPosition`    | the citizen stands on the target tile            |
//! | `MoveToBuilding`    | the citizen stands next to the building          |
//! | `FindJob`           | always, in one tick (success = workplace set)    |
//! | `FindEducation`     | always, in one tick (success = study place set)  |
//! | `PerformWork`       | its tick counter runs out                        |
//! | `Study`             | its tick counter runs out or the course is done  |
//! | `RepairBuilding`    | in one tick, after fixing every broken utility   |
//! | `CommercialService` | the shop has served the citizen                  |
//! | `AgeUp`             | in one tick                                      |

use tracing::debug;

use tc_agent::{Citizen, CitizenState, LifeStage};
use tc_core::{BuildingId, Position};
use tc_mobility::Step;
use tc_registry::{Commercial, Housing, School, Utilities, Workplace};
use tc_spatial::{profile_for, NavigationProfile};

use crate::{BehaviorContext, SimEvent};

// ── Status ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TaskStatus {
    /// Call again next tick.
    Running,
    /// Done; advance to the next task.
    Completed,
    /// Cannot make progress; abandon the plan.
    Failed,
}

// ── Auxiliary enums ───────────────────────────────────────────────────────────

/// Why a citizen is walking to a building.  Decides the travel state set when
/// the trip starts from `Idle`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum TripPurpose {
    Work,
    Study,
    Home,
    Repair,
    Shopping,
}

impl TripPurpose {
    pub fn travel_state(self) -> CitizenState {
        match self {
            TripPurpose::Work     => CitizenState::GoingToWork,
            TripPurpose::Study    => CitizenState::GoingToStudy,
            TripPurpose::Home     => CitizenState::GoingHome,
            TripPurpose::Repair   => CitizenState::GoingToSite,
            TripPurpose::Shopping => CitizenState::GoingToCommercial,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum CommercialPhase {
    /// Waiting to be admitted.
    Queue,
    BeingServed,
    Served,
}

// ── Task ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Task {
    MoveToPosition {
        target:  Position,
        started: bool,
    },
    MoveToBuilding {
        building: BuildingId,
        purpose:  TripPurpose,
        started:  bool,
    },
    FindJob,
    FindEducation,
    PerformWork {
        building:  BuildingId,
        remaining: u64,
    },
    Study {
        building:  BuildingId,
        remaining: u64,
    },
    RepairBuilding {
        building: BuildingId,
    },
    CommercialService {
        building:     BuildingId,
        phase:        CommercialPhase,
        served_ticks: u32,
        waited_ticks: u32,
    },
    /// Yearly demography check: ageing, retirement, mortality, birth wish.
    AgeUp,
}

impl Task {
    // ── Constructors ──────────────────────────────────────────────────────

    pub fn move_to(target: Position) -> Task {
        Task::MoveToPosition { target, started: false }
    }

    pub fn move_to_building(building: BuildingId, purpose: TripPurpose) -> Task {
        Task::MoveToBuilding { building, purpose, started: false }
    }

    pub fn work(building: BuildingId, ticks: u64) -> Task {
        Task::PerformWork { building, remaining: ticks }
    }

    pub fn study(building: BuildingId, ticks: u64) -> Task {
        Task::Study { building, remaining: ticks }
    }

    pub fn shop(building: BuildingId) -> Task {
        Task::CommercialService {
            building,
            phase:        CommercialPhase::Queue,
            served_ticks: 0,
            waited_ticks: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Task::MoveToPosition { .. }    => "move_to_position",
            Task::MoveToBuilding { .. }    => "move_to_building",
            Task::FindJob                  => "find_job",
            Task::FindEducation            => "find_education",
            Task::PerformWork { .. }       => "perform_work",
            Task::Study { .. }             => "study",
            Task::RepairBuilding { .. }    => "repair_building",
            Task::CommercialService { .. } => "commercial_service",
            Task::AgeUp                    => "age_up",
        }
    }

    #[inline]
    pub fn is_move(&self) -> bool {
        matches!(self, Task::MoveToPosition { .. } | Task::MoveToBuilding { .. })
    }

    // ── Execution ─────────────────────────────────────────────────────────

    /// Advance this task by one tick for `citizen`.
    pub fn execute(&mut self, citizen: &mut Citizen, ctx: &mut BehaviorContext<'_>) -> TaskStatus {
        match self {
            Task::MoveToPosition { target, started } => {
                move_to_position(*target, started, citizen, ctx)
            }
            Task::MoveToBuilding { building, purpose, started } => {
                move_to_building(*building, *purpose, started, citizen, ctx)
            }
            Task::FindJob => find_job(citizen, ctx),
            Task::FindEducation => find_education(citizen, ctx),
            Task::PerformWork { building, remaining } => perform_work(*building, remaining, citizen, ctx),
            Task::Study { building, remaining } => study(*building, remaining, citizen, ctx),
            Task::RepairBuilding { building } => repair(*building, citizen, ctx),
            Task::CommercialService { building, phase, served_ticks, waited_ticks } => {
                commercial_service(*building, phase, served_ticks, waited_ticks, citizen, ctx)
            }
            Task::AgeUp => age_up(citizen, ctx),
        }
    }
}

// ── Arrival ───────────────────────────────────────────────────────────────────

/// `true` if `pos` is on the 4-adjacent ring of `building`'s footprint.
///
/// The one "is at building" predicate: trips end on such a tile, and nothing
/// downstream re-checks distances.
pub fn is_at_building(ctx: &BehaviorContext<'_>, building: BuildingId, pos: Position) -> bool {
    ctx.registry.placement(building).is_some_and(|p| p.borders(pos))
}

/// Pick the tile a trip to `building` should end on.
///
/// The citizen's own tile if it already borders the building, otherwise the
/// accessible neighbour closest to the entrance (first in ring order on
/// ties).  `None` if the building is gone or fully enclosed.
fn arrival_tile(
    ctx:      &BehaviorContext<'_>,
    building: BuildingId,
    from:     Position,
    profile:  &dyn NavigationProfile,
) -> Option<Position> {
    let entrance = ctx.registry.entrance(building)?;
    if is_at_building(ctx, building, from) {
        return Some(from);
    }
    ctx.registry
        .accessible_neighbor_tiles(building, ctx.map, profile)
        .into_iter()
        .min_by_key(|p| p.manhattan(entrance))
}

// ── Movement ──────────────────────────────────────────────────────────────────

/// First call: set the target (failing if unreachable).  Later calls: step.
fn start_or_step(
    target:  Position,
    started: &mut bool,
    citizen: &mut Citizen,
    ctx:     &mut BehaviorContext<'_>,
) -> TaskStatus {
    let profile = profile_for(citizen.nav);
    if !*started {
        *started = true;
        if let Err(e) = ctx.movement.set_target(&mut citizen.motion, target, ctx.map, profile) {
            debug!(citizen = %citizen.id, %target, error = %e, "trip unreachable");
            return TaskStatus::Failed;
        }
        return if ctx.movement.has_arrived(&citizen.motion) {
            TaskStatus::Completed
        } else {
            TaskStatus::Running
        };
    }

    match ctx.movement.play_movement(&mut citizen.motion, ctx.map, profile, ctx.tick) {
        Step::Stalled => TaskStatus::Failed,
        _ if ctx.movement.has_arrived(&citizen.motion) => TaskStatus::Completed,
        _ => TaskStatus::Running,
    }
}

fn move_to_position(
    target:  Position,
    started: &mut bool,
    citizen: &mut Citizen,
    ctx:     &mut BehaviorContext<'_>,
) -> TaskStatus {
    if !*started && citizen.state == CitizenState::Idle {
        ctx.set_state(citizen, CitizenState::InTransport);
    }
    start_or_step(target, started, citizen, ctx)
}

fn move_to_building(
    building: BuildingId,
    purpose:  TripPurpose,
    started:  &mut bool,
    citizen:  &mut Citizen,
    ctx:      &mut BehaviorContext<'_>,
) -> TaskStatus {
    if !ctx.registry.contains(building) {
        debug!(citizen = %citizen.id, %building, "trip destination no longer exists");
        return TaskStatus::Failed;
    }
    if *started {
        return start_or_step(citizen.motion.target, started, citizen, ctx);
    }

    let profile = profile_for(citizen.nav);
    let Some(target) = arrival_tile(ctx, building, citizen.position(), profile) else {
        debug!(citizen = %citizen.id, %building, "no accessible tile next to building");
        return TaskStatus::Failed;
    };
    if citizen.state == CitizenState::Idle {
        ctx.set_state(citizen, purpose.travel_state());
    }
    start_or_step(target, started, citizen, ctx)
}

// ── Searches ──────────────────────────────────────────────────────────────────

fn find_job(citizen: &mut Citizen, ctx: &mut BehaviorContext<'_>) -> TaskStatus {
    if citizen.workplace.is_some_and(|w| !ctx.registry.contains(w)) {
        citizen.quit_job();
    }
    if citizen.workplace.is_some() || !citizen.life_stage().can_work() {
        return TaskStatus::Completed;
    }

    let education = citizen.education;
    let found = ctx
        .registry
        .nearest::<Workplace, _>(citizen.position(), |_, w| w.has_capacity() && w.accepts(education));
    let hired = found.and_then(|b| {
        let w = ctx.registry.facility_mut::<Workplace>(b)?;
        w.hire(citizen.id).then_some((b, w.profession))
    });

    match hired {
        Some((building, profession)) => {
            citizen.workplace = Some(building);
            citizen.profession = profession;
            debug!(citizen = %citizen.id, %building, %profession, "hired");
            ctx.emit(SimEvent::Hired { citizen: citizen.id, building });
        }
        None => {
            citizen.next_job_search = ctx.tick + ctx.config.search_cooldown_ticks(ctx.clock);
            ctx.emit(SimEvent::JobSearchFailed { citizen: citizen.id });
        }
    }
    TaskStatus::Completed
}

fn find_education(citizen: &mut Citizen, ctx: &mut BehaviorContext<'_>) -> TaskStatus {
    if citizen.study_place.is_some_and(|s| !ctx.registry.contains(s)) {
        citizen.leave_school();
    }
    if citizen.study_place.is_some() || !citizen.life_stage().can_study() {
        return TaskStatus::Completed;
    }

    let education = citizen.education;
    let found = ctx
        .registry
        .nearest::<School, _>(citizen.position(), |_, s| s.has_capacity() && s.teaches(education));
    let enrolled = found.filter(|&b| {
        ctx.registry.facility_mut::<School>(b).is_some_and(|s| s.enroll(citizen.id))
    });

    match enrolled {
        Some(building) => {
            citizen.study_place = Some(building);
            citizen.study_progress = 0;
            debug!(citizen = %citizen.id, %building, "enrolled");
            ctx.emit(SimEvent::Enrolled { citizen: citizen.id, building });
        }
        None => {
            citizen.next_school_search = ctx.tick + ctx.config.search_cooldown_ticks(ctx.clock);
            ctx.emit(SimEvent::EducationSearchFailed { citizen: citizen.id });
        }
    }
    TaskStatus::Completed
}

// ── Time spent ────────────────────────────────────────────────────────────────

fn perform_work(
    building:  BuildingId,
    remaining: &mut u64,
    citizen:   &mut Citizen,
    ctx:       &mut BehaviorContext<'_>,
) -> TaskStatus {
    let Some(workplace) = ctx.registry.facility_mut::<Workplace>(building) else {
        citizen.quit_job();
        return TaskStatus::Failed;
    };
    if *remaining > 0 {
        *remaining -= 1;
        workplace.record_work(1);
    }
    if *remaining == 0 {
        citizen.last_work_day = Some(ctx.day());
        TaskStatus::Completed
    } else {
        TaskStatus::Running
    }
}

fn study(
    building:  BuildingId,
    remaining: &mut u64,
    citizen:   &mut Citizen,
    ctx:       &mut BehaviorContext<'_>,
) -> TaskStatus {
    let day = ctx.day();
    let Some(school) = ctx.registry.facility_mut::<School>(building) else {
        citizen.leave_school();
        return TaskStatus::Failed;
    };
    if *remaining > 0 {
        *remaining -= 1;
        citizen.study_progress += 1;
    }

    if citizen.study_progress >= school.course_ticks {
        let level = school.level;
        school.graduate(citizen.id);
        citizen.education = citizen.education.max(level);
        citizen.leave_school();
        citizen.last_study_day = Some(day);
        debug!(citizen = %citizen.id, %level, "graduated");
        ctx.emit(SimEvent::Graduated { citizen: citizen.id, level });
        return TaskStatus::Completed;
    }
    if *remaining == 0 {
        citizen.last_study_day = Some(day);
        TaskStatus::Completed
    } else {
        TaskStatus::Running
    }
}

// ── Repair ────────────────────────────────────────────────────────────────────

fn repair(building: BuildingId, citizen: &mut Citizen, ctx: &mut BehaviorContext<'_>) -> TaskStatus {
    let Some(utilities) = ctx.registry.facility_mut::<Utilities>(building) else {
        return TaskStatus::Failed;
    };
    let fixed = utilities.broken_utilities();
    for &kind in &fixed {
        utilities.fix_utility(kind);
    }
    if !fixed.is_empty() {
        debug!(citizen = %citizen.id, %building, count = fixed.len(), "repaired");
        ctx.emit(SimEvent::Repaired { citizen: citizen.id, building, utilities: fixed });
    }
    TaskStatus::Completed
}

// ── Shopping ──────────────────────────────────────────────────────────────────

fn commercial_service(
    building:     BuildingId,
    phase:        &mut CommercialPhase,
    served_ticks: &mut u32,
    waited_ticks: &mut u32,
    citizen:      &mut Citizen,
    ctx:          &mut BehaviorContext<'_>,
) -> TaskStatus {
    let patience = ctx.config.shopping_patience_ticks;
    let day = ctx.day();
    let Some(shop) = ctx.registry.facility_mut::<Commercial>(building) else {
        return TaskStatus::Failed;
    };

    match *phase {
        CommercialPhase::Queue => {
            if shop.try_enter(citizen.id) {
                *phase = CommercialPhase::BeingServed;
            } else {
                // A full queue is not an error; keep polling until patience runs out.
                shop.try_join_queue(citizen.id);
                *waited_ticks += 1;
                if *waited_ticks > patience {
                    shop.leave(citizen.id);
                    debug!(citizen = %citizen.id, %building, "gave up waiting");
                    return TaskStatus::Failed;
                }
            }
            TaskStatus::Running
        }
        CommercialPhase::BeingServed => {
            *served_ticks += 1;
            if *served_ticks < shop.service_ticks {
                return TaskStatus::Running;
            }
            shop.leave(citizen.id);
            shop.record_visit();
            *phase = CommercialPhase::Served;
            citizen.last_visit_day = Some(day);
            ctx.emit(SimEvent::Visited { citizen: citizen.id, building });
            ctx.set_state(citizen, CitizenState::GoingHomeFromCommercial);
            TaskStatus::Completed
        }
        CommercialPhase::Served => TaskStatus::Completed,
    }
}

// ── Demography ────────────────────────────────────────────────────────────────

fn age_up(citizen: &mut Citizen, ctx: &mut BehaviorContext<'_>) -> TaskStatus {
    let cfg = ctx.config;
    citizen.age += 1;
    citizen.next_birthday = ctx.tick + cfg.ticks_per_year;
    ctx.emit(SimEvent::Aged { citizen: citizen.id, age: citizen.age });

    // Retirement.
    if citizen.life_stage() == LifeStage::Senior {
        if let Some(work) = citizen.workplace {
            if let Some(w) = ctx.registry.facility_mut::<Workplace>(work) {
                w.fire(citizen.id);
            }
            citizen.quit_job();
            ctx.emit(SimEvent::Retired { citizen: citizen.id });
        }
    }

    // Mortality.
    let age = citizen.age;
    let dies = age >= cfg.max_age
        || (age > cfg.mortality_start_age
            && citizen
                .rng
                .gen_bool((age - cfg.mortality_start_age) as f64 * cfg.mortality_per_year));
    if dies {
        citizen.alive = false;
        return TaskStatus::Completed;
    }

    // Birth wish: only with room at home.
    let fertile = (cfg.birth_min_age..=cfg.birth_max_age).contains(&age);
    let room = citizen
        .home
        .and_then(|h| ctx.registry.facility::<Housing>(h))
        .is_some_and(Housing::has_vacancy);
    if fertile && room && citizen.rng.gen_bool(cfg.birth_chance) {
        citizen.wants_child = true;
    }
    TaskStatus::Completed
}
