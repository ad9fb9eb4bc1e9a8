//! Scenario selection: a fixed-priority rule planner.
//!
//! # Priority
//!
//! | # | Scenario        | Runs when                                              | Plan                                   |
//! |---|-----------------|--------------------------------------------------------|----------------------------------------|
//! | 1 | `Demography`    | the citizen's birthday is due                          | age up                                 |
//! | 2 | `Repair`        | technician, work hours, some building needs repair     | walk to site, repair, walk home        |
//! | 3 | `GoToWork`      | has a job, work hours, hasn't worked today             | walk to work, work a shift, walk home  |
//! | 4 | `GoToStudy`     | has a school, school hours, hasn't studied today       | walk to school, study, walk home       |
//! | 5 | `FindEducation` | school age (or unemployed adult), no school, cooldown over | search                             |
//! | 6 | `FindJob`       | adult, no job, not studying, cooldown over             | search                                 |
//! | 7 | `Shopping`      | shopping hours, not shopped today, random draw         | walk to shop, get served, walk home    |
//! | 8 | `ReturnHome`    | has a home and isn't next to it                        | walk home                              |
//!
//! Predicates are evaluated in this order and the first match wins, so e.g.
//! a citizen with a job never goes looking for school during work hours.

use std::fmt;

use tracing::debug;

use tc_agent::{Citizen, CitizenState, LifeStage, Profession};
use tc_core::BuildingId;
use tc_registry::{Commercial, Utilities};

use crate::task::is_at_building;
use crate::{BehaviorContext, SimEvent, Task, TaskQueue, TripPurpose};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Scenario {
    Demography,
    Repair,
    GoToWork,
    GoToStudy,
    FindEducation,
    FindJob,
    Shopping,
    ReturnHome,
}

impl Scenario {
    /// Evaluation order, highest priority first.
    pub const PRIORITY: [Scenario; 8] = [
        Scenario::Demography,
        Scenario::Repair,
        Scenario::GoToWork,
        Scenario::GoToStudy,
        Scenario::FindEducation,
        Scenario::FindJob,
        Scenario::Shopping,
        Scenario::ReturnHome,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::Demography    => "demography",
            Scenario::Repair        => "repair",
            Scenario::GoToWork      => "go_to_work",
            Scenario::GoToStudy     => "go_to_study",
            Scenario::FindEducation => "find_education",
            Scenario::FindJob       => "find_job",
            Scenario::Shopping      => "shopping",
            Scenario::ReturnHome    => "return_home",
        }
    }

    /// State the citizen enters when the plan is adopted.
    pub fn initial_state(self) -> CitizenState {
        match self {
            Scenario::Demography    => CitizenState::Idle,
            Scenario::Repair        => CitizenState::GoingToSite,
            Scenario::GoToWork      => CitizenState::GoingToWork,
            Scenario::GoToStudy     => CitizenState::GoingToStudy,
            Scenario::FindEducation => CitizenState::SearchingEducation,
            Scenario::FindJob       => CitizenState::SearchingWork,
            Scenario::Shopping      => CitizenState::GoingToCommercial,
            Scenario::ReturnHome    => CitizenState::GoingHome,
        }
    }

    /// Whether this scenario applies to `citizen` right now.
    ///
    /// Takes `&mut Citizen` because `Shopping` draws from the citizen's RNG.
    /// The draw only happens once every other condition holds, so the random
    /// stream advances identically across runs.
    pub fn can_run(self, citizen: &mut Citizen, ctx: &BehaviorContext<'_>) -> bool {
        let cfg = ctx.config;
        let day = Some(ctx.day());
        let stage = citizen.life_stage();
        match self {
            Scenario::Demography => ctx.tick >= citizen.next_birthday,

            Scenario::Repair => {
                citizen.profession == Profession::Technician
                    && live(ctx, citizen.workplace).is_some()
                    && ctx.in_hours(cfg.work_start_hour, cfg.work_end_hour)
                    && ctx.registry.buildings::<Utilities>().any(|(_, u)| u.needs_repair())
            }

            Scenario::GoToWork => {
                stage.can_work()
                    && live(ctx, citizen.workplace).is_some()
                    && citizen.last_work_day != day
                    && ctx.in_hours(cfg.work_start_hour, cfg.work_end_hour)
            }

            Scenario::GoToStudy => {
                stage.can_study()
                    && live(ctx, citizen.study_place).is_some()
                    && citizen.last_study_day != day
                    && ctx.in_hours(cfg.school_start_hour, cfg.school_end_hour)
            }

            Scenario::FindEducation => {
                let eligible = match stage {
                    LifeStage::SchoolAge => true,
                    LifeStage::Adult => live(ctx, citizen.workplace).is_none(),
                    LifeStage::Child | LifeStage::Senior => false,
                };
                eligible
                    && live(ctx, citizen.study_place).is_none()
                    && citizen.education.next().is_some()
                    && ctx.tick >= citizen.next_school_search
            }

            Scenario::FindJob => {
                stage.can_work()
                    && live(ctx, citizen.workplace).is_none()
                    && live(ctx, citizen.study_place).is_none()
                    && ctx.tick >= citizen.next_job_search
            }

            Scenario::Shopping => {
                stage != LifeStage::Child
                    && citizen.last_visit_day != day
                    && ctx.in_hours(cfg.shopping_start_hour, cfg.shopping_end_hour)
                    && ctx.registry.buildings::<Commercial>().next().is_some()
                    && citizen.rng.gen_bool(cfg.shopping_chance)
            }

            Scenario::ReturnHome => live(ctx, citizen.home)
                .is_some_and(|home| !is_at_building(ctx, home, citizen.position())),
        }
    }

    /// Expand the scenario into a plan.  Empty if a target it needs has
    /// disappeared since `can_run`.
    pub fn build_tasks(self, citizen: &Citizen, ctx: &BehaviorContext<'_>) -> Vec<Task> {
        let cfg = ctx.config;
        let home = live(ctx, citizen.home);
        let go_home = |tasks: &mut Vec<Task>| {
            if let Some(h) = home {
                tasks.push(Task::move_to_building(h, TripPurpose::Home));
            }
        };

        let mut tasks = Vec::new();
        match self {
            Scenario::Demography => tasks.push(Task::AgeUp),

            Scenario::Repair => {
                let site = ctx
                    .registry
                    .nearest::<Utilities, _>(citizen.position(), |_, u| u.needs_repair());
                if let Some(site) = site {
                    tasks.push(Task::move_to_building(site, TripPurpose::Repair));
                    tasks.push(Task::RepairBuilding { building: site });
                    go_home(&mut tasks);
                }
            }

            Scenario::GoToWork => {
                if let Some(work) = live(ctx, citizen.workplace) {
                    tasks.push(Task::move_to_building(work, TripPurpose::Work));
                    tasks.push(Task::work(work, cfg.shift_ticks(ctx.clock)));
                    go_home(&mut tasks);
                }
            }

            Scenario::GoToStudy => {
                if let Some(school) = live(ctx, citizen.study_place) {
                    tasks.push(Task::move_to_building(school, TripPurpose::Study));
                    tasks.push(Task::study(school, cfg.lesson_ticks(ctx.clock)));
                    go_home(&mut tasks);
                }
            }

            Scenario::FindEducation => tasks.push(Task::FindEducation),
            Scenario::FindJob => tasks.push(Task::FindJob),

            Scenario::Shopping => {
                let shop = ctx.registry.nearest::<Commercial, _>(citizen.position(), |_, _| true);
                if let Some(shop) = shop {
                    tasks.push(Task::move_to_building(shop, TripPurpose::Shopping));
                    tasks.push(Task::shop(shop));
                    go_home(&mut tasks);
                }
            }

            Scenario::ReturnHome => go_home(&mut tasks),
        }
        tasks
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Some(id)` if the handle still resolves in the registry.
#[inline]
fn live(ctx: &BehaviorContext<'_>, id: Option<BuildingId>) -> Option<BuildingId> {
    id.filter(|&b| ctx.registry.contains(b))
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// Refills empty task queues from the scenario list.
pub struct Scheduler;

impl Scheduler {
    /// Plan for `citizen` if its queue is empty.
    ///
    /// Returns the adopted scenario.  When nothing applies (or the citizen is
    /// in its post-failure backoff) a citizen left in any state other than
    /// `Idle` is forced back to `Idle`.
    pub fn plan(
        citizen: &mut Citizen,
        queue:   &mut TaskQueue,
        ctx:     &mut BehaviorContext<'_>,
    ) -> Option<Scenario> {
        if !queue.is_empty() {
            return None;
        }

        let chosen = if ctx.tick < citizen.plan_after {
            None
        } else {
            Scenario::PRIORITY.into_iter().find_map(|s| {
                if !s.can_run(citizen, ctx) {
                    return None;
                }
                let tasks = s.build_tasks(citizen, ctx);
                (!tasks.is_empty()).then_some((s, tasks))
            })
        };

        let Some((scenario, tasks)) = chosen else {
            if citizen.state != CitizenState::Idle {
                debug!(citizen = %citizen.id, state = %citizen.state, "no plan; back to idle");
                ctx.set_state(citizen, CitizenState::Idle);
            }
            return None;
        };

        debug!(citizen = %citizen.id, %scenario, tasks = tasks.len(), "plan adopted");
        ctx.emit(SimEvent::PlanStarted { citizen: citizen.id, scenario, tasks: tasks.len() });
        queue.extend(tasks);
        ctx.set_state(citizen, scenario.initial_state());
        Some(scenario)
    }
}
