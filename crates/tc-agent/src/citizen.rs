//! The citizen record and its enums.

use std::fmt;

use tc_core::{AgentRng, BuildingId, CitizenId, NavKind, Position, Tick};
use tc_mobility::MovingEntity;

// ── CitizenState ──────────────────────────────────────────────────────────────

/// Coarse behavioural state.  Every variant has exactly one handler in
/// `tc-behavior`, enforced by an exhaustive `match`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CitizenState {
    #[default]
    Idle,
    SearchingWork,
    SearchingEducation,
    GoingToWork,
    Working,
    GoingToStudy,
    Studying,
    GoingHome,
    /// Technician walking to a building that needs repair.
    GoingToSite,
    WorkingOnSite,
    GoingToCommercial,
    AtCommercial,
    GoingHomeFromCommercial,
    /// Free movement to an arbitrary tile.
    InTransport,
}

impl CitizenState {
    pub const ALL: [CitizenState; 14] = [
        CitizenState::Idle,
        CitizenState::SearchingWork,
        CitizenState::SearchingEducation,
        CitizenState::GoingToWork,
        CitizenState::Working,
        CitizenState::GoingToStudy,
        CitizenState::Studying,
        CitizenState::GoingHome,
        CitizenState::GoingToSite,
        CitizenState::WorkingOnSite,
        CitizenState::GoingToCommercial,
        CitizenState::AtCommercial,
        CitizenState::GoingHomeFromCommercial,
        CitizenState::InTransport,
    ];

    /// `true` for states whose handler drives the movement service.
    pub fn is_travelling(self) -> bool {
        matches!(
            self,
            CitizenState::GoingToWork
                | CitizenState::GoingToStudy
                | CitizenState::GoingHome
                | CitizenState::GoingToSite
                | CitizenState::GoingToCommercial
                | CitizenState::GoingHomeFromCommercial
                | CitizenState::InTransport
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CitizenState::Idle                    => "idle",
            CitizenState::SearchingWork           => "searching_work",
            CitizenState::SearchingEducation      => "searching_education",
            CitizenState::GoingToWork             => "going_to_work",
            CitizenState::Working                 => "working",
            CitizenState::GoingToStudy            => "going_to_study",
            CitizenState::Studying                => "studying",
            CitizenState::GoingHome               => "going_home",
            CitizenState::GoingToSite             => "going_to_site",
            CitizenState::WorkingOnSite           => "working_on_site",
            CitizenState::GoingToCommercial       => "going_to_commercial",
            CitizenState::AtCommercial            => "at_commercial",
            CitizenState::GoingHomeFromCommercial => "going_home_from_commercial",
            CitizenState::InTransport             => "in_transport",
        }
    }
}

impl fmt::Display for CitizenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Profession ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Profession {
    #[default]
    Unemployed,
    Labourer,
    Clerk,
    Teacher,
    Shopkeeper,
    /// Repairs broken utilities.
    Technician,
}

impl Profession {
    pub fn as_str(self) -> &'static str {
        match self {
            Profession::Unemployed => "unemployed",
            Profession::Labourer   => "labourer",
            Profession::Clerk      => "clerk",
            Profession::Teacher    => "teacher",
            Profession::Shopkeeper => "shopkeeper",
            Profession::Technician => "technician",
        }
    }

    pub fn parse(s: &str) -> Option<Profession> {
        match s.trim() {
            "" | "unemployed" => Some(Profession::Unemployed),
            "labourer"        => Some(Profession::Labourer),
            "clerk"           => Some(Profession::Clerk),
            "teacher"         => Some(Profession::Teacher),
            "shopkeeper"      => Some(Profession::Shopkeeper),
            "technician"      => Some(Profession::Technician),
            _ => None,
        }
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── EducationLevel ────────────────────────────────────────────────────────────

/// Highest completed education.  Ordered, so `a >= b` reads "at least as
/// educated as".
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EducationLevel {
    #[default]
    None,
    Primary,
    Secondary,
    University,
}

impl EducationLevel {
    /// The level a school would grant next, `None` once at the top.
    pub fn next(self) -> Option<EducationLevel> {
        match self {
            EducationLevel::None       => Some(EducationLevel::Primary),
            EducationLevel::Primary    => Some(EducationLevel::Secondary),
            EducationLevel::Secondary  => Some(EducationLevel::University),
            EducationLevel::University => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EducationLevel::None       => "none",
            EducationLevel::Primary    => "primary",
            EducationLevel::Secondary  => "secondary",
            EducationLevel::University => "university",
        }
    }

    pub fn parse(s: &str) -> Option<EducationLevel> {
        match s.trim() {
            "" | "none"  => Some(EducationLevel::None),
            "primary"    => Some(EducationLevel::Primary),
            "secondary"  => Some(EducationLevel::Secondary),
            "university" => Some(EducationLevel::University),
            _ => None,
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── LifeStage ─────────────────────────────────────────────────────────────────

/// Age bracket, derived from `Citizen::age` and never stored.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum LifeStage {
    /// 0–5: stays home.
    Child,
    /// 6–17: studies.
    SchoolAge,
    /// 18–64: works, may study while unemployed.
    Adult,
    /// 65+: retired.
    Senior,
}

impl LifeStage {
    pub const SCHOOL_AGE: u32 = 6;
    pub const ADULT_AGE:  u32 = 18;
    pub const SENIOR_AGE: u32 = 65;

    pub fn from_age(age: u32) -> LifeStage {
        match age {
            a if a < Self::SCHOOL_AGE => LifeStage::Child,
            a if a < Self::ADULT_AGE  => LifeStage::SchoolAge,
            a if a < Self::SENIOR_AGE => LifeStage::Adult,
            _ => LifeStage::Senior,
        }
    }

    #[inline]
    pub fn can_work(self) -> bool {
        self == LifeStage::Adult
    }

    #[inline]
    pub fn can_study(self) -> bool {
        matches!(self, LifeStage::SchoolAge | LifeStage::Adult)
    }
}

// ── Citizen ───────────────────────────────────────────────────────────────────

/// One simulated resident.
///
/// Building references are generational handles: when a building is removed
/// they simply stop resolving in the registry, and the behaviour layer
/// treats that like "no building".
#[derive(Clone, Debug)]
pub struct Citizen {
    pub id:  CitizenId,

    /// Position, target, and cached path.
    pub motion: MovingEntity,

    /// Which navigation profile this citizen plans with.
    pub nav: NavKind,

    /// Age in whole years.
    pub age: u32,

    pub profession: Profession,
    pub education:  EducationLevel,

    pub home:        Option<BuildingId>,
    pub workplace:   Option<BuildingId>,
    pub study_place: Option<BuildingId>,

    pub state: CitizenState,

    /// Lesson ticks accumulated towards the current school's course.
    pub study_progress: u64,

    /// Day index of the last completed shift / lesson / shopping trip, so each
    /// happens at most once per day.
    pub last_work_day:  Option<u64>,
    pub last_study_day: Option<u64>,
    pub last_visit_day: Option<u64>,

    /// Tick at which the next demography check (ageing) is due.
    pub next_birthday: Tick,

    /// Earliest tick for the next job / school search after a failed one.
    pub next_job_search:    Tick,
    pub next_school_search: Tick,

    /// The scheduler leaves the citizen idle until this tick.  Pushed forward
    /// when a plan fails so an unreachable goal is not retried every tick.
    pub plan_after: Tick,

    /// Cleared by the mortality roll; the sim removes dead citizens at the
    /// end of the tick.
    pub alive: bool,

    /// Set by the birth roll; the sim spawns a child at home and clears it.
    pub wants_child: bool,

    pub rng: AgentRng,
}

impl Citizen {
    #[inline]
    pub fn position(&self) -> Position {
        self.motion.position
    }

    #[inline]
    pub fn life_stage(&self) -> LifeStage {
        LifeStage::from_age(self.age)
    }

    #[inline]
    pub fn is_employed(&self) -> bool {
        self.workplace.is_some()
    }

    /// Replace the behavioural state, returning the previous one.
    #[inline]
    pub fn set_state(&mut self, state: CitizenState) -> CitizenState {
        std::mem::replace(&mut self.state, state)
    }

    /// Drop the workplace and fall back to `Unemployed`.
    pub fn quit_job(&mut self) {
        self.workplace = None;
        self.profession = Profession::Unemployed;
    }

    /// Forget the current school and its partial progress.
    pub fn leave_school(&mut self) {
        self.study_place = None;
        self.study_progress = 0;
    }
}
