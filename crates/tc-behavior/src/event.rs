//! Simulation changelog entries.
//!
//! Tasks, handlers, and the tick loop append to a `Vec<SimEvent>`; external
//! subscribers (observers, a UI adapter) read the batch once per tick.

use tc_agent::{CitizenState, EducationLevel};
use tc_core::{BuildingId, CitizenId};
use tc_registry::UtilityKind;

use crate::Scenario;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimEvent {
    StateChanged { citizen: CitizenId, from: CitizenState, to: CitizenState },
    PlanStarted { citizen: CitizenId, scenario: Scenario, tasks: usize },
    TaskFailed { citizen: CitizenId, task: &'static str },

    Hired { citizen: CitizenId, building: BuildingId },
    JobSearchFailed { citizen: CitizenId },
    Retired { citizen: CitizenId },
    Enrolled { citizen: CitizenId, building: BuildingId },
    EducationSearchFailed { citizen: CitizenId },
    Graduated { citizen: CitizenId, level: EducationLevel },

    Visited { citizen: CitizenId, building: BuildingId },
    Repaired { citizen: CitizenId, building: BuildingId, utilities: Vec<UtilityKind> },
    UtilityFailed { building: BuildingId, utility: UtilityKind },

    Aged { citizen: CitizenId, age: u32 },
    Born { citizen: CitizenId, parent: CitizenId, home: BuildingId },
    Died { citizen: CitizenId, age: u32 },
}

impl SimEvent {
    /// The citizen the event is about, `None` for building-only events.
    pub fn citizen(&self) -> Option<CitizenId> {
        match self {
            SimEvent::StateChanged { citizen, .. }
            | SimEvent::PlanStarted { citizen, .. }
            | SimEvent::TaskFailed { citizen, .. }
            | SimEvent::Hired { citizen, .. }
            | SimEvent::JobSearchFailed { citizen }
            | SimEvent::Retired { citizen }
            | SimEvent::Enrolled { citizen, .. }
            | SimEvent::EducationSearchFailed { citizen }
            | SimEvent::Graduated { citizen, .. }
            | SimEvent::Visited { citizen, .. }
            | SimEvent::Repaired { citizen, .. }
            | SimEvent::Aged { citizen, .. }
            | SimEvent::Born { citizen, .. }
            | SimEvent::Died { citizen, .. } => Some(*citizen),
            SimEvent::UtilityFailed { .. } => None,
        }
    }
}
