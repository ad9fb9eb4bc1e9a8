//! Per-tick borrows handed to handlers, tasks, and scenarios.

use tracing::trace;

use tc_agent::{Citizen, CitizenState};
use tc_core::{SimClock, Tick};
use tc_mobility::EntityMovement;
use tc_registry::BuildingRegistry;
use tc_spatial::GridMap;

use crate::{BehaviorConfig, SimEvent};

/// Everything a citizen's turn may read or touch besides the citizen itself
/// and its task queue.
///
/// Built by the tick loop once per citizen turn.  The map is read-only: it is
/// only changed between ticks, by placement code.
pub struct BehaviorContext<'a> {
    pub tick:     Tick,
    pub clock:    &'a SimClock,
    pub config:   &'a BehaviorConfig,
    pub map:      &'a GridMap,
    pub registry: &'a mut BuildingRegistry,
    pub movement: &'a dyn EntityMovement,
    pub events:   &'a mut Vec<SimEvent>,
}

impl<'a> BehaviorContext<'a> {
    /// Day index of the current tick.
    #[inline]
    pub fn day(&self) -> u64 {
        self.clock.day(self.tick)
    }

    /// `true` if the current tick lies inside `[start, end)` hours.
    #[inline]
    pub fn in_hours(&self, start: u32, end: u32) -> bool {
        self.clock.in_hours(self.tick, start, end)
    }

    #[inline]
    pub fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Change a citizen's state, logging a `StateChanged` event if it
    /// actually changed.
    pub fn set_state(&mut self, citizen: &mut Citizen, to: CitizenState) {
        let from = citizen.set_state(to);
        if from != to {
            trace!(citizen = %citizen.id, %from, %to, "state");
            self.events.push(SimEvent::StateChanged { citizen: citizen.id, from, to });
        }
    }
}
