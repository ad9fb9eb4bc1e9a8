//! State-handler dispatch.
//!
//! One exhaustive `match` maps every [`CitizenState`] to its handler.  Each
//! handler runs the citizen's current task and applies the state's own exit
//! transition when that task completes:
//!
//! | State(s)                                            | On task completion |
//! |-----------------------------------------------------|--------------------|
//! | `Idle`                                              | stay (the task may have changed the state itself) |
//! | `SearchingWork`, `SearchingEducation`               | `Idle`             |
//! | `GoingToWork`                                       | `Working`          |
//! | `GoingToStudy`                                      | `Studying`         |
//! | `GoingToSite`                                       | `WorkingOnSite`    |
//! | `GoingToCommercial`                                 | `AtCommercial`     |
//! | `GoingHome`, `GoingHomeFromCommercial`, `InTransport` | `Idle`           |
//! | `Working`, `Studying`, `WorkingOnSite`              | `Idle`             |
//! | `AtCommercial`                                      | stay (the service task sets `GoingHomeFromCommercial`) |
//!
//! Plans always open a travel state with a move task, so in travel states the
//! completing task is the trip.  Any non-idle state with an empty queue has
//! nothing left to do and is forced back to `Idle`.

use tracing::{debug, warn};

use tc_agent::{Citizen, CitizenState};

use crate::{BehaviorContext, SimEvent, TaskQueue, TaskStatus};

/// Advance `citizen` by one tick according to its current state.
pub fn handle(citizen: &mut Citizen, queue: &mut TaskQueue, ctx: &mut BehaviorContext<'_>) {
    use CitizenState::*;

    match citizen.state {
        Idle => run(citizen, queue, ctx, None),

        SearchingWork | SearchingEducation => run(citizen, queue, ctx, Some(Idle)),

        GoingToWork => run(citizen, queue, ctx, Some(Working)),
        GoingToStudy => run(citizen, queue, ctx, Some(Studying)),
        GoingToSite => run(citizen, queue, ctx, Some(WorkingOnSite)),
        GoingToCommercial => run(citizen, queue, ctx, Some(AtCommercial)),
        GoingHome | GoingHomeFromCommercial | InTransport => run(citizen, queue, ctx, Some(Idle)),

        Working | Studying | WorkingOnSite => run(citizen, queue, ctx, Some(Idle)),

        AtCommercial => run(citizen, queue, ctx, None),
    }
}

/// Run the current task; on completion apply `exit` (if any).
fn run(
    citizen: &mut Citizen,
    queue:   &mut TaskQueue,
    ctx:     &mut BehaviorContext<'_>,
    exit:    Option<CitizenState>,
) {
    let Some(task) = queue.current_or_next() else {
        if citizen.state != CitizenState::Idle {
            warn!(citizen = %citizen.id, state = %citizen.state, "no task for state; forcing idle");
            ctx.set_state(citizen, CitizenState::Idle);
        }
        return;
    };

    match task.execute(citizen, ctx) {
        TaskStatus::Running => {}
        TaskStatus::Completed => {
            queue.finish_current();
            if let Some(next) = exit {
                ctx.set_state(citizen, next);
            }
        }
        TaskStatus::Failed => {
            let name = task.name();
            debug!(citizen = %citizen.id, task = name, "task failed; plan abandoned");
            ctx.emit(SimEvent::TaskFailed { citizen: citizen.id, task: name });
            queue.clear();
            citizen.motion.stop();
            citizen.plan_after = ctx.tick + ctx.config.failure_backoff_ticks;
            ctx.set_state(citizen, CitizenState::Idle);
        }
    }
}
