//! `tc-behavior`: what citizens do, one tick at a time.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`task`]      | `Task` enum, `TaskStatus`, `TripPurpose`, `CommercialPhase`   |
//! | [`queue`]     | `TaskQueue` (current + pending), `TaskQueues` store           |
//! | [`scenario`]  | `Scenario` enum (priority ordered), `Scheduler`               |
//! | [`handler`]   | `handle`: exhaustive state → handler dispatch                |
//! | [`context`]   | `BehaviorContext<'a>`: per-tick borrows of the world         |
//! | [`config`]    | `BehaviorConfig`: hours, durations, probabilities            |
//! | [`event`]     | `SimEvent` changelog entries                                  |
//! | [`error`]     | `BehaviorError`, `BehaviorResult<T>`                          |
//!
//! # Per-citizen flow
//!
//! ```text
//! handle(state)  ──► run current task ──► exit transition / failure reset
//!      │
//!      └─ queue empty? ──► Scheduler::plan ──► first runnable Scenario
//!                                               └─► tasks + initial state
//! ```
//!
//! Both states and tasks are closed enums.  Adding a state without a handler
//! or a task without an `execute` arm is a compile error, not a runtime
//! fallback.
//!
//! # Failure policy
//!
//! Domain failures (unreachable target, removed building, patience exceeded)
//! never propagate as `Err`.  The failing task returns
//! [`TaskStatus::Failed`]; the handler discards the rest of the plan, stops
//! the citizen, and resets it to `Idle`.

pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod handler;
pub mod queue;
pub mod scenario;
pub mod task;


pub use config::BehaviorConfig;
pub use context::BehaviorContext;
pub use error::{BehaviorError, BehaviorResult};
pub use event::SimEvent;
pub use handler::handle;
pub use queue::{TaskQueue, TaskQueues};
pub use scenario::{Scenario, Scheduler};
pub use task::{CommercialPhase, Task, TaskStatus, TripPurpose};
