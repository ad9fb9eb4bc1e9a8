//! `tc-agent`: citizens and their storage.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                       |
//! |---------------|----------------------------------------------------------------|
//! | [`citizen`]   | `Citizen`, `CitizenState`, `Profession`, `EducationLevel`, `LifeStage` |
//! | [`store`]     | `CitizenStore`: id-ordered citizen map                        |
//! | [`builder`]   | `CitizenBuilder` (fluent construction)                         |
//! | [`loader`]    | `load_citizens_csv` / `load_citizens_reader`                   |
//! | [`error`]     | `AgentError`, `AgentResult<T>`                                 |
//!
//! Task queues are deliberately not stored on the citizen; `tc-behavior`
//! keeps them in a parallel store keyed by `CitizenId` so a task can borrow
//! the citizen mutably while the queue that owns the task is borrowed too.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on the citizen enums.      |

pub mod builder;
pub mod citizen;
pub mod error;
pub mod loader;
pub mod store;


pub use builder::CitizenBuilder;
pub use citizen::{Citizen, CitizenState, EducationLevel, LifeStage, Profession};
pub use error::{AgentError, AgentResult};
pub use loader::{load_citizens_csv, load_citizens_reader};
pub use store::CitizenStore;
