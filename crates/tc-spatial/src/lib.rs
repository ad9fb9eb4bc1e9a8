//! `tc-spatial`: tile grid, navigation profiles, and pathfinding.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`map`]        | `GridMap`, `Tile`, `Terrain`, resources, occupants        |
//! | [`profile`]    | `NavigationProfile` trait, pedestrian and vehicle rules   |
//! | [`pathfinder`] | `PathFinder` trait, `Path`, `AStarPathFinder`             |
//! | [`error`]      | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod map;
pub mod pathfinder;
pub mod profile;


pub use error::{SpatialError, SpatialResult};
pub use map::{GridMap, Occupant, ResourceDeposit, ResourceKind, Terrain, Tile};
pub use pathfinder::{AStarPathFinder, Path, PathFinder};
pub use profile::{profile_for, NavigationProfile, PedestrianProfile, VehicleProfile};
