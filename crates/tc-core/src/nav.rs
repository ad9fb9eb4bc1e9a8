//! Navigation kinds shared by the map, pathfinder, and movement crates.
//!
//! Each kind maps to one navigation profile in `tc-spatial`; the kind itself
//! carries no rules.

/// The class of mover a path is being planned for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NavKind {
    /// On foot.  Walks over any open terrain.
    #[default]
    Pedestrian,
    /// Road vehicle.  Restricted to road tiles.
    Vehicle,
}

impl NavKind {
    /// Human-readable label, useful for CSV column values and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            NavKind::Pedestrian => "pedestrian",
            NavKind::Vehicle    => "vehicle",
        }
    }

    /// Parse the label produced by [`as_str`](Self::as_str).
    pub fn parse(s: &str) -> Option<NavKind> {
        match s.trim() {
            "pedestrian" => Some(NavKind::Pedestrian),
            "vehicle"    => Some(NavKind::Vehicle),
            _ => None,
        }
    }
}

impl std::fmt::Display for NavKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
