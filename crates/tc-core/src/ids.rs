//! Citizen and building identifiers.
//!
//! `CitizenId` is a plain counter: citizens are never re-numbered, so a
//! removed citizen's id is simply never handed out again.  `BuildingId` is a
//! generational handle into the building registry's arena: removing a
//! building bumps the slot's generation, so every handle held elsewhere
//! (a citizen's workplace, a tile occupant) stops resolving instead of
//! silently pointing at whatever is placed in the reused slot.

use std::fmt;

/// Identifier of a citizen.  Allocated sequentially, never reused.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CitizenId(pub u32);

impl CitizenId {
    /// The id allocated after `self`.
    #[inline]
    pub fn next(self) -> CitizenId {
        CitizenId(self.0 + 1)
    }
}

impl fmt::Display for CitizenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "citizen#{}", self.0)
    }
}

// ── BuildingId ────────────────────────────────────────────────────────────────

/// Generational handle to a placed building.
///
/// `index` addresses a slot in the registry arena; `generation` must match the
/// slot's current generation for the handle to resolve.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildingId {
    pub index:      u32,
    pub generation: u32,
}

impl BuildingId {
    #[inline]
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot index.
    #[inline(always)]
    pub fn slot(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "building#{}v{}", self.index, self.generation)
    }
}
