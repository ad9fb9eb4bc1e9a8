//! `BuildingRegistry`: the authoritative map from building to placement.
//!
//! # Layout
//!
//! - A generational arena of slots.  A slot holds the placement while the
//!   building is live; on removal the entry is cleared, the generation is
//!   bumped, and the slot index goes on a free list for reuse.
//! - A [`FacilityMap`] with the services each building offers.
//! - An R-tree (via `rstar`) over entrance tiles for nearest-building
//!   queries.
//! - A changelog of [`RegistryEvent`]s, drained by consumers once per tick.

use std::fmt;

use rstar::primitives::GeomWithData;
use rstar::RTree;
use tracing::info;

use tc_core::{BuildingId, CitizenId, Placement, Position};
use tc_spatial::{GridMap, NavigationProfile, Occupant, SpatialError};

use crate::{Facility, FacilityMap, RegistryError, RegistryResult};

/// R-tree entry: an entrance tile tagged with its building.
type EntranceEntry = GeomWithData<[i32; 2], BuildingId>;

#[inline]
fn point(p: Position) -> [i32; 2] {
    [p.x, p.y]
}

// ── BuildingKind ──────────────────────────────────────────────────────────────

/// Catalogue category of a placed building.  Purely descriptive; behaviour
/// is driven by the attached facilities.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BuildingKind {
    House,
    Workshop,
    Office,
    School,
    Shop,
    /// Utility plant (power, water pumping).
    Plant,
    /// Walk-through decoration such as a plaza.
    Plaza,
}

impl BuildingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildingKind::House    => "house",
            BuildingKind::Workshop => "workshop",
            BuildingKind::Office   => "office",
            BuildingKind::School   => "school",
            BuildingKind::Shop     => "shop",
            BuildingKind::Plant    => "plant",
            BuildingKind::Plaza    => "plaza",
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── RegistryEvent ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryEvent {
    Placed { id: BuildingId, placement: Placement, kind: BuildingKind },
    Removed { id: BuildingId, placement: Placement, kind: BuildingKind },
}

// ── Arena ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Entry {
    placement: Placement,
    kind:      BuildingKind,
    blocking:  bool,
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    entry:      Option<Entry>,
}

// ── BuildingRegistry ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct BuildingRegistry {
    slots:      Vec<Slot>,
    free:       Vec<u32>,
    facilities: FacilityMap,
    entrances:  RTree<EntranceEntry>,
    events:     Vec<RegistryEvent>,
}

impl BuildingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Placement ─────────────────────────────────────────────────────────

    /// Place a building: validate the footprint, mark its tiles on `map`,
    /// and return a fresh handle.
    ///
    /// Fails without touching the map if any footprint tile is out of bounds
    /// or already occupied.
    pub fn register(
        &mut self,
        placement: Placement,
        kind:      BuildingKind,
        blocking:  bool,
        map:       &mut GridMap,
    ) -> RegistryResult<BuildingId> {
        if placement.area.width == 0 || placement.area.height == 0 {
            return Err(RegistryError::EmptyFootprint);
        }
        for tile in placement.tiles() {
            if let Some(other) = map.tile(tile)?.occupant {
                return Err(SpatialError::Occupied { pos: tile, by: other.building }.into());
            }
        }

        let id = self.allocate(Entry { placement, kind, blocking });
        let occupant = Occupant { building: id, blocking };
        for tile in placement.tiles() {
            map.set_occupant(tile, occupant)?;
        }
        self.entrances.insert(EntranceEntry::new(point(placement.entrance()), id));
        self.events.push(RegistryEvent::Placed { id, placement, kind });
        info!(building = %id, %kind, at = %placement, "building placed");
        Ok(id)
    }

    /// Remove a building: clear its tiles, drop its facilities, and
    /// invalidate every outstanding handle to it.
    pub fn remove(&mut self, id: BuildingId, map: &mut GridMap) -> RegistryResult<Placement> {
        let slot = self
            .slots
            .get_mut(id.slot())
            .filter(|s| s.generation == id.generation)
            .ok_or(RegistryError::UnknownBuilding(id))?;
        let entry = slot.entry.take().ok_or(RegistryError::UnknownBuilding(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        for tile in entry.placement.tiles() {
            if map.tile(tile)?.occupant.is_some_and(|o| o.building == id) {
                map.clear_occupant(tile)?;
            }
        }
        self.facilities.remove_building(id);
        self.entrances.remove(&EntranceEntry::new(point(entry.placement.entrance()), id));
        self.events.push(RegistryEvent::Removed {
            id,
            placement: entry.placement,
            kind:      entry.kind,
        });
        info!(building = %id, kind = %entry.kind, "building removed");
        Ok(entry.placement)
    }

    fn allocate(&mut self, entry: Entry) -> BuildingId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(entry);
                BuildingId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, entry: Some(entry) });
                BuildingId::new(index, 0)
            }
        }
    }

    fn entry(&self, id: BuildingId) -> Option<&Entry> {
        self.slots
            .get(id.slot())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.entry.as_ref())
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    #[inline]
    pub fn contains(&self, id: BuildingId) -> bool {
        self.entry(id).is_some()
    }

    /// Placement of a live building, `None` for stale or unknown handles.
    #[inline]
    pub fn placement(&self, id: BuildingId) -> Option<Placement> {
        self.entry(id).map(|e| e.placement)
    }

    #[inline]
    pub fn kind(&self, id: BuildingId) -> Option<BuildingKind> {
        self.entry(id).map(|e| e.kind)
    }

    #[inline]
    pub fn entrance(&self, id: BuildingId) -> Option<Position> {
        self.entry(id).map(|e| e.placement.entrance())
    }

    #[inline]
    pub fn is_blocking(&self, id: BuildingId) -> Option<bool> {
        self.entry(id).map(|e| e.blocking)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live building ids in slot order.
    pub fn ids(&self) -> impl Iterator<Item = BuildingId> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.entry.as_ref().map(|_| BuildingId::new(i as u32, s.generation))
        })
    }

    /// The building whose footprint covers `pos`, if any.
    pub fn building_at(&self, pos: Position) -> Option<BuildingId> {
        self.ids().find(|&id| self.entry(id).is_some_and(|e| e.placement.contains(pos)))
    }

    // ── Facilities ────────────────────────────────────────────────────────

    /// Attach a facility to a live building.
    pub fn attach<T: Facility>(&mut self, id: BuildingId, facility: T) -> RegistryResult<()> {
        if !self.contains(id) {
            return Err(RegistryError::UnknownBuilding(id));
        }
        self.facilities.insert(id, facility);
        Ok(())
    }

    pub fn facility<T: Facility>(&self, id: BuildingId) -> Option<&T> {
        self.facilities.get::<T>(id)
    }

    pub fn facility_mut<T: Facility>(&mut self, id: BuildingId) -> Option<&mut T> {
        self.facilities.get_mut::<T>(id)
    }

    /// Every live building carrying facility `T`, ascending by id.
    pub fn buildings<T: Facility>(&self) -> impl Iterator<Item = (BuildingId, &T)> {
        self.facilities.table::<T>().into_iter().flat_map(|t| t.iter().map(|(&id, f)| (id, f)))
    }

    pub fn buildings_mut<T: Facility>(&mut self) -> impl Iterator<Item = (BuildingId, &mut T)> {
        self.facilities
            .table_mut::<T>()
            .into_iter()
            .flat_map(|t| t.iter_mut().map(|(&id, f)| (id, f)))
    }

    /// Remove `citizen` from every facility roster.
    pub fn release_citizen(&mut self, citizen: CitizenId) {
        self.facilities.release_citizen(citizen);
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Closest building (by entrance, straight-line) that carries `T` and
    /// passes `filter`.  Equidistant candidates resolve to the lowest id.
    pub fn nearest<T, P>(&self, from: Position, filter: P) -> Option<BuildingId>
    where
        T: Facility,
        P: Fn(BuildingId, &T) -> bool,
    {
        let table = self.facilities.table::<T>()?;
        let mut best: Option<(i32, BuildingId)> = None;

        for (entry, d2) in self.entrances.nearest_neighbor_iter_with_distance_2(&point(from)) {
            if let Some((best_d2, _)) = best {
                if d2 > best_d2 {
                    break;
                }
            }
            let id = entry.data;
            let Some(facility) = table.get(&id) else { continue };
            if !filter(id, facility) {
                continue;
            }
            best = match best {
                Some((bd, bid)) if bid <= id => Some((bd, bid)),
                _ => Some((d2, id)),
            };
        }
        best.map(|(_, id)| id)
    }

    /// Tiles 4-adjacent to the footprint that are in bounds, unoccupied,
    /// and enterable under `profile`.  Empty for unknown buildings.
    pub fn accessible_neighbor_tiles(
        &self,
        id:      BuildingId,
        map:     &GridMap,
        profile: &dyn NavigationProfile,
    ) -> Vec<Position> {
        let Some(entry) = self.entry(id) else {
            return Vec::new();
        };
        entry
            .placement
            .perimeter()
            .into_iter()
            .filter(|&p| {
                map.tile(p).is_ok_and(|t| t.occupant.is_none()) && profile.can_enter(map, p)
            })
            .collect()
    }

    // ── Changelog ─────────────────────────────────────────────────────────

    /// Take every event recorded since the previous drain.
    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.events)
    }
}
