//! Type-erased per-building facility storage.
//!
//! # Design
//!
//! Each facility type `T` is stored as a `BTreeMap<BuildingId, T>` behind a
//! `Box<dyn FacilityTable>` in a map keyed by `TypeId`.  A building can carry
//! any number of facility types (a school that is also a workplace for its
//! teachers), and "all buildings with facility `T`" is a single table walk
//! in ascending id order.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tc_core::{BuildingId, CitizenId};

/// A service a building offers to citizens.
pub trait Facility: Send + Sync + 'static {
    /// Forget `citizen` (resident, worker, student, visitor).
    fn release_citizen(&mut self, _citizen: CitizenId) {}
}

// ── Trait object ──────────────────────────────────────────────────────────────

/// Type-erased interface over one facility table.
///
/// Sealed: only [`TypedFacilityTable`] implements it.
pub trait FacilityTable: Send + Sync + 'static + sealed::Sealed {
    /// Drop the entry for `building`, if any.
    fn remove(&mut self, building: BuildingId);

    fn release_citizen(&mut self, citizen: CitizenId);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

mod sealed {
    pub trait Sealed {}
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

pub struct TypedFacilityTable<T: Facility>(pub BTreeMap<BuildingId, T>);

impl<T: Facility> sealed::Sealed for TypedFacilityTable<T> {}

impl<T: Facility> FacilityTable for TypedFacilityTable<T> {
    fn remove(&mut self, building: BuildingId) {
        self.0.remove(&building);
    }

    fn release_citizen(&mut self, citizen: CitizenId) {
        for facility in self.0.values_mut() {
            facility.release_citizen(citizen);
        }
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ── FacilityMap ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FacilityMap {
    map: FxHashMap<TypeId, Box<dyn FacilityTable>>,
}

impl FacilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `facility` to `building`, replacing any previous `T` there.
    pub fn insert<T: Facility>(&mut self, building: BuildingId, facility: T) {
        let table = self
            .map
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(TypedFacilityTable::<T>(BTreeMap::new())));
        // The TypeId key guarantees the downcast.
        if let Some(t) = table.as_any_mut().downcast_mut::<TypedFacilityTable<T>>() {
            t.0.insert(building, facility);
        }
    }

    pub fn table<T: Facility>(&self) -> Option<&BTreeMap<BuildingId, T>> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|t| t.as_any().downcast_ref::<TypedFacilityTable<T>>())
            .map(|t| &t.0)
    }

    pub fn table_mut<T: Facility>(&mut self) -> Option<&mut BTreeMap<BuildingId, T>> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|t| t.as_any_mut().downcast_mut::<TypedFacilityTable<T>>())
            .map(|t| &mut t.0)
    }

    pub fn get<T: Facility>(&self, building: BuildingId) -> Option<&T> {
        self.table::<T>().and_then(|t| t.get(&building))
    }

    pub fn get_mut<T: Facility>(&mut self, building: BuildingId) -> Option<&mut T> {
        self.table_mut::<T>().and_then(|t| t.get_mut(&building))
    }

    /// Drop every facility attached to `building`.
    pub fn remove_building(&mut self, building: BuildingId) {
        for table in self.map.values_mut() {
            table.remove(building);
        }
    }

    /// Remove `citizen` from every roster of every facility.
    pub fn release_citizen(&mut self, citizen: CitizenId) {
        for table in self.map.values_mut() {
            table.release_citizen(citizen);
        }
    }

    /// Number of distinct facility types in use.
    pub fn type_count(&self) -> usize {
        self.map.len()
    }
}
