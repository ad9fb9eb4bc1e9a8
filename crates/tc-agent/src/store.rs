//! `CitizenStore`: every live citizen, keyed and iterated by id.

use std::collections::BTreeMap;

use tc_core::{CitizenId, Tick};

use crate::{AgentError, AgentResult, Citizen, CitizenBuilder, CitizenState};

/// Id-ordered citizen storage.
///
/// Iteration is in ascending `CitizenId`, which is the order the tick loop
/// visits citizens in.  Ids are allocated sequentially and never reused, so
/// newborns always run after everyone who existed before them.
#[derive(Clone, Debug)]
pub struct CitizenStore {
    citizens: BTreeMap<CitizenId, Citizen>,
    next_id:  CitizenId,
}

impl Default for CitizenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CitizenStore {
    pub fn new() -> Self {
        Self { citizens: BTreeMap::new(), next_id: CitizenId(0) }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.citizens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.citizens.is_empty()
    }

    /// The id the next [`spawn`](Self::spawn) will hand out.
    #[inline]
    pub fn next_id(&self) -> CitizenId {
        self.next_id
    }

    /// Build a citizen under a freshly allocated id and insert it.
    pub fn spawn(&mut self, builder: CitizenBuilder, global_seed: u64, default_birthday: Tick) -> CitizenId {
        let id = self.next_id;
        self.next_id = id.next();
        self.citizens.insert(id, builder.build(id, global_seed, default_birthday));
        id
    }

    /// Insert a citizen built elsewhere.  Its id must be unused.
    pub fn insert(&mut self, citizen: Citizen) -> AgentResult<()> {
        let id = citizen.id;
        if self.citizens.contains_key(&id) {
            return Err(AgentError::Duplicate(id));
        }
        self.next_id = self.next_id.max(id.next());
        self.citizens.insert(id, citizen);
        Ok(())
    }

    #[inline]
    pub fn get(&self, id: CitizenId) -> Option<&Citizen> {
        self.citizens.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: CitizenId) -> Option<&mut Citizen> {
        self.citizens.get_mut(&id)
    }

    /// Like [`get_mut`](Self::get_mut) but with a typed error.
    pub fn try_get_mut(&mut self, id: CitizenId) -> AgentResult<&mut Citizen> {
        self.citizens.get_mut(&id).ok_or(AgentError::NotFound(id))
    }

    #[inline]
    pub fn contains(&self, id: CitizenId) -> bool {
        self.citizens.contains_key(&id)
    }

    pub fn remove(&mut self, id: CitizenId) -> Option<Citizen> {
        self.citizens.remove(&id)
    }

    /// Snapshot of all ids in tick order.
    pub fn ids(&self) -> Vec<CitizenId> {
        self.citizens.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Citizen> {
        self.citizens.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Citizen> {
        self.citizens.values_mut()
    }

    /// Number of citizens currently in `state`.
    pub fn count_in(&self, state: CitizenState) -> usize {
        self.citizens.values().filter(|c| c.state == state).count()
    }
}
