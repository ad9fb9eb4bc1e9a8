//! Concrete facilities: the domain services tasks query and mutate.
//!
//! None of these know about the grid or the clock.  They are plain rosters
//! with capacity rules; tasks decide when to call them.

use std::collections::{BTreeSet, VecDeque};

use tc_agent::{EducationLevel, Profession};
use tc_core::CitizenId;

use crate::Facility;

/// Remove the first occurrence of `citizen` from `list`.
fn remove_from(list: &mut Vec<CitizenId>, citizen: CitizenId) -> bool {
    match list.iter().position(|&c| c == citizen) {
        Some(i) => {
            list.remove(i);
            true
        }
        None => false,
    }
}

// ── Housing ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Housing {
    pub capacity:  usize,
    pub residents: Vec<CitizenId>,
}

impl Housing {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, residents: Vec::new() }
    }

    #[inline]
    pub fn has_vacancy(&self) -> bool {
        self.residents.len() < self.capacity
    }

    /// Register a resident.  `false` if full; `true` if already living here.
    pub fn move_in(&mut self, citizen: CitizenId) -> bool {
        if self.residents.contains(&citizen) {
            return true;
        }
        if !self.has_vacancy() {
            return false;
        }
        self.residents.push(citizen);
        true
    }

    pub fn move_out(&mut self, citizen: CitizenId) -> bool {
        remove_from(&mut self.residents, citizen)
    }
}

impl Facility for Housing {
    fn release_citizen(&mut self, citizen: CitizenId) {
        self.move_out(citizen);
    }
}

// ── Workplace ─────────────────────────────────────────────────────────────────

/// Jobs of one profession.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Workplace {
    pub profession:         Profession,
    pub required_education: EducationLevel,
    pub capacity:           usize,
    pub workers:            Vec<CitizenId>,
    /// Total ticks of completed work, for production statistics.
    pub worked_ticks:       u64,
}

impl Workplace {
    pub fn new(profession: Profession, required_education: EducationLevel, capacity: usize) -> Self {
        Self {
            profession,
            required_education,
            capacity,
            workers:      Vec::new(),
            worked_ticks: 0,
        }
    }

    #[inline]
    pub fn has_capacity(&self) -> bool {
        self.workers.len() < self.capacity
    }

    #[inline]
    pub fn accepts(&self, education: EducationLevel) -> bool {
        education >= self.required_education
    }

    /// Take on `citizen`.  `true` if hired or already employed here.
    pub fn hire(&mut self, citizen: CitizenId) -> bool {
        if self.workers.contains(&citizen) {
            return true;
        }
        if !self.has_capacity() {
            return false;
        }
        self.workers.push(citizen);
        true
    }

    pub fn fire(&mut self, citizen: CitizenId) -> bool {
        remove_from(&mut self.workers, citizen)
    }

    pub fn record_work(&mut self, ticks: u64) {
        self.worked_ticks += ticks;
    }
}

impl Facility for Workplace {
    fn release_citizen(&mut self, citizen: CitizenId) {
        self.fire(citizen);
    }
}

// ── School ────────────────────────────────────────────────────────────────────

/// Teaches up to `level`; a course takes `course_ticks` of lessons.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct School {
    pub level:        EducationLevel,
    pub capacity:     usize,
    pub course_ticks: u64,
    pub students:     Vec<CitizenId>,
    pub graduates:    u64,
}

impl School {
    pub fn new(level: EducationLevel, capacity: usize, course_ticks: u64) -> Self {
        Self {
            level,
            capacity,
            course_ticks,
            students:  Vec::new(),
            graduates: 0,
        }
    }

    #[inline]
    pub fn has_capacity(&self) -> bool {
        self.students.len() < self.capacity
    }

    /// `true` if a citizen at `education` would learn something here: the
    /// school grants exactly the next level.
    #[inline]
    pub fn teaches(&self, education: EducationLevel) -> bool {
        education.next() == Some(self.level)
    }

    pub fn enroll(&mut self, citizen: CitizenId) -> bool {
        if self.students.contains(&citizen) {
            return true;
        }
        if !self.has_capacity() {
            return false;
        }
        self.students.push(citizen);
        true
    }

    pub fn withdraw(&mut self, citizen: CitizenId) -> bool {
        remove_from(&mut self.students, citizen)
    }

    /// Withdraw a student who finished the course.
    pub fn graduate(&mut self, citizen: CitizenId) -> bool {
        let was_student = self.withdraw(citizen);
        if was_student {
            self.graduates += 1;
        }
        was_student
    }
}

impl Facility for School {
    fn release_citizen(&mut self, citizen: CitizenId) {
        self.withdraw(citizen);
    }
}

// ── Commercial ────────────────────────────────────────────────────────────────

/// A shop with a bounded set of visitors being served and a bounded FIFO
/// queue in front of it.
///
/// Hitting either limit is not an error: `try_join_queue` / `try_enter`
/// return `false` and the caller retries on a later tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commercial {
    pub max_visitors:     usize,
    pub max_queue_length: usize,
    /// Ticks a visitor needs to be served.
    pub service_ticks:    u32,
    pub total_visits:     u64,
    visitors: Vec<CitizenId>,
    queue:    VecDeque<CitizenId>,
}

impl Commercial {
    pub fn new(max_visitors: usize, max_queue_length: usize, service_ticks: u32) -> Self {
        Self {
            max_visitors,
            max_queue_length,
            service_ticks,
            total_visits: 0,
            visitors:     Vec::new(),
            queue:        VecDeque::new(),
        }
    }

    #[inline]
    pub fn current_queue(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn visitor_count(&self) -> usize {
        self.visitors.len()
    }

    #[inline]
    pub fn has_capacity(&self) -> bool {
        self.visitors.len() < self.max_visitors
    }

    #[inline]
    pub fn is_visitor(&self, citizen: CitizenId) -> bool {
        self.visitors.contains(&citizen)
    }

    #[inline]
    pub fn is_queued(&self, citizen: CitizenId) -> bool {
        self.queue.contains(&citizen)
    }

    /// Join the back of the queue.  `true` if queued now or already inside.
    pub fn try_join_queue(&mut self, citizen: CitizenId) -> bool {
        if self.is_queued(citizen) || self.is_visitor(citizen) {
            return true;
        }
        if self.queue.len() >= self.max_queue_length {
            return false;
        }
        self.queue.push_back(citizen);
        true
    }

    /// Become a visitor.  Admitted only with a free visitor slot and when
    /// nobody else is ahead in the queue.
    pub fn try_enter(&mut self, citizen: CitizenId) -> bool {
        if self.is_visitor(citizen) {
            return true;
        }
        if !self.has_capacity() {
            return false;
        }
        match self.queue.front() {
            Some(&front) if front != citizen => return false,
            Some(_) => {
                self.queue.pop_front();
            }
            None => {}
        }
        self.visitors.push(citizen);
        true
    }

    /// Leave as visitor or from the queue.
    pub fn leave(&mut self, citizen: CitizenId) {
        remove_from(&mut self.visitors, citizen);
        self.queue.retain(|&c| c != citizen);
    }

    /// Admit queued citizens into free visitor slots, front first.
    /// Returns the admitted citizens.
    pub fn process_queue(&mut self) -> Vec<CitizenId> {
        let mut admitted = Vec::new();
        while self.has_capacity() {
            let Some(next) = self.queue.pop_front() else { break };
            self.visitors.push(next);
            admitted.push(next);
        }
        admitted
    }

    pub fn record_visit(&mut self) {
        self.total_visits += 1;
    }
}

impl Facility for Commercial {
    fn release_citizen(&mut self, citizen: CitizenId) {
        self.leave(citizen);
    }
}

// ── Utilities ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UtilityKind {
    Power,
    Water,
    Sewage,
    Heating,
}

impl UtilityKind {
    pub const ALL: [UtilityKind; 4] =
        [UtilityKind::Power, UtilityKind::Water, UtilityKind::Sewage, UtilityKind::Heating];
}

/// Utility connections of a building and which of them are broken.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Utilities {
    broken:    BTreeSet<UtilityKind>,
    pub repairs: u64,
}

impl Utilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broken utilities in a fixed order.
    pub fn broken_utilities(&self) -> Vec<UtilityKind> {
        self.broken.iter().copied().collect()
    }

    #[inline]
    pub fn needs_repair(&self) -> bool {
        !self.broken.is_empty()
    }

    /// `true` if `kind` was working before.
    pub fn break_utility(&mut self, kind: UtilityKind) -> bool {
        self.broken.insert(kind)
    }

    /// `true` if `kind` was broken before.
    pub fn fix_utility(&mut self, kind: UtilityKind) -> bool {
        let fixed = self.broken.remove(&kind);
        if fixed {
            self.repairs += 1;
        }
        fixed
    }
}

impl Facility for Utilities {}
