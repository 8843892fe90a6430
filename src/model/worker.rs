//! Workers and the directory that supplies them.

use crate::stats::ratio;
use std::collections::BTreeSet;

/// An operator capable of processing jobs.
///
/// The engine only reads these fields; workload bookkeeping belongs to
/// the caller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub skills: BTreeSet<String>,
    pub current_workload: u32,
    pub max_capacity: u32,
    /// Throughput multiplier in (0, 1].
    pub efficiency_rating: f64,
}

impl Worker {
    pub fn new(id: impl Into<String>, name: impl Into<String>, max_capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            skills: BTreeSet::new(),
            current_workload: 0,
            max_capacity,
            efficiency_rating: 1.0,
        }
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.insert(skill.into());
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills.extend(skills.into_iter().map(Into::into));
        self
    }

    pub fn with_workload(mut self, current_workload: u32) -> Self {
        self.current_workload = current_workload;
        self
    }

    pub fn with_efficiency(mut self, efficiency_rating: f64) -> Self {
        self.efficiency_rating = efficiency_rating;
        self
    }

    /// `current_workload / max_capacity`, 0 when capacity is 0.
    pub fn utilization(&self) -> f64 {
        ratio(self.current_workload as f64, self.max_capacity as f64)
    }

    /// Free slots before reaching capacity.
    pub fn headroom(&self) -> u32 {
        self.max_capacity.saturating_sub(self.current_workload)
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }
}

/// Resolves a job's `assigned_worker` reference to one roster entry.
///
/// Ids take precedence: a name is only consulted when no worker carries
/// the reference as its id.
pub fn resolve_worker(workers: &[Worker], reference: &str) -> Option<usize> {
    workers
        .iter()
        .position(|w| w.id == reference)
        .or_else(|| workers.iter().position(|w| w.name == reference))
}

/// Source of the worker roster.
///
/// Production callers back this with a directory service or data store;
/// tests supply fixtures. Roster order is significant: it breaks ties
/// between equally scored workers.
pub trait WorkerDirectory: Send + Sync {
    /// Returns the current roster snapshot.
    fn list(&self) -> Vec<Worker>;
}

/// A fixed roster injected at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticRoster {
    workers: Vec<Worker>,
}

impl StaticRoster {
    pub fn new(workers: Vec<Worker>) -> Self {
        Self { workers }
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}

impl WorkerDirectory for StaticRoster {
    fn list(&self) -> Vec<Worker> {
        self.workers.clone()
    }
}

impl WorkerDirectory for Vec<Worker> {
    fn list(&self) -> Vec<Worker> {
        self.clone()
    }
}

impl WorkerDirectory for [Worker] {
    fn list(&self) -> Vec<Worker> {
        self.to_vec()
    }
}
