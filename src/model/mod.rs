//! Domain model: jobs, workers, and the per-type lookup tables.
//!
//! All types here are plain value objects. The engine reads them from a
//! caller-supplied snapshot and never mutates them.

mod job;
mod tables;
mod worker;

pub use job::{Job, JobType, Priority, Stage};
pub use tables::{DurationModel, SkillMap, StaticDurationModel, StaticSkillMap};
pub use worker::{resolve_worker, StaticRoster, Worker, WorkerDirectory};
