//! Workflow intelligence engine for multi-stage processing pipelines.
//!
//! Provides pure, snapshot-based analysis of a job pipeline:
//!
//! - **Stage analysis**: per-stage duration, success rate, utilization and
//!   a bottleneck score combining occupancy share with dwell age.
//! - **Schedule queue**: priority-weighted ordering of pending jobs with
//!   an age bonus and capacity-bounded start dates.
//! - **Assignment**: best-worker recommendation per job from a weighted
//!   workload / skill / efficiency score, with projected load.
//! - **Workload balance**: coefficient-of-variation balance score and
//!   redistribution suggestions over current assignments.
//! - **Scoring**: the generic rule-composition engine both sides rank
//!   through.
//!
//! # Architecture
//!
//! Every operation is a synchronous function over caller-supplied data.
//! Nothing is cached or persisted between calls, so independent snapshots
//! can be analyzed concurrently. The worker roster and the per-type skill
//! and duration tables are injected through [`model::WorkerDirectory`],
//! [`model::SkillMap`] and [`model::DurationModel`]; [`WorkflowEngine`]
//! bundles them with an [`EngineConfig`].
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for model, config and report types
//! - `parallel`: rayon-backed scoring and concurrent report generation

pub mod analysis;
pub mod assignment;
mod engine;
mod error;
pub mod model;
pub mod scoring;
pub mod stats;

pub use engine::{EngineConfig, WorkflowEngine, WorkflowReport};
pub use error::{ConfigError, EngineError, Result};
