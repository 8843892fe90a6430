//! Jobs and their categorical attributes.

use crate::stats::{days_between, minutes_between};
use chrono::{DateTime, Utc};
use std::fmt;

/// A pipeline stage, in processing order.
///
/// `Unrecognized` holds records whose stage tag is outside the supported
/// set. Such jobs still count toward totals but are excluded from
/// per-stage metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum Stage {
    Submitted,
    Prep,
    Processing,
    Analysis,
    Completed,
    Archived,
    Unrecognized,
}

impl Stage {
    /// Supported stages in pipeline order.
    pub const PIPELINE: [Stage; 6] = [
        Stage::Submitted,
        Stage::Prep,
        Stage::Processing,
        Stage::Analysis,
        Stage::Completed,
        Stage::Archived,
    ];

    /// Position in the pipeline, `None` for unrecognized stages.
    pub fn ordinal(self) -> Option<usize> {
        Self::PIPELINE.iter().position(|&s| s == self)
    }

    /// Completed and Archived jobs have left the working pipeline.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Completed | Stage::Archived)
    }

    pub fn is_recognized(self) -> bool {
        self != Stage::Unrecognized
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Submitted => "submitted",
            Stage::Prep => "prep",
            Stage::Processing => "processing",
            Stage::Analysis => "analysis",
            Stage::Completed => "completed",
            Stage::Archived => "archived",
            Stage::Unrecognized => "unrecognized",
        }
    }

    /// Parses a stage tag case-insensitively. Unknown tags map to
    /// [`Stage::Unrecognized`].
    pub fn parse_lenient(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "submitted" => Stage::Submitted,
            "prep" | "library_prep" => Stage::Prep,
            "processing" | "sequencing" => Stage::Processing,
            "analysis" => Stage::Analysis,
            "completed" => Stage::Completed,
            "archived" => Stage::Archived,
            _ => Stage::Unrecognized,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Stage {
    fn from(tag: String) -> Self {
        Stage::parse_lenient(&tag)
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.as_str().to_string()
    }
}

/// Job priority class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum Priority {
    Urgent,
    High,
    Normal,
    Low,
    Unrecognized,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
            Priority::Unrecognized => "unrecognized",
        }
    }

    pub fn parse_lenient(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "urgent" | "rush" => Priority::Urgent,
            "high" => Priority::High,
            "normal" => Priority::Normal,
            "low" => Priority::Low,
            _ => Priority::Unrecognized,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Priority {
    fn from(tag: String) -> Self {
        Priority::parse_lenient(&tag)
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_string()
    }
}

/// Categorical job type. Determines the required skill and the base
/// processing duration. Unknown tags parse as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum JobType {
    Dna,
    Rna,
    Protein,
    Other,
}

impl JobType {
    pub const ALL: [JobType; 4] = [JobType::Dna, JobType::Rna, JobType::Protein, JobType::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            JobType::Dna => "DNA",
            JobType::Rna => "RNA",
            JobType::Protein => "Protein",
            JobType::Other => "Other",
        }
    }

    pub fn parse_lenient(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "dna" => JobType::Dna,
            "rna" => JobType::Rna,
            "protein" => JobType::Protein,
            _ => JobType::Other,
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for JobType {
    fn from(tag: String) -> Self {
        JobType::parse_lenient(&tag)
    }
}

impl From<JobType> for String {
    fn from(job_type: JobType) -> Self {
        job_type.as_str().to_string()
    }
}

/// A unit of work flowing through the pipeline.
///
/// `updated_at >= submitted_at` is expected but not enforced; durations
/// computed from out-of-order timestamps clamp to zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Job {
    pub id: String,
    pub job_type: JobType,
    pub stage: Stage,
    pub priority: Priority,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Worker id or name; `None` means unassigned.
    pub assigned_worker: Option<String>,
}

impl Job {
    /// Creates a freshly submitted, unassigned job of normal priority.
    pub fn new(id: impl Into<String>, job_type: JobType, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            job_type,
            stage: Stage::Submitted,
            priority: Priority::Normal,
            submitted_at,
            updated_at: submitted_at,
            assigned_worker: None,
        }
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    pub fn with_assigned_worker(mut self, worker: impl Into<String>) -> Self {
        self.assigned_worker = Some(worker.into());
        self
    }

    pub fn is_unassigned(&self) -> bool {
        self.assigned_worker.is_none()
    }

    /// Days since submission as of `now` (0 if submitted in the future).
    pub fn age_days(&self, now: DateTime<Utc>) -> f64 {
        days_between(self.submitted_at, now)
    }

    /// Minutes between submission and the last stage change.
    pub fn turnaround_minutes(&self) -> f64 {
        minutes_between(self.submitted_at, self.updated_at)
    }
}
