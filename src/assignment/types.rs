//! Assignment reports.

use crate::scoring::RuleContribution;
use chrono::{DateTime, Utc};

/// The recommended worker for one job.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignmentRecommendation {
    pub job_id: String,
    /// Id of the recommended worker.
    pub recommended_worker: String,
    pub worker_name: String,
    /// Winning composite score rounded to two decimals, in `[0, 1]`.
    pub confidence_score: f64,
    pub reasoning: String,
    pub estimated_completion: DateTime<Utc>,
    /// Whether the worker holds the skill the job type requires.
    pub skill_matched: bool,
    /// Per-criterion contributions behind the confidence score.
    pub breakdown: Vec<RuleContribution>,
}

/// Load a worker would carry if every recommendation were accepted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkloadProjection {
    pub worker_id: String,
    pub worker_name: String,
    pub current_workload: u32,
    pub recommended_jobs: u32,
    pub projected_workload: u32,
    pub max_capacity: u32,
    pub projected_utilization: f64,
    pub over_capacity: bool,
}

/// Result of [`recommend`](super::recommend).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignmentPlan {
    /// One entry per candidate job, in input order.
    pub recommendations: Vec<AssignmentRecommendation>,
    /// One entry per roster worker, in roster order.
    pub projections: Vec<WorkloadProjection>,
    /// Operator-facing advisory text. Not meant to be parsed.
    pub insights: Vec<String>,
}

impl AssignmentPlan {
    pub fn for_job(&self, job_id: &str) -> Option<&AssignmentRecommendation> {
        self.recommendations.iter().find(|r| r.job_id == job_id)
    }
}

/// A worker's utilization in the current assignment snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkerUtilization {
    pub worker_id: String,
    pub worker_name: String,
    pub assigned_jobs: u32,
    pub max_capacity: u32,
    pub utilization: f64,
}

/// Result of [`analyze_workload_balance`](super::analyze_workload_balance).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BalanceReport {
    /// `max(0, 1 - coefficient of variation)` of worker utilizations.
    pub balance_score: f64,
    /// Roster order.
    pub utilizations: Vec<WorkerUtilization>,
    /// Names of overloaded workers, roster order.
    pub overloaded: Vec<String>,
    /// Names of underutilized workers, roster order.
    pub underutilized: Vec<String>,
    /// Deterministically ordered advisory text.
    pub suggestions: Vec<String>,
}
