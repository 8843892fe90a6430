//! Analyzer inputs and reports.

use crate::model::{Priority, Stage};
use chrono::{DateTime, Utc};

/// The submission window a performance analysis covers (inclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// When false, the completion rate is computed over completed and
    /// archived jobs only.
    pub include_completed: bool,
}

impl AnalysisWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            include_completed: true,
        }
    }

    pub fn with_include_completed(mut self, include: bool) -> Self {
        self.include_completed = include;
        self
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Metrics for one pipeline stage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StagePerformance {
    pub stage: Stage,
    /// Filtered jobs currently sitting in this stage.
    pub job_count: usize,
    pub average_duration_minutes: f64,
    /// Share of jobs that reached this stage and moved past it.
    pub success_rate: f64,
    pub bottleneck_score: f64,
    pub resource_utilization: f64,
}

/// Window-wide throughput summary.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverallMetrics {
    /// Jobs submitted inside the window.
    pub total_jobs: usize,
    /// Completed or archived jobs inside the window.
    pub completed_jobs: usize,
    /// Percentage in `[0, 100]`.
    pub completion_rate: f64,
    pub average_processing_time_hours: f64,
    /// Completed jobs per day of window.
    pub throughput_per_day: f64,
    pub bottleneck_stages: Vec<Stage>,
    /// Jobs whose stage tag was not recognized.
    pub unrecognized_stage_jobs: usize,
}

/// Result of a performance analysis.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerformanceReport {
    pub overall: OverallMetrics,
    /// One entry per supported stage, in pipeline order.
    pub stages: Vec<StagePerformance>,
    /// Operator-facing advisory text. Not meant to be parsed.
    pub insights: Vec<String>,
}

impl PerformanceReport {
    pub fn stage(&self, stage: Stage) -> Option<&StagePerformance> {
        self.stages.iter().find(|s| s.stage == stage)
    }
}

/// A job's slot in the recommended schedule.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduledJob {
    pub job_id: String,
    pub priority: Priority,
    /// Priority weight plus capped age bonus.
    pub priority_score: f64,
    /// Zero-based queue position.
    pub position: usize,
    pub scheduled_start: DateTime<Utc>,
    pub estimated_completion: DateTime<Utc>,
}

/// Pending load relative to stage capacity, each capped at 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceUtilization {
    pub prep: f64,
    pub sequencing: f64,
}

/// Result of a schedule optimization.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchedulePlan {
    /// Highest priority first, bounded by the queue window.
    pub queue: Vec<ScheduledJob>,
    pub utilization: ResourceUtilization,
    /// Operator-facing advisory text. Not meant to be parsed.
    pub insights: Vec<String>,
}
