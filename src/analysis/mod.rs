//! Stage analysis: throughput metrics, bottleneck detection, and the
//! priority schedule queue.
//!
//! # Key Functions
//!
//! - [`analyze_performance`]: per-stage duration, success rate, utilization
//!   and bottleneck score over a submission window
//! - [`optimize_schedule`]: priority-weighted, capacity-constrained queue of
//!   pending jobs
//!
//! # Bottleneck Score
//!
//! For a non-terminal stage `s`:
//!
//! ```text
//! score(s) = occupancy_weight * share(s)
//!          + dwell_weight * min(avg_age_days(s) / dwell_normalization_days, 1)
//! ```
//!
//! where `share(s)` is the fraction of filtered jobs sitting in `s`. A
//! stage needs both a disproportionate share of jobs and old jobs to
//! cross the default 0.7 threshold.

mod config;
mod performance;
mod schedule;
mod types;

pub use config::{AnalyzerConfig, PriorityWeights, ResourceConstraints, ScheduleConfig};
pub use performance::analyze_performance;
pub use schedule::{optimize_schedule, priority_score};
pub use types::{
    AnalysisWindow, OverallMetrics, PerformanceReport, ResourceUtilization, ScheduledJob,
    SchedulePlan, StagePerformance,
};
