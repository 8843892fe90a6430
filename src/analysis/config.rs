//! Analyzer and scheduler configuration.

use crate::error::{ensure_positive, ensure_unit, ConfigError};
use crate::model::{Priority, Stage};
use std::collections::BTreeMap;

/// Tunables for [`analyze_performance`](super::analyze_performance).
///
/// # Examples
///
/// ```
/// use workflow_intel::analysis::AnalyzerConfig;
/// use workflow_intel::model::Stage;
///
/// let config = AnalyzerConfig::default()
///     .with_bottleneck_threshold(0.6)
///     .with_stage_capacity(Stage::Prep, 15);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AnalyzerConfig {
    /// A stage is reported as a bottleneck when its score exceeds this.
    pub bottleneck_threshold: f64,

    /// Weight of the occupancy share term in the bottleneck score.
    pub occupancy_weight: f64,

    /// Weight of the dwell-age term in the bottleneck score.
    pub dwell_weight: f64,

    /// Average age (days) at which the dwell term saturates at 1.0.
    pub dwell_normalization_days: f64,

    /// Concurrent job capacity per stage, for resource utilization.
    /// Stages without an entry report zero utilization.
    pub stage_capacities: BTreeMap<Stage, u32>,

    /// Completion rate (percent) below which an insight is emitted.
    pub completion_rate_target: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        let stage_capacities = [
            (Stage::Submitted, 50),
            (Stage::Prep, 10),
            (Stage::Processing, 20),
            (Stage::Analysis, 15),
        ]
        .into_iter()
        .collect();
        Self {
            bottleneck_threshold: 0.7,
            occupancy_weight: 0.5,
            dwell_weight: 0.5,
            dwell_normalization_days: 10.0,
            stage_capacities,
            completion_rate_target: 80.0,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_bottleneck_threshold(mut self, threshold: f64) -> Self {
        self.bottleneck_threshold = threshold;
        self
    }

    /// Sets the occupancy and dwell weights.
    pub fn with_signal_weights(mut self, occupancy: f64, dwell: f64) -> Self {
        self.occupancy_weight = occupancy;
        self.dwell_weight = dwell;
        self
    }

    pub fn with_dwell_normalization_days(mut self, days: f64) -> Self {
        self.dwell_normalization_days = days;
        self
    }

    pub fn with_stage_capacity(mut self, stage: Stage, capacity: u32) -> Self {
        self.stage_capacities.insert(stage, capacity);
        self
    }

    pub fn with_completion_rate_target(mut self, percent: f64) -> Self {
        self.completion_rate_target = percent;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unit("bottleneck_threshold", self.bottleneck_threshold)?;
        ensure_unit("occupancy_weight", self.occupancy_weight)?;
        ensure_unit("dwell_weight", self.dwell_weight)?;
        let total = self.occupancy_weight + self.dwell_weight;
        if total <= 0.0 || total > 1.0 + 1e-9 {
            return Err(ConfigError::Invalid(format!(
                "occupancy_weight + dwell_weight must be in (0, 1], got {total}"
            )));
        }
        ensure_positive("dwell_normalization_days", self.dwell_normalization_days)?;
        if !(0.0..=100.0).contains(&self.completion_rate_target) {
            return Err(ConfigError::Invalid(format!(
                "completion_rate_target must be in [0, 100], got {}",
                self.completion_rate_target
            )));
        }
        Ok(())
    }
}

/// Relative weight of each priority class in the schedule score.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PriorityWeights {
    pub urgent: f64,
    pub high: f64,
    pub normal: f64,
    pub low: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            urgent: 4.0,
            high: 3.0,
            normal: 2.0,
            low: 1.0,
        }
    }
}

impl PriorityWeights {
    /// Weight for a priority class. Unrecognized priorities rank as low.
    pub fn weight(&self, priority: Priority) -> f64 {
        match priority {
            Priority::Urgent => self.urgent,
            Priority::High => self.high,
            Priority::Normal => self.normal,
            Priority::Low | Priority::Unrecognized => self.low,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("priority_weights.urgent", self.urgent)?;
        ensure_positive("priority_weights.high", self.high)?;
        ensure_positive("priority_weights.normal", self.normal)?;
        ensure_positive("priority_weights.low", self.low)?;
        Ok(())
    }
}

/// Two-stage capacity model bounding the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ResourceConstraints {
    /// Jobs the prep stage can start per day.
    pub max_prep_capacity: u32,
    /// Jobs the sequencing stage can hold at once.
    pub max_sequencing_capacity: u32,
}

impl Default for ResourceConstraints {
    fn default() -> Self {
        Self {
            max_prep_capacity: 10,
            max_sequencing_capacity: 20,
        }
    }
}

impl ResourceConstraints {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_prep_capacity == 0 {
            return Err(ConfigError::ZeroCount {
                name: "max_prep_capacity",
            });
        }
        if self.max_sequencing_capacity == 0 {
            return Err(ConfigError::ZeroCount {
                name: "max_sequencing_capacity",
            });
        }
        Ok(())
    }
}

/// Tunables for [`optimize_schedule`](super::optimize_schedule).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ScheduleConfig {
    pub weights: PriorityWeights,
    pub constraints: ResourceConstraints,
    /// Upper bound on the age bonus, in days.
    pub age_bonus_cap_days: f64,
    /// Number of jobs returned in the visible queue.
    pub queue_window: usize,
    /// Fixed turnaround from scheduled start to completion, in days.
    pub turnaround_days: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            weights: PriorityWeights::default(),
            constraints: ResourceConstraints::default(),
            age_bonus_cap_days: 2.0,
            queue_window: 20,
            turnaround_days: 3.0,
        }
    }
}

impl ScheduleConfig {
    pub fn with_weights(mut self, weights: PriorityWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_constraints(mut self, constraints: ResourceConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_age_bonus_cap_days(mut self, days: f64) -> Self {
        self.age_bonus_cap_days = days;
        self
    }

    pub fn with_queue_window(mut self, n: usize) -> Self {
        self.queue_window = n;
        self
    }

    pub fn with_turnaround_days(mut self, days: f64) -> Self {
        self.turnaround_days = days;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        self.constraints.validate()?;
        if !self.age_bonus_cap_days.is_finite() || self.age_bonus_cap_days < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "age_bonus_cap_days must be non-negative, got {}",
                self.age_bonus_cap_days
            )));
        }
        if self.queue_window == 0 {
            return Err(ConfigError::ZeroCount {
                name: "queue_window",
            });
        }
        ensure_positive("turnaround_days", self.turnaround_days)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_defaults() {
        let config = AnalyzerConfig::default();
        assert!((config.bottleneck_threshold - 0.7).abs() < 1e-12);
        assert!((config.dwell_normalization_days - 10.0).abs() < 1e-12);
        assert_eq!(config.stage_capacities.get(&Stage::Prep), Some(&10));
        assert!(config.stage_capacities.get(&Stage::Completed).is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_analyzer_rejects_bad_weights() {
        let config = AnalyzerConfig::default().with_signal_weights(0.8, 0.8);
        assert!(config.validate().is_err());

        let config = AnalyzerConfig::default().with_signal_weights(0.0, 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_analyzer_rejects_bad_threshold() {
        let config = AnalyzerConfig::default().with_bottleneck_threshold(1.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfUnitRange {
                name: "bottleneck_threshold",
                ..
            })
        ));
    }

    #[test]
    fn test_priority_weights() {
        let w = PriorityWeights::default();
        assert_eq!(w.weight(Priority::Urgent), 4.0);
        assert_eq!(w.weight(Priority::Normal), 2.0);
        assert_eq!(w.weight(Priority::Unrecognized), 1.0);

        let bad = PriorityWeights { high: 0.0, ..w };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_schedule_defaults() {
        let config = ScheduleConfig::default();
        assert_eq!(config.queue_window, 20);
        assert!((config.turnaround_days - 3.0).abs() < 1e-12);
        assert!((config.age_bonus_cap_days - 2.0).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_schedule_rejects_zero_capacity() {
        let config = ScheduleConfig::default().with_constraints(ResourceConstraints {
            max_prep_capacity: 0,
            max_sequencing_capacity: 5,
        });
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroCount {
                name: "max_prep_capacity"
            })
        );
    }

    #[test]
    fn test_schedule_rejects_zero_window() {
        let config = ScheduleConfig::default().with_queue_window(0);
        assert!(config.validate().is_err());
    }
}
