//! Assignment scoring and balance configuration.

use crate::error::{ensure_unit, ConfigError};

/// Relative weights of the three assignment criteria.
///
/// Only the weights of enabled criteria are used, renormalized to sum to
/// 1.0, so the composite score always spans `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ScoringWeights {
    pub workload: f64,
    pub skill: f64,
    pub efficiency: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            workload: 0.4,
            skill: 0.4,
            efficiency: 0.2,
        }
    }
}

/// Which criteria contribute to the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ScoringOptions {
    pub workload: bool,
    pub skill: bool,
    pub efficiency: bool,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            workload: true,
            skill: true,
            efficiency: true,
        }
    }
}

impl ScoringOptions {
    pub fn any_enabled(&self) -> bool {
        self.workload || self.skill || self.efficiency
    }
}

/// Tunables for [`recommend`](super::recommend).
///
/// # Examples
///
/// ```
/// use workflow_intel::assignment::{ScoringConfig, ScoringOptions};
///
/// let config = ScoringConfig::default().with_options(ScoringOptions {
///     efficiency: false,
///     ..ScoringOptions::default()
/// });
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    pub options: ScoringOptions,
    /// Skill score for a worker lacking the required skill. Non-zero so an
    /// available but unskilled worker stays assignable.
    pub skill_mismatch_score: f64,
    /// Share of recommendations landing on one worker above which an
    /// imbalance insight is emitted.
    pub concentration_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            options: ScoringOptions::default(),
            skill_mismatch_score: 0.3,
            concentration_threshold: 0.5,
        }
    }
}

impl ScoringConfig {
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_options(mut self, options: ScoringOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_skill_mismatch_score(mut self, score: f64) -> Self {
        self.skill_mismatch_score = score;
        self
    }

    pub fn with_concentration_threshold(mut self, threshold: f64) -> Self {
        self.concentration_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.options.any_enabled() {
            return Err(ConfigError::Invalid(
                "at least one scoring criterion must be enabled".into(),
            ));
        }
        ensure_unit("weights.workload", self.weights.workload)?;
        ensure_unit("weights.skill", self.weights.skill)?;
        ensure_unit("weights.efficiency", self.weights.efficiency)?;

        let enabled_total = [
            (self.options.workload, self.weights.workload),
            (self.options.skill, self.weights.skill),
            (self.options.efficiency, self.weights.efficiency),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, w)| w)
        .sum::<f64>();
        if enabled_total <= 0.0 {
            return Err(ConfigError::Invalid(
                "enabled scoring weights must not all be zero".into(),
            ));
        }

        ensure_unit("skill_mismatch_score", self.skill_mismatch_score)?;
        ensure_unit("concentration_threshold", self.concentration_threshold)?;
        Ok(())
    }
}

/// Tunables for [`analyze_workload_balance`](super::analyze_workload_balance).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BalanceConfig {
    /// Utilization above which a worker is overloaded.
    pub overload_threshold: f64,
    /// Utilization below which a worker is underutilized.
    pub underutilized_threshold: f64,
    /// Balance score below which the distribution is reported as uneven.
    pub balance_warning_threshold: f64,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            overload_threshold: 0.9,
            underutilized_threshold: 0.5,
            balance_warning_threshold: 0.7,
        }
    }
}

impl BalanceConfig {
    pub fn with_overload_threshold(mut self, threshold: f64) -> Self {
        self.overload_threshold = threshold;
        self
    }

    pub fn with_underutilized_threshold(mut self, threshold: f64) -> Self {
        self.underutilized_threshold = threshold;
        self
    }

    pub fn with_balance_warning_threshold(mut self, threshold: f64) -> Self {
        self.balance_warning_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.overload_threshold.is_finite() || self.overload_threshold <= 0.0 {
            return Err(ConfigError::NotPositive {
                name: "overload_threshold",
                value: self.overload_threshold,
            });
        }
        ensure_unit("underutilized_threshold", self.underutilized_threshold)?;
        if self.underutilized_threshold >= self.overload_threshold {
            return Err(ConfigError::Invalid(format!(
                "underutilized_threshold ({}) must be below overload_threshold ({})",
                self.underutilized_threshold, self.overload_threshold
            )));
        }
        ensure_unit("balance_warning_threshold", self.balance_warning_threshold)?;
        Ok(())
    }
}
