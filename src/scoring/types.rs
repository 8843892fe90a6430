//! Core trait for scoring rules.

/// A rule that assigns a desirability score to a candidate.
///
/// Rules return `f64` scores where **higher is better**. The same trait
/// ranks jobs in the schedule queue and workers for an assignment.
///
/// # Type Parameters
///
/// * `T` - The candidate type being scored
/// * `C` - The context the candidate is scored against
///
/// # Examples
///
/// ```
/// use workflow_intel::scoring::ScoringRule;
/// use workflow_intel::model::Worker;
///
/// struct Headroom;
///
/// impl ScoringRule<Worker, ()> for Headroom {
///     fn name(&self) -> &str { "headroom" }
///     fn score(&self, worker: &Worker, _ctx: &()) -> f64 {
///         worker.headroom() as f64
///     }
/// }
/// ```
pub trait ScoringRule<T, C>: Send + Sync {
    /// Returns the name of this rule.
    fn name(&self) -> &str;

    /// Computes a score for the candidate. Higher is better.
    fn score(&self, item: &T, context: &C) -> f64;
}

/// One rule's share of a weighted composite score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleContribution {
    /// Rule name.
    pub rule: String,
    /// Unweighted score returned by the rule.
    pub raw: f64,
    /// Weight applied to the raw score.
    pub weight: f64,
}

impl RuleContribution {
    /// `raw * weight`.
    pub fn weighted(&self) -> f64 {
        self.raw * self.weight
    }
}
