//! Rule composition engine.

use super::types::{RuleContribution, ScoringRule};
use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How multiple rules are combined to produce a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationMode {
    /// Rules are applied in order. A later rule is only consulted
    /// when the previous rule produces a tie (within epsilon).
    Sequential,

    /// All rules contribute simultaneously via weighted sum.
    Weighted,
}

/// Strategy for breaking ties when all rules produce equal scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreaker {
    /// Keep the original order (stable sort).
    PreserveOrder,

    /// Break ties by candidate index (earliest wins).
    ByIndex,
}

struct WeightedRule<T, C> {
    rule: Box<dyn ScoringRule<T, C>>,
    weight: f64,
}

/// Composes scoring rules and ranks candidates with them.
///
/// Candidates are ranked **highest score first**. Scores that fall on the
/// same `epsilon` grid step count as equal, and ties are resolved by the
/// configured [`TieBreaker`], so a ranking over the same input is always
/// reproducible.
///
/// # Examples
///
/// ```ignore
/// let rules = RuleSet::new()
///     .with_mode(EvaluationMode::Weighted)
///     .with_weighted_rule(WorkloadHeadroom, 0.4)
///     .with_weighted_rule(SkillMatch::new(0.3), 0.4)
///     .with_weighted_rule(Efficiency, 0.2)
///     .with_tie_breaker(TieBreaker::ByIndex);
///
/// let best = rules.select_best(&workers, &context);
/// ```
pub struct RuleSet<T, C> {
    rules: Vec<WeightedRule<T, C>>,
    mode: EvaluationMode,
    tie_breaker: TieBreaker,
    epsilon: f64,
}

impl<T, C> RuleSet<T, C> {
    /// Creates an empty rule set in sequential mode.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            mode: EvaluationMode::Sequential,
            tie_breaker: TieBreaker::PreserveOrder,
            epsilon: 1e-9,
        }
    }

    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_tie_breaker(mut self, tb: TieBreaker) -> Self {
        self.tie_breaker = tb;
        self
    }

    /// Sets the epsilon for floating-point comparison.
    pub fn with_epsilon(mut self, eps: f64) -> Self {
        self.epsilon = eps;
        self
    }

    /// Adds a rule with weight 1.0.
    pub fn with_rule<R: ScoringRule<T, C> + 'static>(mut self, rule: R) -> Self {
        self.rules.push(WeightedRule {
            rule: Box::new(rule),
            weight: 1.0,
        });
        self
    }

    /// Adds a rule with a custom weight (for Weighted mode).
    pub fn with_weighted_rule<R: ScoringRule<T, C> + 'static>(
        mut self,
        rule: R,
        weight: f64,
    ) -> Self {
        self.rules.push(WeightedRule {
            rule: Box::new(rule),
            weight,
        });
        self
    }

    /// Rescales weights so they sum to 1.0.
    ///
    /// Used when some criteria are switched off: the remaining weights
    /// keep their proportions and the composite keeps its range. A rule
    /// set whose weights sum to zero is returned unchanged.
    pub fn normalized(mut self) -> Self {
        let total: f64 = self.rules.iter().map(|wr| wr.weight).sum();
        if total > 0.0 && total.is_finite() {
            for wr in &mut self.rules {
                wr.weight /= total;
            }
        }
        self
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|wr| wr.rule.name()).collect()
    }

    /// Current weights, in rule order.
    pub fn weights(&self) -> Vec<f64> {
        self.rules.iter().map(|wr| wr.weight).collect()
    }

    /// In Sequential mode, returns the vector of individual rule scores.
    /// In Weighted mode, returns a single-element vector with the weighted sum.
    fn compute_scores(&self, item: &T, context: &C) -> Vec<f64> {
        match self.mode {
            EvaluationMode::Sequential => self
                .rules
                .iter()
                .map(|wr| wr.rule.score(item, context))
                .collect(),
            EvaluationMode::Weighted => {
                let sum: f64 = self
                    .rules
                    .iter()
                    .map(|wr| wr.rule.score(item, context) * wr.weight)
                    .sum();
                vec![sum]
            }
        }
    }

    fn compare(&self, a: usize, b: usize, sa: &[f64], sb: &[f64]) -> Ordering {
        for (va, vb) in sa.iter().zip(sb.iter()) {
            if (va - vb).abs() > self.epsilon {
                // Descending: the higher score ranks first.
                return vb.partial_cmp(va).unwrap_or(Ordering::Equal);
            }
        }
        match self.tie_breaker {
            TieBreaker::PreserveOrder => Ordering::Equal,
            TieBreaker::ByIndex => a.cmp(&b),
        }
    }

    /// Snaps a score onto the `epsilon` grid so that ranking compares a
    /// total order. NaN ranks last.
    fn quantize(&self, value: f64) -> f64 {
        if value.is_nan() {
            f64::NEG_INFINITY
        } else if self.epsilon > 0.0 {
            (value / self.epsilon).round()
        } else {
            value
        }
    }

    fn compare_keys(&self, a: usize, b: usize, ka: &[f64], kb: &[f64]) -> Ordering {
        for (va, vb) in ka.iter().zip(kb.iter()) {
            // Descending: the higher score ranks first.
            match vb.total_cmp(va) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        match self.tie_breaker {
            TieBreaker::PreserveOrder => Ordering::Equal,
            TieBreaker::ByIndex => a.cmp(&b),
        }
    }

    /// Returns the per-rule contributions for one candidate.
    pub fn breakdown(&self, item: &T, context: &C) -> Vec<RuleContribution> {
        self.rules
            .iter()
            .map(|wr| RuleContribution {
                rule: wr.rule.name().to_string(),
                raw: wr.rule.score(item, context),
                weight: wr.weight,
            })
            .collect()
    }

    /// Scores a single candidate.
    ///
    /// In Weighted mode, returns the weighted sum.
    /// In Sequential mode, returns the first rule's score.
    pub fn score(&self, item: &T, context: &C) -> f64 {
        self.compute_scores(item, context)
            .first()
            .copied()
            .unwrap_or(0.0)
    }
}

impl<T: Sync, C: Sync> RuleSet<T, C> {
    fn score_all(&self, items: &[T], context: &C) -> Vec<Vec<f64>> {
        #[cfg(feature = "parallel")]
        {
            items
                .par_iter()
                .map(|item| self.compute_scores(item, context))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            items
                .iter()
                .map(|item| self.compute_scores(item, context))
                .collect()
        }
    }

    /// Ranks candidates, best first.
    ///
    /// Returns indices into the original slice.
    pub fn rank_indices(&self, items: &[T], context: &C) -> Vec<usize> {
        if self.rules.is_empty() {
            return (0..items.len()).collect();
        }

        let keys: Vec<Vec<f64>> = self
            .score_all(items, context)
            .into_iter()
            .map(|scores| scores.into_iter().map(|v| self.quantize(v)).collect())
            .collect();
        let mut indices: Vec<usize> = (0..items.len()).collect();
        indices.sort_by(|&a, &b| self.compare_keys(a, b, &keys[a], &keys[b]));
        indices
    }

    /// Ranks candidates and returns references, best first.
    pub fn rank<'a>(&self, items: &'a [T], context: &C) -> Vec<&'a T> {
        self.rank_indices(items, context)
            .into_iter()
            .map(|i| &items[i])
            .collect()
    }

    /// Returns the index of the best candidate, `None` for an empty slice.
    ///
    /// Single pass: the first candidate wins every tie, so with
    /// [`TieBreaker::ByIndex`] the earliest equally scored candidate is
    /// chosen.
    pub fn select_best(&self, items: &[T], context: &C) -> Option<usize> {
        if items.is_empty() {
            return None;
        }
        let scores = self.score_all(items, context);
        let mut best = 0;
        for i in 1..items.len() {
            if self.compare(i, best, &scores[i], &scores[best]) == Ordering::Less {
                best = i;
            }
        }
        Some(best)
    }
}

impl<T, C> Default for RuleSet<T, C> {
    fn default() -> Self {
        Self::new()
    }
}
