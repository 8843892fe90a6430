//! Rule-based candidate scoring.
//!
//! A small, domain-agnostic engine for ranking candidates with one or
//! more scoring rules:
//!
//! - **Sequential evaluation**: rules are applied in order; later rules
//!   act as tie-breakers when earlier rules cannot differentiate.
//! - **Weighted evaluation**: all rules contribute via a weighted sum,
//!   optionally renormalized so the weights total 1.0.
//!
//! The schedule queue ranks jobs through it and the assignment optimizer
//! ranks workers through it. The domain rules live next to their callers.
//!
//! # References
//!
//! Dispatching rule composition: Pinedo (2016), "Scheduling: Theory,
//! Algorithms, and Systems"

mod engine;
mod types;

pub use engine::{EvaluationMode, RuleSet, TieBreaker};
pub use types::{RuleContribution, ScoringRule};
