//! Multi-criteria worker recommendation.

use super::config::ScoringConfig;
use super::types::{AssignmentPlan, AssignmentRecommendation, WorkloadProjection};
use crate::error::Result;
use crate::model::{DurationModel, Job, SkillMap, Worker};
use crate::scoring::{EvaluationMode, RuleSet, ScoringRule, TieBreaker};
use crate::stats::{add_days, ratio, round2, unit_clamp};
use chrono::{DateTime, Utc};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// What a worker is scored against for one job.
struct CandidateContext<'a> {
    required_skill: Option<&'a str>,
    mismatch_score: f64,
}

/// `max(0, 1 - current_workload / max_capacity)`; 0 for zero capacity.
struct WorkloadHeadroom;

impl ScoringRule<Worker, CandidateContext<'_>> for WorkloadHeadroom {
    fn name(&self) -> &str {
        "workload"
    }

    fn score(&self, worker: &Worker, _ctx: &CandidateContext<'_>) -> f64 {
        if worker.max_capacity == 0 {
            return 0.0;
        }
        (1.0 - worker.utilization()).max(0.0)
    }
}

/// 1.0 when the worker holds the required skill, the mismatch floor
/// otherwise.
struct SkillMatch;

impl ScoringRule<Worker, CandidateContext<'_>> for SkillMatch {
    fn name(&self) -> &str {
        "skill"
    }

    fn score(&self, worker: &Worker, ctx: &CandidateContext<'_>) -> f64 {
        match ctx.required_skill {
            Some(skill) if !worker.has_skill(skill) => ctx.mismatch_score,
            _ => 1.0,
        }
    }
}

struct Efficiency;

impl ScoringRule<Worker, CandidateContext<'_>> for Efficiency {
    fn name(&self) -> &str {
        "efficiency"
    }

    fn score(&self, worker: &Worker, _ctx: &CandidateContext<'_>) -> f64 {
        unit_clamp(worker.efficiency_rating)
    }
}

/// Builds the weighted rule set for the enabled criteria, weights
/// renormalized to sum to 1.0. Ties go to the earliest roster entry.
fn assignment_rules<'a>(config: &ScoringConfig) -> RuleSet<Worker, CandidateContext<'a>> {
    let mut rules = RuleSet::new()
        .with_mode(EvaluationMode::Weighted)
        .with_tie_breaker(TieBreaker::ByIndex);
    if config.options.workload {
        rules = rules.with_weighted_rule(WorkloadHeadroom, config.weights.workload);
    }
    if config.options.skill {
        rules = rules.with_weighted_rule(SkillMatch, config.weights.skill);
    }
    if config.options.efficiency {
        rules = rules.with_weighted_rule(Efficiency, config.weights.efficiency);
    }
    rules.normalized()
}

/// Recommends the best worker for each unassigned, unfinished job.
///
/// Each (job, worker) pair gets a composite score: a weighted sum of
/// workload headroom, skill match and efficiency (see [`ScoringConfig`]).
/// The highest composite wins; **ties go to the worker that appears first
/// in `workers`**, so results are reproducible for a given roster order.
///
/// Jobs are scored independently against the same roster snapshot. The
/// plan's projections show the load each worker would carry if every
/// recommendation were accepted.
///
/// An empty roster yields no recommendations and a diagnostic insight.
///
/// # Errors
///
/// Returns [`EngineError::Config`](crate::EngineError::Config) for an
/// invalid configuration.
pub fn recommend(
    jobs: &[Job],
    workers: &[Worker],
    now: DateTime<Utc>,
    skills: &dyn SkillMap,
    durations: &dyn DurationModel,
    config: &ScoringConfig,
) -> Result<AssignmentPlan> {
    config.validate()?;

    let candidates: Vec<&Job> = jobs
        .iter()
        .filter(|j| j.is_unassigned() && !j.stage.is_terminal())
        .collect();
    let skipped = jobs.len() - candidates.len();
    if skipped > 0 {
        tracing::debug!(skipped, "skipping assigned or finished jobs");
    }

    if workers.is_empty() {
        tracing::warn!(jobs = candidates.len(), "no workers available for assignment");
        return Ok(AssignmentPlan {
            recommendations: Vec::new(),
            projections: Vec::new(),
            insights: vec![format!(
                "No workers available; {} jobs left without a recommendation",
                candidates.len()
            )],
        });
    }
    if candidates.is_empty() {
        return Ok(AssignmentPlan {
            recommendations: Vec::new(),
            projections: project_workloads(workers, &[]),
            insights: vec!["No unassigned jobs to assign".to_string()],
        });
    }

    let rules = assignment_rules(config);
    let recommend_one = |job: &&Job| {
        recommend_for_job(job, workers, now, skills, durations, config, &rules)
    };

    #[cfg(feature = "parallel")]
    let recommendations: Vec<AssignmentRecommendation> =
        candidates.par_iter().filter_map(recommend_one).collect();
    #[cfg(not(feature = "parallel"))]
    let recommendations: Vec<AssignmentRecommendation> =
        candidates.iter().filter_map(recommend_one).collect();

    let projections = project_workloads(workers, &recommendations);
    let insights = assignment_insights(&recommendations, &projections, config);

    tracing::debug!(
        jobs = candidates.len(),
        recommendations = recommendations.len(),
        "assignment recommendations computed"
    );

    Ok(AssignmentPlan {
        recommendations,
        projections,
        insights,
    })
}

fn recommend_for_job<'a>(
    job: &Job,
    workers: &[Worker],
    now: DateTime<Utc>,
    skills: &'a dyn SkillMap,
    durations: &dyn DurationModel,
    config: &ScoringConfig,
    rules: &RuleSet<Worker, CandidateContext<'a>>,
) -> Option<AssignmentRecommendation> {
    let required_skill = skills.required_skill(job.job_type);
    let ctx = CandidateContext {
        required_skill,
        mismatch_score: config.skill_mismatch_score,
    };

    let best = rules.select_best(workers, &ctx)?;
    let worker = &workers[best];
    let composite = unit_clamp(rules.score(worker, &ctx));
    let breakdown = rules.breakdown(worker, &ctx);
    let skill_matched = required_skill.is_none_or(|s| worker.has_skill(s));

    let mut reasoning = format!(
        "{}: {} (composite {:.2})",
        worker.name,
        breakdown
            .iter()
            .map(|c| format!("{} {:.2} x {:.2}", c.rule, c.raw, c.weight))
            .collect::<Vec<_>>()
            .join(", "),
        composite
    );
    if let (false, Some(skill)) = (skill_matched, required_skill) {
        reasoning.push_str(&format!("; lacks required skill {skill}"));
    }

    Some(AssignmentRecommendation {
        job_id: job.id.clone(),
        recommended_worker: worker.id.clone(),
        worker_name: worker.name.clone(),
        confidence_score: round2(composite),
        reasoning,
        estimated_completion: add_days(now, processing_days(job, worker, durations)),
        skill_matched,
        breakdown,
    })
}

/// Base days for the job type scaled by the worker's efficiency.
fn processing_days(job: &Job, worker: &Worker, durations: &dyn DurationModel) -> f64 {
    let base = durations.base_processing_days(job.job_type);
    let efficiency = worker.efficiency_rating;
    if efficiency.is_finite() && efficiency > 0.0 {
        base / efficiency
    } else {
        tracing::warn!(
            worker = %worker.id,
            efficiency,
            "non-positive efficiency rating, using base duration"
        );
        base
    }
}

fn project_workloads(
    workers: &[Worker],
    recommendations: &[AssignmentRecommendation],
) -> Vec<WorkloadProjection> {
    workers
        .iter()
        .map(|w| {
            let recommended_jobs = recommendations
                .iter()
                .filter(|r| r.recommended_worker == w.id)
                .count() as u32;
            let projected_workload = w.current_workload.saturating_add(recommended_jobs);
            WorkloadProjection {
                worker_id: w.id.clone(),
                worker_name: w.name.clone(),
                current_workload: w.current_workload,
                recommended_jobs,
                projected_workload,
                max_capacity: w.max_capacity,
                projected_utilization: ratio(projected_workload as f64, w.max_capacity as f64),
                over_capacity: projected_workload > w.max_capacity,
            }
        })
        .collect()
}

fn assignment_insights(
    recommendations: &[AssignmentRecommendation],
    projections: &[WorkloadProjection],
    config: &ScoringConfig,
) -> Vec<String> {
    let used = projections.iter().filter(|p| p.recommended_jobs > 0).count();
    let mut insights = vec![format!(
        "{} jobs matched across {} workers",
        recommendations.len(),
        used
    )];

    let mismatched = recommendations.iter().filter(|r| !r.skill_matched).count();
    if mismatched > 0 {
        insights.push(format!(
            "{mismatched} jobs recommended to workers without the required skill"
        ));
    }

    for p in projections.iter().filter(|p| p.over_capacity) {
        insights.push(format!(
            "{} would exceed capacity ({}/{})",
            p.worker_name, p.projected_workload, p.max_capacity
        ));
    }

    if projections.len() > 1 {
        // First worker wins ties, keeping the message stable.
        let busiest = projections
            .iter()
            .fold(None::<&WorkloadProjection>, |best, p| match best {
                Some(b) if b.recommended_jobs >= p.recommended_jobs => Some(b),
                _ => Some(p),
            });
        if let Some(p) = busiest {
            let share = ratio(p.recommended_jobs as f64, recommendations.len() as f64);
            if share > config.concentration_threshold {
                insights.push(format!(
                    "Recommendations concentrate on {}: {} of {} jobs",
                    p.worker_name,
                    p.recommended_jobs,
                    recommendations.len()
                ));
            }
        }
    }

    insights
}
