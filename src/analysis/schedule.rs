//! Priority-weighted, capacity-constrained schedule recommendation.

use super::config::{PriorityWeights, ScheduleConfig};
use super::types::{ResourceUtilization, ScheduledJob, SchedulePlan};
use crate::error::Result;
use crate::model::{Job, Priority};
use crate::scoring::{EvaluationMode, RuleSet, ScoringRule, TieBreaker};
use crate::stats::{add_days, ratio, unit_clamp};
use chrono::{DateTime, Utc};

/// What the schedule rules score a job against.
struct QueueContext<'a> {
    now: DateTime<Utc>,
    weights: &'a PriorityWeights,
    age_bonus_cap_days: f64,
}

/// Priority class weight plus a capped age bonus.
struct PriorityWithAge;

impl ScoringRule<Job, QueueContext<'_>> for PriorityWithAge {
    fn name(&self) -> &str {
        "priority_with_age"
    }

    fn score(&self, job: &Job, ctx: &QueueContext<'_>) -> f64 {
        priority_score(job, ctx.now, ctx.weights, ctx.age_bonus_cap_days)
    }
}

/// Older submissions first.
struct Seniority;

impl ScoringRule<Job, QueueContext<'_>> for Seniority {
    fn name(&self) -> &str {
        "seniority"
    }

    fn score(&self, job: &Job, _ctx: &QueueContext<'_>) -> f64 {
        -(job.submitted_at.timestamp_millis() as f64)
    }
}

/// `weight[priority] + min(age_days, cap)`.
///
/// Age is measured in fractional days (elapsed milliseconds / 86 400 000)
/// and never goes negative.
pub fn priority_score(
    job: &Job,
    now: DateTime<Utc>,
    weights: &PriorityWeights,
    age_bonus_cap_days: f64,
) -> f64 {
    weights.weight(job.priority) + job.age_days(now).min(age_bonus_cap_days)
}

/// Orders pending jobs by priority and assigns start dates under the
/// prep capacity limit.
///
/// Jobs are ranked by [`priority_score`], highest first. Equal scores (on
/// the same 1e-9 step) go to the job submitted earlier; jobs that tie on
/// both keep their input order. The `k`-th queued job (zero-based) starts
/// `floor(k / max_prep_capacity)` days after `now` and completes
/// `turnaround_days` later, saturating at the latest representable
/// instant. Only the top `queue_window` jobs are returned; utilization is
/// computed over the full pending set.
///
/// Completed and archived jobs in `pending` are ignored.
pub fn optimize_schedule(
    pending: &[Job],
    now: DateTime<Utc>,
    config: &ScheduleConfig,
) -> Result<SchedulePlan> {
    config.validate()?;

    let candidates: Vec<Job> = pending
        .iter()
        .filter(|j| !j.stage.is_terminal())
        .cloned()
        .collect();
    let skipped = pending.len() - candidates.len();
    if skipped > 0 {
        tracing::debug!(skipped, "ignoring finished jobs in pending set");
    }

    let unrecognized = candidates
        .iter()
        .filter(|j| j.priority == Priority::Unrecognized)
        .count();
    if unrecognized > 0 {
        tracing::warn!(unrecognized, "jobs with unrecognized priority ranked as low");
    }

    let ctx = QueueContext {
        now,
        weights: &config.weights,
        age_bonus_cap_days: config.age_bonus_cap_days,
    };
    let rules: RuleSet<Job, QueueContext<'_>> = RuleSet::new()
        .with_mode(EvaluationMode::Sequential)
        .with_rule(PriorityWithAge)
        .with_rule(Seniority)
        .with_tie_breaker(TieBreaker::PreserveOrder);

    let prep_capacity = config.constraints.max_prep_capacity as usize;

    let queue: Vec<ScheduledJob> = rules
        .rank(&candidates, &ctx)
        .into_iter()
        .take(config.queue_window)
        .enumerate()
        .map(|(position, job)| {
            let day_offset = (position / prep_capacity) as f64;
            let scheduled_start = add_days(now, day_offset);
            ScheduledJob {
                job_id: job.id.clone(),
                priority: job.priority,
                priority_score: priority_score(
                    job,
                    now,
                    &config.weights,
                    config.age_bonus_cap_days,
                ),
                position,
                scheduled_start,
                estimated_completion: add_days(scheduled_start, config.turnaround_days),
            }
        })
        .collect();

    let pending_count = candidates.len() as f64;
    let utilization = ResourceUtilization {
        prep: unit_clamp(ratio(
            pending_count,
            config.constraints.max_prep_capacity as f64,
        )),
        sequencing: unit_clamp(ratio(
            pending_count,
            config.constraints.max_sequencing_capacity as f64,
        )),
    };

    let insights = schedule_insights(&candidates, &queue, &utilization, config);

    tracing::debug!(
        pending = candidates.len(),
        queued = queue.len(),
        prep_utilization = utilization.prep,
        "schedule optimized"
    );

    Ok(SchedulePlan {
        queue,
        utilization,
        insights,
    })
}

fn schedule_insights(
    candidates: &[Job],
    queue: &[ScheduledJob],
    utilization: &ResourceUtilization,
    config: &ScheduleConfig,
) -> Vec<String> {
    if candidates.is_empty() {
        return vec!["No pending jobs to schedule".to_string()];
    }

    let mut insights = vec![
        format!(
            "{} jobs pending, {} in visible queue",
            candidates.len(),
            queue.len()
        ),
        format!("Prep utilization {:.0}%", utilization.prep * 100.0),
        format!("Sequencing utilization {:.0}%", utilization.sequencing * 100.0),
    ];

    let urgent = candidates
        .iter()
        .filter(|j| j.priority == Priority::Urgent)
        .count();
    if urgent > 0 {
        insights.push(format!("{urgent} urgent jobs waiting"));
    }

    let prep_capacity = config.constraints.max_prep_capacity as usize;
    if candidates.len() >= prep_capacity {
        insights.push(format!(
            "Prep capacity saturated: backlog needs {} days at {} jobs per day",
            candidates.len().div_ceil(prep_capacity),
            prep_capacity
        ));
    }
    if utilization.sequencing >= 1.0 {
        insights.push("Sequencing capacity saturated".to_string());
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::config::ResourceConstraints;
    use crate::model::{JobType, Stage};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn pending(id: &str, priority: Priority, submitted: DateTime<Utc>) -> Job {
        Job::new(id, JobType::Dna, submitted).with_priority(priority)
    }

    #[test]
    fn test_priority_score_age_bonus() {
        let w = PriorityWeights::default();
        let fresh = pending("a", Priority::High, now());
        assert!((priority_score(&fresh, now(), &w, 2.0) - 3.0).abs() < 1e-12);

        let day_and_half = pending("b", Priority::Low, now() - Duration::hours(36));
        assert!((priority_score(&day_and_half, now(), &w, 2.0) - 2.5).abs() < 1e-12);

        let old = pending("c", Priority::Low, now() - Duration::days(30));
        assert!((priority_score(&old, now(), &w, 2.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_orders_by_priority() {
        let jobs = vec![
            pending("low", Priority::Low, now()),
            pending("urgent", Priority::Urgent, now()),
            pending("normal", Priority::Normal, now()),
            pending("high", Priority::High, now()),
        ];
        let plan = optimize_schedule(&jobs, now(), &ScheduleConfig::default()).unwrap();
        let ids: Vec<&str> = plan.queue.iter().map(|s| s.job_id.as_str()).collect();
        assert_eq!(ids, vec!["urgent", "high", "normal", "low"]);
    }

    #[test]
    fn test_equal_score_prefers_older() {
        let jobs = vec![
            pending("urgent-today", Priority::Urgent, now()),
            pending("normal-old", Priority::Normal, now() - Duration::days(10)),
        ];
        let plan = optimize_schedule(&jobs, now(), &ScheduleConfig::default()).unwrap();
        assert!((plan.queue[0].priority_score - 4.0).abs() < 1e-12);
        assert!((plan.queue[1].priority_score - 4.0).abs() < 1e-12);
        assert_eq!(plan.queue[0].job_id, "normal-old");
    }

    #[test]
    fn test_full_tie_keeps_input_order() {
        let jobs = vec![
            pending("first", Priority::High, now()),
            pending("second", Priority::High, now()),
        ];
        let plan = optimize_schedule(&jobs, now(), &ScheduleConfig::default()).unwrap();
        assert_eq!(plan.queue[0].job_id, "first");
        assert_eq!(plan.queue[1].job_id, "second");
    }

    #[test]
    fn test_start_dates_follow_prep_capacity() {
        let jobs: Vec<Job> = (0..5)
            .map(|i| pending(&format!("j{i}"), Priority::Normal, now()))
            .collect();
        let config = ScheduleConfig::default().with_constraints(ResourceConstraints {
            max_prep_capacity: 2,
            max_sequencing_capacity: 10,
        });
        let plan = optimize_schedule(&jobs, now(), &config).unwrap();

        let offsets: Vec<i64> = plan
            .queue
            .iter()
            .map(|s| (s.scheduled_start - now()).num_days())
            .collect();
        assert_eq!(offsets, vec![0, 0, 1, 1, 2]);
        for s in &plan.queue {
            assert_eq!(s.estimated_completion - s.scheduled_start, Duration::days(3));
        }
        assert_eq!(plan.utilization.prep, 1.0);
        assert!((plan.utilization.sequencing - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_near_equal_weights_rank_many_jobs() {
        let weights = PriorityWeights {
            urgent: 1.0 + 1.8e-9,
            high: 1.0 + 1.2e-9,
            normal: 1.0 + 6e-10,
            low: 1.0,
        };
        let config = ScheduleConfig::default()
            .with_weights(weights)
            .with_age_bonus_cap_days(0.0)
            .with_queue_window(200);
        let classes = [Priority::Urgent, Priority::High, Priority::Normal, Priority::Low];

        for seed in 1..20usize {
            let jobs: Vec<Job> = (0..200usize)
                .map(|i| {
                    let k = (i * 7919 + seed * 104_729) % 997;
                    pending(
                        &format!("j{i}"),
                        classes[k % 4],
                        now() - Duration::minutes(k as i64),
                    )
                })
                .collect();
            let plan = optimize_schedule(&jobs, now(), &config).unwrap();
            assert_eq!(plan.queue.len(), 200);
            for pair in plan.queue.windows(2) {
                assert!(pair[0].priority_score + 1e-9 >= pair[1].priority_score);
            }
        }
    }

    #[test]
    fn test_huge_turnaround_saturates_completion() {
        let config = ScheduleConfig::default().with_turnaround_days(1e12);
        config.validate().unwrap();
        let jobs = vec![pending("a", Priority::High, now())];
        let plan = optimize_schedule(&jobs, now(), &config).unwrap();
        assert_eq!(plan.queue[0].scheduled_start, now());
        assert_eq!(plan.queue[0].estimated_completion, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_queue_window_bounds_output() {
        let jobs: Vec<Job> = (0..30)
            .map(|i| pending(&format!("j{i}"), Priority::Low, now()))
            .collect();
        let plan = optimize_schedule(&jobs, now(), &ScheduleConfig::default()).unwrap();
        assert_eq!(plan.queue.len(), 20);
        assert_eq!(plan.queue.last().unwrap().position, 19);
        assert!(plan.insights[0].starts_with("30 jobs pending, 20 in visible queue"));
    }

    #[test]
    fn test_empty_pending() {
        let plan = optimize_schedule(&[], now(), &ScheduleConfig::default()).unwrap();
        assert!(plan.queue.is_empty());
        assert_eq!(plan.utilization, ResourceUtilization::default());
        assert_eq!(plan.insights, vec!["No pending jobs to schedule".to_string()]);
    }

    #[test]
    fn test_finished_jobs_ignored() {
        let jobs = vec![
            pending("done", Priority::Urgent, now()).with_stage(Stage::Completed),
            pending("open", Priority::Low, now()),
        ];
        let plan = optimize_schedule(&jobs, now(), &ScheduleConfig::default()).unwrap();
        assert_eq!(plan.queue.len(), 1);
        assert_eq!(plan.queue[0].job_id, "open");
    }

    #[test]
    fn test_urgent_insight() {
        let jobs = vec![
            pending("u1", Priority::Urgent, now()),
            pending("u2", Priority::Urgent, now()),
            pending("n", Priority::Normal, now()),
        ];
        let plan = optimize_schedule(&jobs, now(), &ScheduleConfig::default()).unwrap();
        assert!(plan.insights.contains(&"2 urgent jobs waiting".to_string()));
        assert!(plan.insights.contains(&"Prep utilization 30%".to_string()));
    }

    #[test]
    fn test_unrecognized_priority_ranks_as_low() {
        let jobs = vec![
            pending("odd", Priority::Unrecognized, now()),
            pending("normal", Priority::Normal, now()),
        ];
        let plan = optimize_schedule(&jobs, now(), &ScheduleConfig::default()).unwrap();
        assert_eq!(plan.queue[0].job_id, "normal");
        assert!((plan.queue[1].priority_score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ScheduleConfig::default().with_turnaround_days(0.0);
        assert!(optimize_schedule(&[], now(), &config).is_err());
    }
}
