//! Workload balance over the current assignment snapshot.

use super::config::BalanceConfig;
use super::types::{BalanceReport, WorkerUtilization};
use crate::error::Result;
use crate::model::{resolve_worker, Job, Worker};
use crate::stats::{coefficient_of_variation, ratio};

/// Measures how evenly the current assignments spread across the roster.
///
/// A worker's utilization is the number of unfinished jobs whose
/// `assigned_worker` resolves to it divided by its
/// `max_capacity`. A reference resolves by id first and by name only when
/// no id matches, so each job counts toward at most one worker. This
/// reads the actual assignment snapshot, not the hypothetical output of
/// [`recommend`](super::recommend).
///
/// `balance_score = max(0, 1 - stddev / mean)` over all utilizations, so
/// identical utilizations score exactly 1.0. Suggestions are emitted in a
/// fixed order: overloaded workers, underutilized workers, a pairing
/// suggestion, an unevenness warning, then orphaned assignments.
pub fn analyze_workload_balance(
    assigned_jobs: &[Job],
    workers: &[Worker],
    config: &BalanceConfig,
) -> Result<BalanceReport> {
    config.validate()?;

    let mut counts = vec![0u32; workers.len()];
    let mut orphaned = 0usize;
    for reference in assigned_jobs
        .iter()
        .filter(|j| !j.stage.is_terminal())
        .filter_map(|j| j.assigned_worker.as_deref())
    {
        match resolve_worker(workers, reference) {
            Some(idx) => counts[idx] += 1,
            None => orphaned += 1,
        }
    }

    if workers.is_empty() {
        let mut suggestions = vec!["No workers in roster".to_string()];
        if orphaned > 0 {
            suggestions.push(orphan_suggestion(orphaned));
        }
        return Ok(BalanceReport {
            balance_score: 1.0,
            suggestions,
            ..BalanceReport::default()
        });
    }

    let utilizations: Vec<WorkerUtilization> = workers
        .iter()
        .zip(&counts)
        .map(|(w, &assigned_jobs)| {
            WorkerUtilization {
                worker_id: w.id.clone(),
                worker_name: w.name.clone(),
                assigned_jobs,
                max_capacity: w.max_capacity,
                utilization: ratio(assigned_jobs as f64, w.max_capacity as f64),
            }
        })
        .collect();

    let values: Vec<f64> = utilizations.iter().map(|u| u.utilization).collect();
    let balance_score = (1.0 - coefficient_of_variation(&values)).max(0.0);

    let overloaded: Vec<&WorkerUtilization> = utilizations
        .iter()
        .filter(|u| u.utilization > config.overload_threshold)
        .collect();
    let underutilized: Vec<&WorkerUtilization> = utilizations
        .iter()
        .filter(|u| u.utilization < config.underutilized_threshold)
        .collect();

    let mut suggestions = Vec::new();
    for u in &overloaded {
        suggestions.push(format!(
            "Redistribute work from {} ({:.0}% utilized)",
            u.worker_name,
            u.utilization * 100.0
        ));
    }
    for u in &underutilized {
        suggestions.push(format!(
            "{} has spare capacity ({:.0}% utilized)",
            u.worker_name,
            u.utilization * 100.0
        ));
    }
    if !overloaded.is_empty() && !underutilized.is_empty() {
        suggestions.push(format!(
            "Move jobs from {} to {}",
            join_names(&overloaded),
            join_names(&underutilized)
        ));
    }
    if balance_score < config.balance_warning_threshold {
        suggestions.push(format!(
            "Workload distribution is uneven (balance score {balance_score:.2})"
        ));
    }
    if orphaned > 0 {
        suggestions.push(orphan_suggestion(orphaned));
    }
    if suggestions.is_empty() {
        suggestions.push("Workload is evenly distributed".to_string());
    }

    tracing::debug!(
        workers = workers.len(),
        balance_score,
        overloaded = overloaded.len(),
        underutilized = underutilized.len(),
        "workload balance analyzed"
    );

    Ok(BalanceReport {
        balance_score,
        overloaded: overloaded.iter().map(|u| u.worker_name.clone()).collect(),
        underutilized: underutilized.iter().map(|u| u.worker_name.clone()).collect(),
        utilizations,
        suggestions,
    })
}

fn join_names(group: &[&WorkerUtilization]) -> String {
    group
        .iter()
        .map(|u| u.worker_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn orphan_suggestion(count: usize) -> String {
    format!("{count} jobs are assigned to workers missing from the roster")
}
