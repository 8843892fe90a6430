//! Stage performance and bottleneck analysis.

use super::config::AnalyzerConfig;
use super::types::{AnalysisWindow, OverallMetrics, PerformanceReport, StagePerformance};
use crate::error::{EngineError, Result};
use crate::model::{Job, Stage};
use crate::stats::{days_between, mean, ratio, unit_clamp};
use chrono::{DateTime, Utc};

/// Computes window-wide and per-stage performance metrics.
///
/// Only jobs submitted inside `window` are considered. `now` anchors the
/// dwell-age term of the bottleneck score. The function is pure: the same
/// snapshot, window and `now` always produce the same report.
///
/// # Errors
///
/// Returns [`EngineError::InvalidWindow`] when `window.start > window.end`
/// and [`EngineError::Config`] for an invalid configuration. Empty input
/// is not an error.
pub fn analyze_performance(
    jobs: &[Job],
    window: &AnalysisWindow,
    now: DateTime<Utc>,
    config: &AnalyzerConfig,
) -> Result<PerformanceReport> {
    config.validate()?;
    if window.start > window.end {
        return Err(EngineError::InvalidWindow {
            start: window.start,
            end: window.end,
        });
    }

    let filtered: Vec<&Job> = jobs
        .iter()
        .filter(|j| window.contains(j.submitted_at))
        .collect();
    let total = filtered.len();

    let completed: Vec<&Job> = filtered
        .iter()
        .copied()
        .filter(|j| j.stage.is_terminal())
        .collect();

    let unrecognized = filtered
        .iter()
        .filter(|j| !j.stage.is_recognized())
        .count();
    if unrecognized > 0 {
        tracing::warn!(
            unrecognized,
            "jobs with unrecognized stage excluded from stage metrics"
        );
    }

    let population = if window.include_completed {
        total
    } else {
        completed.len()
    };
    let completion_rate =
        (ratio(completed.len() as f64, population as f64) * 100.0).clamp(0.0, 100.0);

    let turnaround: Vec<f64> = completed.iter().map(|j| j.turnaround_minutes()).collect();
    let average_processing_time_hours = mean(&turnaround) / 60.0;

    let window_days = days_between(window.start, window.end);
    let throughput_per_day = ratio(completed.len() as f64, window_days);

    let stages: Vec<StagePerformance> = Stage::PIPELINE
        .iter()
        .map(|&stage| stage_performance(stage, &filtered, now, config))
        .collect();

    let bottleneck_stages: Vec<Stage> = stages
        .iter()
        .filter(|s| s.bottleneck_score > config.bottleneck_threshold)
        .map(|s| s.stage)
        .collect();

    let overall = OverallMetrics {
        total_jobs: total,
        completed_jobs: completed.len(),
        completion_rate,
        average_processing_time_hours,
        throughput_per_day,
        bottleneck_stages,
        unrecognized_stage_jobs: unrecognized,
    };

    let insights = performance_insights(&overall, &stages, population, window, config);

    tracing::debug!(
        total,
        completed = overall.completed_jobs,
        bottlenecks = overall.bottleneck_stages.len(),
        "performance analysis complete"
    );

    Ok(PerformanceReport {
        overall,
        stages,
        insights,
    })
}

/// Metrics for a single stage over the filtered jobs.
fn stage_performance(
    stage: Stage,
    filtered: &[&Job],
    now: DateTime<Utc>,
    config: &AnalyzerConfig,
) -> StagePerformance {
    let in_stage: Vec<&Job> = filtered.iter().copied().filter(|j| j.stage == stage).collect();
    let job_count = in_stage.len();

    let durations: Vec<f64> = in_stage.iter().map(|j| j.turnaround_minutes()).collect();
    let average_duration_minutes = mean(&durations);

    let success_rate = success_rate(stage, filtered);

    let capacity = config.stage_capacities.get(&stage).copied().unwrap_or(0);
    let resource_utilization = unit_clamp(ratio(job_count as f64, capacity as f64));

    let bottleneck_score = if stage.is_terminal() || job_count == 0 {
        0.0
    } else {
        let share = ratio(job_count as f64, filtered.len() as f64);
        let ages: Vec<f64> = in_stage.iter().map(|j| j.age_days(now)).collect();
        let dwell = (mean(&ages) / config.dwell_normalization_days).min(1.0);
        unit_clamp(config.occupancy_weight * share + config.dwell_weight * dwell)
    };

    StagePerformance {
        stage,
        job_count,
        average_duration_minutes,
        success_rate,
        bottleneck_score,
        resource_utilization,
    }
}

/// Fraction of jobs that reached `stage` and have since moved past it.
///
/// Terminal stages count as successful once reached.
fn success_rate(stage: Stage, filtered: &[&Job]) -> f64 {
    let Some(target) = stage.ordinal() else {
        return 0.0;
    };
    let ordinals = filtered.iter().filter_map(|j| j.stage.ordinal());
    let (reached, passed) = ordinals.fold((0usize, 0usize), |(r, p), o| {
        if o > target {
            (r + 1, p + 1)
        } else if o == target {
            (r + 1, p)
        } else {
            (r, p)
        }
    });

    if reached == 0 {
        0.0
    } else if stage.is_terminal() {
        1.0
    } else {
        ratio(passed as f64, reached as f64)
    }
}

fn performance_insights(
    overall: &OverallMetrics,
    stages: &[StagePerformance],
    population: usize,
    window: &AnalysisWindow,
    config: &AnalyzerConfig,
) -> Vec<String> {
    if overall.total_jobs == 0 {
        return vec![format!(
            "No jobs submitted between {} and {}",
            window.start.format("%Y-%m-%d"),
            window.end.format("%Y-%m-%d")
        )];
    }

    let mut insights = vec![format!(
        "{} jobs submitted in window, {} completed ({:.1}%)",
        overall.total_jobs, overall.completed_jobs, overall.completion_rate
    )];

    for stage in stages
        .iter()
        .filter(|s| overall.bottleneck_stages.contains(&s.stage))
    {
        insights.push(format!(
            "Stage {} is a bottleneck (score {:.2}, {} jobs waiting)",
            stage.stage, stage.bottleneck_score, stage.job_count
        ));
    }
    if overall.bottleneck_stages.is_empty() {
        insights.push("No bottleneck stages detected".to_string());
    }

    if population > 0 && overall.completion_rate < config.completion_rate_target {
        insights.push(format!(
            "Completion rate {:.1}% is below target {:.0}%",
            overall.completion_rate, config.completion_rate_target
        ));
    }

    if overall.unrecognized_stage_jobs > 0 {
        insights.push(format!(
            "{} jobs have an unrecognized stage and were excluded from stage metrics",
            overall.unrecognized_stage_jobs
        ));
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JobType;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn window() -> AnalysisWindow {
        AnalysisWindow::new(now() - Duration::days(30), now())
    }

    fn job(id: usize, stage: Stage, days_ago: i64) -> Job {
        Job::new(format!("j-{id}"), JobType::Dna, now() - Duration::days(days_ago))
            .with_stage(stage)
    }

    #[test]
    fn test_empty_jobs_zeroed() {
        let report = analyze_performance(&[], &window(), now(), &AnalyzerConfig::default())
            .unwrap();
        assert_eq!(report.overall, OverallMetrics::default());
        assert_eq!(report.stages.len(), Stage::PIPELINE.len());
        assert!(report.stages.iter().all(|s| s.bottleneck_score == 0.0));
        assert_eq!(report.insights.len(), 1);
        assert!(report.insights[0].starts_with("No jobs submitted"));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let w = AnalysisWindow::new(now(), now() - Duration::days(1));
        let err = analyze_performance(&[], &w, now(), &AnalyzerConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidWindow { .. }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnalyzerConfig::default().with_dwell_normalization_days(0.0);
        assert!(matches!(
            analyze_performance(&[], &window(), now(), &config),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_window_filter() {
        let jobs = vec![
            job(1, Stage::Prep, 5),
            job(2, Stage::Prep, 45), // outside window
        ];
        let report =
            analyze_performance(&jobs, &window(), now(), &AnalyzerConfig::default()).unwrap();
        assert_eq!(report.overall.total_jobs, 1);
    }

    #[test]
    fn test_completion_rate_and_processing_time() {
        let submitted = now() - Duration::days(4);
        let jobs = vec![
            Job::new("a", JobType::Dna, submitted)
                .with_stage(Stage::Completed)
                .with_updated_at(submitted + Duration::hours(10)),
            Job::new("b", JobType::Rna, submitted)
                .with_stage(Stage::Archived)
                .with_updated_at(submitted + Duration::hours(20)),
            job(3, Stage::Prep, 4),
            job(4, Stage::Analysis, 4),
        ];
        let report =
            analyze_performance(&jobs, &window(), now(), &AnalyzerConfig::default()).unwrap();

        assert_eq!(report.overall.completed_jobs, 2);
        assert!((report.overall.completion_rate - 50.0).abs() < 1e-9);
        assert!((report.overall.average_processing_time_hours - 15.0).abs() < 1e-9);
        // 2 completed over a 30 day window.
        assert!((report.overall.throughput_per_day - 2.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_exclude_completed_restricts_population() {
        let jobs = vec![
            job(1, Stage::Completed, 3),
            job(2, Stage::Prep, 3),
            job(3, Stage::Prep, 3),
        ];
        let w = window().with_include_completed(false);
        let report = analyze_performance(&jobs, &w, now(), &AnalyzerConfig::default()).unwrap();
        assert_eq!(report.overall.total_jobs, 3);
        assert!((report.overall.completion_rate - 100.0).abs() < 1e-9);

        let none_done = vec![job(1, Stage::Prep, 3)];
        let report =
            analyze_performance(&none_done, &w, now(), &AnalyzerConfig::default()).unwrap();
        assert_eq!(report.overall.completion_rate, 0.0);
    }

    #[test]
    fn test_prep_bottleneck_detected() {
        let jobs: Vec<Job> = (0..10).map(|i| job(i, Stage::Prep, 8)).collect();
        let report =
            analyze_performance(&jobs, &window(), now(), &AnalyzerConfig::default()).unwrap();

        let prep = report.stage(Stage::Prep).unwrap();
        // 0.5 * 1.0 share + 0.5 * 0.8 dwell
        assert!((prep.bottleneck_score - 0.9).abs() < 1e-9);
        assert_eq!(report.overall.bottleneck_stages, vec![Stage::Prep]);
        assert!(report
            .insights
            .iter()
            .any(|s| s.contains("Stage prep is a bottleneck")));
    }

    #[test]
    fn test_fast_turnover_not_bottleneck() {
        // Many jobs but all fresh.
        let jobs: Vec<Job> = (0..10).map(|i| job(i, Stage::Processing, 0)).collect();
        let report =
            analyze_performance(&jobs, &window(), now(), &AnalyzerConfig::default()).unwrap();
        let processing = report.stage(Stage::Processing).unwrap();
        assert!((processing.bottleneck_score - 0.5).abs() < 1e-9);
        assert!(report.overall.bottleneck_stages.is_empty());
    }

    #[test]
    fn test_dwell_term_caps() {
        let jobs = vec![job(1, Stage::Analysis, 25), job(2, Stage::Prep, 0)];
        let report =
            analyze_performance(&jobs, &window(), now(), &AnalyzerConfig::default()).unwrap();
        let analysis = report.stage(Stage::Analysis).unwrap();
        // share 0.5, dwell capped at 1.0
        assert!((analysis.bottleneck_score - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_terminal_stages_never_bottleneck() {
        let jobs: Vec<Job> = (0..5).map(|i| job(i, Stage::Completed, 20)).collect();
        let report =
            analyze_performance(&jobs, &window(), now(), &AnalyzerConfig::default()).unwrap();
        assert_eq!(report.stage(Stage::Completed).unwrap().bottleneck_score, 0.0);
        assert!(report.overall.bottleneck_stages.is_empty());
    }

    #[test]
    fn test_resource_utilization_capped() {
        let config = AnalyzerConfig::default().with_stage_capacity(Stage::Prep, 4);
        let jobs: Vec<Job> = (0..6).map(|i| job(i, Stage::Prep, 1)).collect();
        let report = analyze_performance(&jobs, &window(), now(), &config).unwrap();
        assert_eq!(report.stage(Stage::Prep).unwrap().resource_utilization, 1.0);

        let config = AnalyzerConfig::default().with_stage_capacity(Stage::Prep, 12);
        let report = analyze_performance(&jobs, &window(), now(), &config).unwrap();
        assert!((report.stage(Stage::Prep).unwrap().resource_utilization - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_success_rate() {
        let jobs = vec![
            job(1, Stage::Prep, 2),
            job(2, Stage::Processing, 2),
            job(3, Stage::Analysis, 2),
            job(4, Stage::Completed, 2),
        ];
        let report =
            analyze_performance(&jobs, &window(), now(), &AnalyzerConfig::default()).unwrap();

        // Reached prep: 4, passed prep: 3
        assert!((report.stage(Stage::Prep).unwrap().success_rate - 0.75).abs() < 1e-9);
        assert!((report.stage(Stage::Analysis).unwrap().success_rate - 0.5).abs() < 1e-9);
        assert_eq!(report.stage(Stage::Completed).unwrap().success_rate, 1.0);
        assert_eq!(report.stage(Stage::Archived).unwrap().success_rate, 0.0);
    }

    #[test]
    fn test_unrecognized_stage_counted_but_excluded() {
        let jobs = vec![job(1, Stage::Unrecognized, 3), job(2, Stage::Prep, 3)];
        let report =
            analyze_performance(&jobs, &window(), now(), &AnalyzerConfig::default()).unwrap();

        assert_eq!(report.overall.total_jobs, 2);
        assert_eq!(report.overall.unrecognized_stage_jobs, 1);
        let staged: usize = report.stages.iter().map(|s| s.job_count).sum();
        assert_eq!(staged, 1);
        // Prep holds half of all jobs.
        let prep = report.stage(Stage::Prep).unwrap();
        assert!((prep.bottleneck_score - (0.25 + 0.15)).abs() < 1e-9);
        assert!(report
            .insights
            .iter()
            .any(|s| s.contains("unrecognized stage")));
    }

    #[test]
    fn test_completion_rate_below_target_insight() {
        let jobs = vec![job(1, Stage::Prep, 1), job(2, Stage::Completed, 1)];
        let report =
            analyze_performance(&jobs, &window(), now(), &AnalyzerConfig::default()).unwrap();
        assert!(report
            .insights
            .iter()
            .any(|s| s == "Completion rate 50.0% is below target 80%"));
    }

    #[test]
    fn test_idempotent() {
        let jobs: Vec<Job> = (0..8)
            .map(|i| {
                let stage = Stage::PIPELINE[i % Stage::PIPELINE.len()];
                job(i, stage, i as i64)
            })
            .collect();
        let config = AnalyzerConfig::default();
        let first = analyze_performance(&jobs, &window(), now(), &config).unwrap();
        let second = analyze_performance(&jobs, &window(), now(), &config).unwrap();
        assert_eq!(first, second);
    }
}
