//! End-to-end scenarios over the public API.

use chrono::{DateTime, Duration, TimeZone, Utc};
use workflow_intel::analysis::{
    analyze_performance, optimize_schedule, AnalysisWindow, AnalyzerConfig, ScheduleConfig,
};
use workflow_intel::assignment::{recommend, ScoringConfig};
use workflow_intel::model::{
    Job, JobType, Priority, Stage, StaticDurationModel, StaticSkillMap, Worker,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap()
}

#[test]
fn prep_backlog_is_reported_as_bottleneck() {
    let jobs: Vec<Job> = (0..10)
        .map(|i| {
            Job::new(format!("s{i}"), JobType::Dna, now() - Duration::days(8))
                .with_stage(Stage::Prep)
        })
        .collect();
    let window = AnalysisWindow::new(now() - Duration::days(14), now());

    let report = analyze_performance(&jobs, &window, now(), &AnalyzerConfig::default()).unwrap();

    let prep = report.stage(Stage::Prep).unwrap();
    assert!(prep.bottleneck_score > 0.7, "got {}", prep.bottleneck_score);
    assert!(report.overall.bottleneck_stages.contains(&Stage::Prep));
}

#[test]
fn older_normal_job_wins_tie_with_fresh_urgent_job() {
    let jobs = vec![
        Job::new("urgent", JobType::Dna, now()).with_priority(Priority::Urgent),
        Job::new("normal", JobType::Dna, now() - Duration::days(10))
            .with_priority(Priority::Normal),
    ];

    let plan = optimize_schedule(&jobs, now(), &ScheduleConfig::default()).unwrap();

    assert_eq!(plan.queue.len(), 2);
    assert_eq!(plan.queue[0].priority_score, plan.queue[1].priority_score);
    assert_eq!(plan.queue[0].job_id, "normal");
    assert_eq!(plan.queue[1].job_id, "urgent");
}

#[test]
fn urgent_job_leads_once_slightly_aged() {
    let jobs = vec![
        Job::new("normal", JobType::Dna, now() - Duration::days(10))
            .with_priority(Priority::Normal),
        Job::new("urgent", JobType::Dna, now() - Duration::hours(1))
            .with_priority(Priority::Urgent),
    ];
    let plan = optimize_schedule(&jobs, now(), &ScheduleConfig::default()).unwrap();
    assert_eq!(plan.queue[0].job_id, "urgent");
}

#[test]
fn saturated_worker_still_recommended_with_lower_confidence() {
    let job = Job::new("s1", JobType::Rna, now());
    let saturated = Worker::new("w1", "Ada", 3)
        .with_skill("RNA_extraction")
        .with_workload(3)
        .with_efficiency(0.9);
    let skills = StaticSkillMap::default();
    let durations = StaticDurationModel::default();

    let full = recommend(
        std::slice::from_ref(&job),
        &[saturated.clone()],
        now(),
        &skills,
        &durations,
        &ScoringConfig::default(),
    )
    .unwrap();
    assert_eq!(full.recommendations.len(), 1);
    assert_eq!(full.recommendations[0].recommended_worker, "w1");

    let idle = recommend(
        std::slice::from_ref(&job),
        &[saturated.with_workload(0)],
        now(),
        &skills,
        &durations,
        &ScoringConfig::default(),
    )
    .unwrap();
    assert!(full.recommendations[0].confidence_score < idle.recommendations[0].confidence_score);
}

#[test]
fn empty_roster_yields_diagnostic() {
    let jobs = vec![Job::new("s1", JobType::Dna, now())];
    let plan = recommend(
        &jobs,
        &[],
        now(),
        &StaticSkillMap::default(),
        &StaticDurationModel::default(),
        &ScoringConfig::default(),
    )
    .unwrap();

    assert!(plan.recommendations.is_empty());
    assert!(!plan.insights.is_empty());
    assert!(!plan.insights[0].is_empty());
}

#[test]
fn worker_with_headroom_beats_saturated_peer() {
    let workers = vec![
        Worker::new("full", "Full", 5)
            .with_skill("DNA_extraction")
            .with_workload(5),
        Worker::new("free", "Free", 5)
            .with_skill("DNA_extraction")
            .with_workload(1),
    ];
    let jobs = vec![Job::new("s1", JobType::Dna, now())];
    let plan = recommend(
        &jobs,
        &workers,
        now(),
        &StaticSkillMap::default(),
        &StaticDurationModel::default(),
        &ScoringConfig::default(),
    )
    .unwrap();
    assert_eq!(plan.recommendations[0].recommended_worker, "free");
}
