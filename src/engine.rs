//! Facade bundling configuration and collaborators.

use crate::analysis::{
    analyze_performance, optimize_schedule, AnalysisWindow, AnalyzerConfig, PerformanceReport,
    ScheduleConfig, SchedulePlan,
};
use crate::assignment::{
    analyze_workload_balance, recommend, AssignmentPlan, BalanceConfig, BalanceReport,
    ScoringConfig,
};
use crate::error::{ConfigError, Result};
use crate::model::{
    DurationModel, Job, SkillMap, StaticDurationModel, StaticSkillMap, Worker, WorkerDirectory,
};
use chrono::{DateTime, Utc};

/// Configuration for every engine operation.
///
/// With the `serde` feature, missing sections fall back to their
/// defaults, so a host can load partial overrides.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EngineConfig {
    pub analyzer: AnalyzerConfig,
    pub schedule: ScheduleConfig,
    pub scoring: ScoringConfig,
    pub balance: BalanceConfig,
}

impl EngineConfig {
    pub fn with_analyzer(mut self, analyzer: AnalyzerConfig) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn with_schedule(mut self, schedule: ScheduleConfig) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_balance(mut self, balance: BalanceConfig) -> Self {
        self.balance = balance;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.analyzer.validate()?;
        self.schedule.validate()?;
        self.scoring.validate()?;
        self.balance.validate()?;
        Ok(())
    }
}

/// Every report the engine produces for one snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkflowReport {
    pub performance: PerformanceReport,
    pub schedule: SchedulePlan,
    pub assignments: AssignmentPlan,
    pub balance: BalanceReport,
}

/// Runs the analyzer and the optimizer against injected collaborators.
///
/// Holds no mutable state: every call reads the snapshot it is given plus
/// one roster listing from the directory.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use workflow_intel::model::{Job, JobType, StaticRoster, Worker};
/// use workflow_intel::WorkflowEngine;
///
/// let roster = StaticRoster::new(vec![
///     Worker::new("w1", "Ada", 5).with_skill("DNA_extraction"),
/// ]);
/// let engine = WorkflowEngine::new(roster);
///
/// let now = Utc::now();
/// let jobs = vec![Job::new("s-1", JobType::Dna, now)];
/// let plan = engine.recommend(&jobs, now).unwrap();
/// assert_eq!(plan.recommendations[0].recommended_worker, "w1");
/// ```
pub struct WorkflowEngine<D> {
    config: EngineConfig,
    directory: D,
    skills: Box<dyn SkillMap>,
    durations: Box<dyn DurationModel>,
}

impl<D: WorkerDirectory> WorkflowEngine<D> {
    /// Creates an engine with default configuration and static tables.
    pub fn new(directory: D) -> Self {
        Self {
            config: EngineConfig::default(),
            directory,
            skills: Box::new(StaticSkillMap::default()),
            durations: Box::new(StaticDurationModel::default()),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_skill_map<S: SkillMap + 'static>(mut self, skills: S) -> Self {
        self.skills = Box::new(skills);
        self
    }

    pub fn with_duration_model<M: DurationModel + 'static>(mut self, durations: M) -> Self {
        self.durations = Box::new(durations);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn roster(&self) -> Vec<Worker> {
        self.directory.list()
    }

    pub fn analyze_performance(
        &self,
        jobs: &[Job],
        window: &AnalysisWindow,
        now: DateTime<Utc>,
    ) -> Result<PerformanceReport> {
        analyze_performance(jobs, window, now, &self.config.analyzer)
    }

    pub fn optimize_schedule(&self, pending: &[Job], now: DateTime<Utc>) -> Result<SchedulePlan> {
        optimize_schedule(pending, now, &self.config.schedule)
    }

    pub fn recommend(&self, jobs: &[Job], now: DateTime<Utc>) -> Result<AssignmentPlan> {
        let workers = self.directory.list();
        self.recommend_with(jobs, &workers, now)
    }

    pub fn analyze_workload_balance(&self, assigned_jobs: &[Job]) -> Result<BalanceReport> {
        let workers = self.directory.list();
        analyze_workload_balance(assigned_jobs, &workers, &self.config.balance)
    }

    fn recommend_with(
        &self,
        jobs: &[Job],
        workers: &[Worker],
        now: DateTime<Utc>,
    ) -> Result<AssignmentPlan> {
        recommend(
            jobs,
            workers,
            now,
            self.skills.as_ref(),
            self.durations.as_ref(),
            &self.config.scoring,
        )
    }

    /// Produces every report for one snapshot.
    ///
    /// The roster is listed once so all reports see the same workers.
    /// With the `parallel` feature the stage analysis and the assignment
    /// side run concurrently; the output is identical either way.
    pub fn evaluate(
        &self,
        snapshot: &[Job],
        window: &AnalysisWindow,
        now: DateTime<Utc>,
    ) -> Result<WorkflowReport> {
        self.config.validate()?;
        let workers = self.directory.list();

        let analysis = || -> Result<(PerformanceReport, SchedulePlan)> {
            Ok((
                self.analyze_performance(snapshot, window, now)?,
                self.optimize_schedule(snapshot, now)?,
            ))
        };
        let assignment = || -> Result<(AssignmentPlan, BalanceReport)> {
            Ok((
                self.recommend_with(snapshot, &workers, now)?,
                analyze_workload_balance(snapshot, &workers, &self.config.balance)?,
            ))
        };

        #[cfg(feature = "parallel")]
        let (analysis, assignment) = rayon::join(analysis, assignment);
        #[cfg(not(feature = "parallel"))]
        let (analysis, assignment) = (analysis(), assignment());

        let (performance, schedule) = analysis?;
        let (assignments, balance) = assignment?;

        tracing::debug!(
            jobs = snapshot.len(),
            workers = workers.len(),
            "workflow snapshot evaluated"
        );

        Ok(WorkflowReport {
            performance,
            schedule,
            assignments,
            balance,
        })
    }
}
