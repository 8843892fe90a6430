//! Per-type lookup tables: required skill and base processing duration.
//!
//! The static implementations are stand-ins for data-driven estimates.
//! Scoring code only sees the traits, so a model fitted on historical
//! stage durations can replace them without touching the optimizer.

use super::job::JobType;
use std::collections::BTreeMap;

/// Maps a job type to the skill a worker needs to process it.
pub trait SkillMap: Send + Sync {
    /// Returns the required skill, or `None` if any worker qualifies.
    fn required_skill(&self, job_type: JobType) -> Option<&str>;
}

/// Estimates how long a job type takes at full efficiency.
pub trait DurationModel: Send + Sync {
    /// Base processing time in days for a worker with efficiency 1.0.
    fn base_processing_days(&self, job_type: JobType) -> f64;
}

/// Fixed type-to-skill table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticSkillMap {
    skills: BTreeMap<JobType, String>,
}

impl Default for StaticSkillMap {
    fn default() -> Self {
        let skills = [
            (JobType::Dna, "DNA_extraction"),
            (JobType::Rna, "RNA_extraction"),
            (JobType::Protein, "protein_analysis"),
            (JobType::Other, "general_processing"),
        ]
        .into_iter()
        .map(|(t, s)| (t, s.to_string()))
        .collect();
        Self { skills }
    }
}

impl StaticSkillMap {
    /// An empty table: every worker qualifies for every type.
    pub fn empty() -> Self {
        Self {
            skills: BTreeMap::new(),
        }
    }

    pub fn with_skill(mut self, job_type: JobType, skill: impl Into<String>) -> Self {
        self.skills.insert(job_type, skill.into());
        self
    }
}

impl SkillMap for StaticSkillMap {
    fn required_skill(&self, job_type: JobType) -> Option<&str> {
        self.skills.get(&job_type).map(String::as_str)
    }
}

/// Fixed per-type base durations (DNA=2, RNA=3, Protein=4, Other=2 days).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticDurationModel {
    days: BTreeMap<JobType, f64>,
    fallback_days: f64,
}

impl Default for StaticDurationModel {
    fn default() -> Self {
        let days = [
            (JobType::Dna, 2.0),
            (JobType::Rna, 3.0),
            (JobType::Protein, 4.0),
            (JobType::Other, 2.0),
        ]
        .into_iter()
        .collect();
        Self {
            days,
            fallback_days: 2.0,
        }
    }
}

impl StaticDurationModel {
    pub fn with_days(mut self, job_type: JobType, days: f64) -> Self {
        self.days.insert(job_type, days);
        self
    }
}

impl DurationModel for StaticDurationModel {
    fn base_processing_days(&self, job_type: JobType) -> f64 {
        self.days
            .get(&job_type)
            .copied()
            .unwrap_or(self.fallback_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_skill_table() {
        let map = StaticSkillMap::default();
        assert_eq!(map.required_skill(JobType::Dna), Some("DNA_extraction"));
        assert_eq!(map.required_skill(JobType::Rna), Some("RNA_extraction"));
        assert_eq!(map.required_skill(JobType::Protein), Some("protein_analysis"));
        assert_eq!(map.required_skill(JobType::Other), Some("general_processing"));
    }

    #[test]
    fn test_skill_override_and_empty() {
        let map = StaticSkillMap::empty().with_skill(JobType::Dna, "library_prep");
        assert_eq!(map.required_skill(JobType::Dna), Some("library_prep"));
        assert_eq!(map.required_skill(JobType::Rna), None);
    }

    #[test]
    fn test_default_durations() {
        let model = StaticDurationModel::default();
        let days: Vec<f64> = JobType::ALL
            .iter()
            .map(|&t| model.base_processing_days(t))
            .collect();
        assert_eq!(days, vec![2.0, 3.0, 4.0, 2.0]);
    }

    #[test]
    fn test_duration_override() {
        let model = StaticDurationModel::default().with_days(JobType::Protein, 6.5);
        assert!((model.base_processing_days(JobType::Protein) - 6.5).abs() < 1e-12);
    }
}
