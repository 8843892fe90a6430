//! Worker assignment: multi-criteria recommendation and workload balance.
//!
//! # Composite Score
//!
//! For a job `j` and worker `w`, with enabled weights renormalized to 1:
//!
//! ```text
//! workload(w)   = max(0, 1 - current_workload / max_capacity)
//! skill(j, w)   = 1.0 if w holds the skill j's type requires, else 0.3
//! efficiency(w) = efficiency_rating
//! composite     = 0.4 * workload + 0.4 * skill + 0.2 * efficiency
//! ```
//!
//! The mismatch floor keeps an available but unskilled worker assignable
//! at reduced confidence. Equal composites resolve to roster order.
//!
//! # Key Functions
//!
//! - [`recommend`]: best worker per unassigned job plus projected load
//! - [`analyze_workload_balance`]: balance score and redistribution
//!   suggestions for the current assignments

mod balance;
mod config;
mod optimizer;
mod types;

pub use balance::analyze_workload_balance;
pub use config::{BalanceConfig, ScoringConfig, ScoringOptions, ScoringWeights};
pub use optimizer::recommend;
pub use types::{
    AssignmentPlan, AssignmentRecommendation, BalanceReport, WorkerUtilization,
    WorkloadProjection,
};
