//! Merge gate for a single PR
//!
//! Three-phase pattern:
//! 1. Gather - fetch labels and the label operation log (effectful)
//! 2. Plan - provenance, eligibility and strategy into a `MergePlan` (pure, testable)
//! 3. Execute - merge, or surface the blocker as an error (effectful)

mod eligibility;
mod execute;
mod plan;
mod provenance;
mod report;
mod strategy;

pub use eligibility::{evaluate_eligibility, required_labels};
pub use execute::{MergeOutcome, execute_merge_plan, gather_merge_inputs, run_merge_gate};
pub use plan::{Blocker, MergeDecision, MergeInputs, MergePlan, MergeStage, create_merge_plan};
pub use provenance::{
    check_label, illegal_operator_reason, latest_addition, missing_log_reason,
    validate_provenance,
};
pub use report::{failure_comment, label_guide, render_not_eligible, render_not_ready};
pub use strategy::select_merge_method;
