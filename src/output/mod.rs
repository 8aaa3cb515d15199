// src/output/mod.rs
//! Output handling with clear separation of planning and execution.
//!
//! Planning decides which files to write and which stale generated files to
//! remove; execution performs the I/O and reports per-operation outcomes.

mod planner;
mod types;
mod writer;

pub use planner::{plan_generated_output, plan_scaffold, stale_files};
pub use types::{CompletedOperation, DeliveryTarget, ExecutionStats, FailedOperation, OutputPlan, OutputReport};
pub use writer::deliver;
