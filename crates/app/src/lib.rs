//! # traderdash-app
//!
//! Application core for the traderdash batch-automation tool.
//!
//! ## Responsibilities
//! - Define **ports** (traits) for the automation session, the workload
//!   source, and the reporting sink
//! - Split grouped work into bounded batches ([`planner`])
//! - Match single items with a deterministic fallback strategy ([`matcher`])
//! - Drive one session through one batch ([`runner`])
//! - Run batch workers concurrently with bounded parallelism ([`pool`])
//! - Accumulate and recombine batch outcomes ([`aggregator`])
//! - Account for progress ([`progress`])
//! - Tie it all together in the run entry point ([`orchestrator`])
//!
//! ## Dependency rule
//! Depends on `traderdash-domain` only. Adapters implement the port traits
//! defined here.

pub mod ports;

pub mod aggregator;
pub mod matcher;
pub mod orchestrator;
pub mod planner;
pub mod pool;
pub mod progress;
pub mod runner;

pub use orchestrator::{RunOptions, run_automation};
