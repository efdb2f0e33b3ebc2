//! # traderdash-domain
//!
//! Pure domain model for the traderdash batch-automation tool.
//!
//! ## Responsibilities
//! - Foundational types: run identifier, error conventions
//! - Define **WorkItems** (sporting events with home/away labels)
//! - Define **Owners** (traders, with base and batch-suffixed identities)
//! - Define **Batches** (bounded chunks of one owner's items)
//! - Define **Outcomes** (per-batch dashboard links and skips, per-owner reports)
//! - Define **Progress** snapshots reported to the operator
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod batch;
pub mod outcome;
pub mod owner;
pub mod progress;
pub mod work_item;
