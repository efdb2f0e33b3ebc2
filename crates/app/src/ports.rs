//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside
//! world. They are defined here (in `app`) so that both the orchestration
//! layer and the adapter layer can depend on them without creating
//! circular dependencies.

pub mod input;
pub mod report;
pub mod session;

pub use input::{OwnerWorkload, WorkloadSource};
pub use report::ReportSink;
pub use session::{AutomationSession, SessionFactory};
