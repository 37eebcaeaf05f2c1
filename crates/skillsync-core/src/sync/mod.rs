//! Catalog synchronization
//!
//! The orchestrator and its report types. `engine` drives the per-skill
//! pipeline; `report` carries classification and outcome data shared by
//! real syncs and dry runs.

mod engine;
mod report;

pub use engine::{SyncEngine, SyncFilter, SyncOptions};
pub use report::{ChangeClass, SyncOutcome, SyncPhase, SyncReport};
