//! Catalog synchronization engine for skillsync
//!
//! Reconciles the declarative skills manifest against upstream sources:
//! per-source mirrors are refreshed, each declared skill is staged at its
//! resolved commit with local overrides layered on top, and the catalog
//! copy is replaced wholesale only when the staged content differs. A
//! JSON side-record tracks provenance; a singleton lock file serializes
//! runs.
//!
//! # Architecture
//!
//! ```text
//!              CLI
//!               |
//!         skillsync-core
//!               |
//!     +---------+----------+
//!     |         |          |
//! skillsync-fs skillsync-git skillsync-manifest
//! ```

pub mod error;
pub mod layout;
pub mod overrides;
pub mod state;
pub mod sync;
pub mod validate;

pub use error::{Error, Result};
pub use layout::CatalogLayout;
pub use overrides::{OverrideSpec, PatchSpec, SKILL_DOC};
pub use state::{SkillRecord, SyncState, SyncStateStore};
pub use sync::{
    ChangeClass, SyncEngine, SyncFilter, SyncOptions, SyncOutcome, SyncPhase, SyncReport,
};
pub use validate::{CommandGateway, ValidationGateway, Verdict};
