//! Git source mirrors for skillsync
//!
//! One local mirror per declared source: shallow fetch of the tracked ref,
//! working tree restricted to the source's subpath, and exact-commit
//! subtree export for both the catalog copy and pinned retrieval.

pub mod error;
pub mod export;
pub mod mirror;

pub use error::{Error, Result};
pub use mirror::{MirrorHandle, SourceCache, SourceCacheOptions};
