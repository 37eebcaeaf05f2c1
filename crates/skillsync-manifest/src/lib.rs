//! Manifest schema and skill resolution for skillsync
//!
//! The manifest is the declarative input to a sync run: which upstream
//! sources exist, and which skills are synchronized from them. It is
//! authored externally and parsed once, at the boundary, into typed
//! structures; nothing downstream re-reads raw YAML.

pub mod error;
pub mod manifest;
pub mod resolver;

pub use error::{Error, Result};
pub use manifest::{Manifest, SkillSpec, SourceSpec};
pub use resolver::{DesiredVersion, ResolvedSkill, resolve};
