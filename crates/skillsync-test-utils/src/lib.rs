//! Shared test fixtures for skillsync
//!
//! Test-only code: helpers panic on failure instead of returning errors.

pub mod upstream;

pub use upstream::UpstreamRepo;
