//! Filesystem primitives for skillsync
//!
//! Provides the canonical checksum format, atomic locked writes,
//! wholesale directory replacement, and the singleton process lock.

pub mod checksum;
pub mod error;
pub mod io;
pub mod lock;

pub use checksum::{compute_content_checksum, compute_dir_checksum, compute_file_checksum};
pub use error::{Error, Result};
pub use io::{copy_dir, replace_dir, write_atomic};
pub use lock::SyncLock;
