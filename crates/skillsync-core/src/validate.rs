//! Validation gateway
//!
//! Thin pass/fail boundary to the external validation suite. The suite
//! evolves independently and exposes its verdict as a process exit code;
//! the engine treats it purely as a boolean gate after a successful
//! batch. Failures are advisory and never roll back a sync.

use std::path::Path;
use std::process::Command;

use crate::{Error, Result};

/// Outcome of validating one skill directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail { detail: String },
}

/// Injected collaborator interface so the orchestrator can be tested with
/// a fake gateway instead of spawning processes.
pub trait ValidationGateway {
    fn validate(&self, skill_dir: &Path, profile: &str) -> Result<Verdict>;
}

/// Gateway that runs an external command as
/// `<program> [args...] <skill-dir> <profile>` and maps exit code 0 to a
/// pass.
#[derive(Debug, Clone)]
pub struct CommandGateway {
    program: String,
    args: Vec<String>,
}

impl CommandGateway {
    /// Build from a whitespace-separated command line.
    ///
    /// Returns `None` for an empty command line.
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl ValidationGateway for CommandGateway {
    fn validate(&self, skill_dir: &Path, profile: &str) -> Result<Verdict> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(skill_dir)
            .arg(profile)
            .output()
            .map_err(|e| Error::ValidatorSpawn {
                message: format!("{}: {}", self.program, e),
            })?;

        if output.status.success() {
            Ok(Verdict::Pass)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Ok(Verdict::Fail {
                detail: format!(
                    "exit {}{}",
                    output.status.code().unwrap_or(-1),
                    if stderr.trim().is_empty() {
                        String::new()
                    } else {
                        format!(": {}", stderr.trim())
                    }
                ),
            })
        }
    }
}
