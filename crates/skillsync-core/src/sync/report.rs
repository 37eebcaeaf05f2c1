//! Report types for sync and dry-run operations

use serde::Serialize;

/// Per-skill lifecycle during a sync run.
///
/// Success is reaching `Recorded`; a failure in any earlier phase moves
/// the skill to `Failed` and the batch continues with the next skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPhase {
    Pending,
    Fetching,
    Copying,
    Overridden,
    Recorded,
    Failed,
}

impl SyncPhase {
    /// Short verb used in failure messages ("failed while fetching").
    pub fn verb(&self) -> &'static str {
        match self {
            SyncPhase::Pending => "resolving",
            SyncPhase::Fetching => "fetching",
            SyncPhase::Copying => "copying",
            SyncPhase::Overridden => "applying overrides",
            SyncPhase::Recorded => "recording",
            SyncPhase::Failed => "failing",
        }
    }
}

/// Classification of a skill against the current catalog copy.
///
/// Dry-run and real sync both derive this from the same directory
/// comparison, so a dry run's classification always predicts the real
/// outcome for the same manifest and upstream state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeClass {
    New,
    Updated,
    Unchanged,
    Missing,
}

impl std::fmt::Display for ChangeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ChangeClass::New => "NEW",
            ChangeClass::Updated => "UPDATED",
            ChangeClass::Unchanged => "UNCHANGED",
            ChangeClass::Missing => "MISSING",
        };
        write!(f, "{}", label)
    }
}

/// Outcome of one skill's pass through the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub skill: String,
    /// Phase reached; `Recorded` on success, `Failed` on error. Dry runs
    /// stop in `Fetching` since nothing past classification happens.
    pub phase: SyncPhase,
    pub class: Option<ChangeClass>,
    pub detail: Option<String>,
}

impl SyncOutcome {
    pub fn succeeded(&self) -> bool {
        self.phase == SyncPhase::Recorded
    }

    pub fn failed(&self) -> bool {
        self.phase == SyncPhase::Failed
    }
}

/// Aggregated result of a batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub outcomes: Vec<SyncOutcome>,
    /// Advisory: validation-gateway failures after a successful sync.
    pub validation_failures: Vec<String>,
}

impl SyncReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.failed()).count()
    }

    pub fn unchanged(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.class == Some(ChangeClass::Unchanged))
            .count()
    }

    /// Full success: no skill in the batch failed. Validation failures are
    /// advisory and do not affect this.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(phase: SyncPhase, class: Option<ChangeClass>) -> SyncOutcome {
        SyncOutcome {
            skill: "demo".into(),
            phase,
            class,
            detail: None,
        }
    }

    #[test]
    fn counts_partition_outcomes() {
        let report = SyncReport {
            outcomes: vec![
                outcome(SyncPhase::Recorded, Some(ChangeClass::New)),
                outcome(SyncPhase::Recorded, Some(ChangeClass::Unchanged)),
                outcome(SyncPhase::Failed, None),
            ],
            validation_failures: Vec::new(),
        };
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.unchanged(), 1);
        assert!(!report.is_success());
    }

    #[test]
    fn validation_failures_do_not_fail_the_batch() {
        let report = SyncReport {
            outcomes: vec![outcome(SyncPhase::Recorded, Some(ChangeClass::Updated))],
            validation_failures: vec!["demo: exit 1".into()],
        };
        assert!(report.is_success());
    }

    #[test]
    fn class_display_matches_wire_labels() {
        assert_eq!(ChangeClass::New.to_string(), "NEW");
        assert_eq!(ChangeClass::Missing.to_string(), "MISSING");
    }
}
