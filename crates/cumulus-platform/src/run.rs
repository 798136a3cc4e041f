use crate::compute::ComputeTargetHandle;
use crate::environment::RegisteredEnvironment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Identifier for a submitted run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Observed state of a remote run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Accepted by the platform, waiting for compute.
    Queued,
    /// Executing on the compute target.
    Running,
    /// Finished successfully.
    Completed,
    /// Finished with a remote error. This is a status, not a local error.
    Failed,
    /// Stopped by an external control action.
    Canceled,
}

impl RunStatus {
    /// Checks whether the platform may move a run from `self` to `to`.
    ///
    /// Terminal states have no outgoing transitions; observers can rely on a
    /// terminal status never changing.
    #[must_use]
    pub fn can_transition_to(&self, to: Self) -> bool {
        match (self, to) {
            (Self::Queued, Self::Running | Self::Completed | Self::Failed | Self::Canceled) => true,
            (Self::Running, Self::Completed | Self::Failed | Self::Canceled) => true,
            (a, b) if *a == b => true,
            _ => false,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Canceled)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
        };
        f.write_str(s)
    }
}

/// Describes one submission: which script to run, where, and in what
/// environment.
///
/// Pure aggregate with no validation of its own; every referenced handle must
/// already be resolved, and the platform validates the whole at submission
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRunConfig {
    pub source_directory: PathBuf,
    pub script: String,
    pub environment: RegisteredEnvironment,
    pub compute_target: ComputeTargetHandle,
}

/// Tracks one in-flight or completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunHandle {
    pub id: RunId,
    pub experiment: String,
    pub status: RunStatus,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queued_can_start_running() {
        assert!(RunStatus::Queued.can_transition_to(RunStatus::Running));
    }

    #[test]
    fn test_terminal_states_have_no_outgoing_transitions() {
        for terminal in [RunStatus::Completed, RunStatus::Failed, RunStatus::Canceled] {
            assert!(terminal.is_terminal());
            for next in [
                RunStatus::Queued,
                RunStatus::Running,
                RunStatus::Completed,
                RunStatus::Failed,
                RunStatus::Canceled,
            ] {
                if next == terminal {
                    continue;
                }
                assert!(!terminal.can_transition_to(next), "{terminal} -> {next} must be invalid");
            }
        }
    }

    #[test]
    fn test_running_cannot_go_back_to_queued() {
        assert!(!RunStatus::Running.can_transition_to(RunStatus::Queued));
    }
}
