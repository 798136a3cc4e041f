use thiserror::Error;

pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

/// Errors surfaced by the platform boundary.
///
/// There is no retry or recovery policy at this layer: every variant is
/// reported to the caller exactly once, and a failed remote run is a terminal
/// run status, never an error.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("workspace not found: {0}")]
    WorkspaceNotFound(String),

    #[error("environment registration failed: {0}")]
    EnvironmentRegistration(String),

    #[error("compute target not found: {0}")]
    ComputeTargetNotFound(String),

    #[error("run submission rejected: {0}")]
    Submission(String),

    #[error("run not found: {0}")]
    RunNotFound(String),
}
