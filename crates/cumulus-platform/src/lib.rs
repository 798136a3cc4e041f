//! Cumulus Platform
//!
//! Platform-agnostic primitives for remote ML training submission:
//! - Workspace, environment, experiment, compute-target and run handles
//! - The `MlPlatform` boundary trait every backend implements
//! - A deterministic in-memory platform (`LocalPlatform`) for local runs
//!   and tests

pub mod compute;
pub mod credential;
pub mod environment;
pub mod error;
pub mod experiment;
pub mod local;
pub mod platform;
pub mod run;
pub mod workspace;

pub use compute::{ComputeTargetHandle, ComputeTargetSource};
pub use credential::Credential;
pub use environment::{EnvironmentSpec, EnvironmentSource, RegisteredEnvironment};
pub use error::{PlatformError, PlatformResult};
pub use experiment::ExperimentHandle;
pub use local::{LocalPlatform, LocalPlatformBuilder, RunScript};
pub use platform::MlPlatform;
pub use run::{RunHandle, RunId, RunStatus, ScriptRunConfig};
pub use workspace::{WorkspaceCoordinates, WorkspaceHandle};
