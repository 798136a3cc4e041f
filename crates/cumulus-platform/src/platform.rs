use crate::compute::{ComputeTargetHandle, ComputeTargetSource};
use crate::credential::Credential;
use crate::environment::{EnvironmentSpec, RegisteredEnvironment};
use crate::error::PlatformResult;
use crate::experiment::ExperimentHandle;
use crate::run::{RunHandle, RunId, RunStatus, ScriptRunConfig};
use crate::workspace::{WorkspaceCoordinates, WorkspaceHandle};
use async_trait::async_trait;

/// The fixed API surface of the remote ML platform.
///
/// All remote state (workspaces, environment versions, experiments, compute,
/// run tracking) is owned and mutated by the implementation; callers hold
/// read-mostly handles. Implementations decide nothing about orchestration
/// order, and no operation here retries on the caller's behalf.
#[async_trait]
pub trait MlPlatform: Send + Sync {
    /// Resolve an existing workspace by its coordinates.
    async fn get_workspace(
        &self,
        credential: &Credential,
        coordinates: &WorkspaceCoordinates,
    ) -> PlatformResult<WorkspaceHandle>;

    /// Register an environment spec against a workspace, returning the
    /// versioned record. Idempotent by name+content: identical content never
    /// mints a new version.
    async fn register_environment(
        &self,
        workspace: &WorkspaceHandle,
        spec: &EnvironmentSpec,
    ) -> PlatformResult<RegisteredEnvironment>;

    /// Resolve an experiment by name, creating it if it does not exist.
    async fn get_or_create_experiment(
        &self,
        workspace: &WorkspaceHandle,
        name: &str,
    ) -> PlatformResult<ExperimentHandle>;

    /// Resolve an existing compute target. Never provisions.
    async fn get_compute_target(
        &self,
        workspace: &WorkspaceHandle,
        source: &ComputeTargetSource,
    ) -> PlatformResult<ComputeTargetHandle>;

    /// Submit a run under an experiment. Returns immediately with the run in
    /// its initial (non-terminal) state; rejection happens here, before any
    /// remote execution starts.
    async fn submit_run(
        &self,
        experiment: &ExperimentHandle,
        config: &ScriptRunConfig,
    ) -> PlatformResult<RunHandle>;

    /// Observe the current status of a run.
    async fn run_status(&self, run: &RunId) -> PlatformResult<RunStatus>;

    /// Fetch log lines produced since `offset` (a count of lines already
    /// consumed by the caller).
    async fn run_logs(&self, run: &RunId, offset: usize) -> PlatformResult<Vec<String>>;

    /// Request cancellation of a run. A separate control action; the wait
    /// loop never calls this.
    async fn cancel_run(&self, run: &RunId) -> PlatformResult<()>;
}
