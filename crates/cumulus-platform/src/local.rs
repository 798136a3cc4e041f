//! Deterministic in-memory platform.
//!
//! `LocalPlatform` simulates the remote platform boundary in-process: seeded
//! workspaces and compute targets, a content-hashed environment version store,
//! get-or-create experiments, and a run table whose status advances across
//! polls. It backs the test suite and the CLI's local mode.

use crate::compute::{ComputeTargetHandle, ComputeTargetSource};
use crate::credential::Credential;
use crate::environment::{EnvironmentSpec, EnvironmentSource, RegisteredEnvironment};
use crate::error::{PlatformError, PlatformResult};
use crate::experiment::ExperimentHandle;
use crate::platform::MlPlatform;
use crate::run::{RunHandle, RunId, RunStatus, ScriptRunConfig};
use crate::workspace::{WorkspaceCoordinates, WorkspaceHandle};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Scripted behavior for a simulated run.
#[derive(Debug, Clone)]
pub struct RunScript {
    /// Status polls observed before the run leaves `Queued`.
    pub polls_until_running: u32,
    /// Status polls observed (in total) before the run reaches its terminal
    /// state.
    pub polls_until_terminal: u32,
    /// The terminal state the run ends in.
    pub terminal: RunStatus,
    /// Log lines revealed one per poll while the run is in progress.
    pub log_lines: Vec<String>,
}

impl RunScript {
    /// A run that queues once, runs briefly, and completes.
    #[must_use]
    pub fn completing() -> Self {
        Self {
            polls_until_running: 1,
            polls_until_terminal: 3,
            terminal: RunStatus::Completed,
            log_lines: vec![
                "preparing image".to_string(),
                "starting entry script".to_string(),
                "entry script exited with code 0".to_string(),
            ],
        }
    }

    /// A run that fails remotely after starting.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            polls_until_running: 1,
            polls_until_terminal: 3,
            terminal: RunStatus::Failed,
            log_lines: vec![
                "preparing image".to_string(),
                "starting entry script".to_string(),
                "entry script exited with code 1".to_string(),
            ],
        }
    }

    #[must_use]
    pub fn with_log_lines(mut self, lines: Vec<String>) -> Self {
        self.log_lines = lines;
        self
    }
}

impl Default for RunScript {
    fn default() -> Self {
        Self::completing()
    }
}

#[derive(Debug)]
struct RunRecord {
    status: RunStatus,
    polls: u32,
    revealed_logs: usize,
    cancel_requested: bool,
    script: RunScript,
}

#[derive(Debug, Default)]
struct Inner {
    /// `None` accepts any credential (local mode); `Some` enforces the set.
    valid_tokens: Option<HashSet<String>>,
    workspaces: HashSet<String>,
    compute_targets: HashSet<(String, String)>,
    environments: HashMap<(String, String), Vec<String>>,
    experiments: HashSet<(String, String)>,
    runs: HashMap<RunId, RunRecord>,
}

/// In-memory implementation of [`MlPlatform`].
#[derive(Debug, Clone)]
pub struct LocalPlatform {
    inner: Arc<Mutex<Inner>>,
    run_script: RunScript,
}

impl LocalPlatform {
    #[must_use]
    pub fn builder() -> LocalPlatformBuilder {
        LocalPlatformBuilder::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning cannot outlive a test process in any useful way.
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[derive(Debug, Default)]
pub struct LocalPlatformBuilder {
    valid_tokens: Option<HashSet<String>>,
    workspaces: HashSet<String>,
    compute_targets: HashSet<(String, String)>,
    run_script: Option<RunScript>,
}

impl LocalPlatformBuilder {
    /// Accept only the given token; repeatable. Without any, every credential
    /// is accepted.
    #[must_use]
    pub fn with_valid_token(mut self, token: impl Into<String>) -> Self {
        self.valid_tokens.get_or_insert_with(HashSet::new).insert(token.into());
        self
    }

    #[must_use]
    pub fn with_workspace(mut self, coordinates: &WorkspaceCoordinates) -> Self {
        self.workspaces.insert(coordinates.to_string());
        self
    }

    #[must_use]
    pub fn with_compute_target(
        mut self,
        coordinates: &WorkspaceCoordinates,
        name: impl Into<String>,
    ) -> Self {
        self.compute_targets.insert((coordinates.to_string(), name.into()));
        self
    }

    /// Scripted behavior applied to every submitted run.
    #[must_use]
    pub fn with_run_script(mut self, script: RunScript) -> Self {
        self.run_script = Some(script);
        self
    }

    #[must_use]
    pub fn build(self) -> LocalPlatform {
        LocalPlatform {
            inner: Arc::new(Mutex::new(Inner {
                valid_tokens: self.valid_tokens,
                workspaces: self.workspaces,
                compute_targets: self.compute_targets,
                ..Inner::default()
            })),
            run_script: self.run_script.unwrap_or_default(),
        }
    }
}

fn validate_environment_source(spec: &EnvironmentSpec) -> PlatformResult<()> {
    match &spec.source {
        EnvironmentSource::DockerImage { image } => {
            if image.trim().is_empty() || image.chars().any(char::is_whitespace) {
                return Err(PlatformError::EnvironmentRegistration(format!(
                    "malformed image reference: {image:?}"
                )));
            }
        }
        EnvironmentSource::PipRequirements { path } => {
            if path.as_os_str().is_empty() {
                return Err(PlatformError::EnvironmentRegistration(
                    "requirements path is empty".to_string(),
                ));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl MlPlatform for LocalPlatform {
    async fn get_workspace(
        &self,
        credential: &Credential,
        coordinates: &WorkspaceCoordinates,
    ) -> PlatformResult<WorkspaceHandle> {
        let inner = self.lock();
        if let Some(tokens) = &inner.valid_tokens {
            if !tokens.contains(credential.token()) {
                return Err(PlatformError::Authentication(
                    "credential is invalid or expired".to_string(),
                ));
            }
        }
        if !inner.workspaces.contains(&coordinates.to_string()) {
            return Err(PlatformError::WorkspaceNotFound(coordinates.to_string()));
        }
        Ok(WorkspaceHandle { coordinates: coordinates.clone() })
    }

    async fn register_environment(
        &self,
        workspace: &WorkspaceHandle,
        spec: &EnvironmentSpec,
    ) -> PlatformResult<RegisteredEnvironment> {
        validate_environment_source(spec)?;
        let fingerprint = spec.fingerprint()?;

        let mut inner = self.lock();
        let versions = inner
            .environments
            .entry((workspace.key(), spec.name.clone()))
            .or_default();
        let version = match versions.iter().position(|f| f == &fingerprint) {
            Some(idx) => idx as u32 + 1,
            None => {
                versions.push(fingerprint.clone());
                versions.len() as u32
            }
        };
        debug!(environment = %spec.name, version, "environment registered");
        Ok(RegisteredEnvironment { name: spec.name.clone(), version, fingerprint })
    }

    async fn get_or_create_experiment(
        &self,
        workspace: &WorkspaceHandle,
        name: &str,
    ) -> PlatformResult<ExperimentHandle> {
        let mut inner = self.lock();
        inner.experiments.insert((workspace.key(), name.to_string()));
        Ok(ExperimentHandle { name: name.to_string(), workspace: workspace.key() })
    }

    async fn get_compute_target(
        &self,
        workspace: &WorkspaceHandle,
        source: &ComputeTargetSource,
    ) -> PlatformResult<ComputeTargetHandle> {
        match source {
            ComputeTargetSource::Local => Ok(ComputeTargetHandle {
                name: ComputeTargetSource::LOCAL_TOKEN.to_string(),
                workspace: workspace.key(),
            }),
            ComputeTargetSource::ByName { name } => {
                let inner = self.lock();
                let key = (workspace.key(), name.clone());
                if !inner.compute_targets.contains(&key) {
                    return Err(PlatformError::ComputeTargetNotFound(name.clone()));
                }
                Ok(ComputeTargetHandle { name: name.clone(), workspace: workspace.key() })
            }
        }
    }

    async fn submit_run(
        &self,
        experiment: &ExperimentHandle,
        config: &ScriptRunConfig,
    ) -> PlatformResult<RunHandle> {
        let mut inner = self.lock();

        let exp_key = (experiment.workspace.clone(), experiment.name.clone());
        if !inner.experiments.contains(&exp_key) {
            return Err(PlatformError::Submission(format!(
                "experiment {} does not exist in workspace {}",
                experiment.name, experiment.workspace
            )));
        }

        let env = &config.environment;
        let registered = inner
            .environments
            .get(&(experiment.workspace.clone(), env.name.clone()))
            .is_some_and(|versions| versions.iter().any(|f| f == &env.fingerprint));
        if !registered {
            return Err(PlatformError::Submission(format!(
                "environment {} is not registered in workspace {}",
                env.name, experiment.workspace
            )));
        }

        if !config.compute_target.is_local() {
            let ct_key = (experiment.workspace.clone(), config.compute_target.name.clone());
            if !inner.compute_targets.contains(&ct_key) {
                return Err(PlatformError::Submission(format!(
                    "compute target {} is gone",
                    config.compute_target.name
                )));
            }
        }

        let id = RunId::new();
        inner.runs.insert(
            id.clone(),
            RunRecord {
                status: RunStatus::Queued,
                polls: 0,
                revealed_logs: 0,
                cancel_requested: false,
                script: self.run_script.clone(),
            },
        );
        debug!(run = %id, experiment = %experiment.name, "run accepted");
        Ok(RunHandle {
            id,
            experiment: experiment.name.clone(),
            status: RunStatus::Queued,
            submitted_at: Utc::now(),
        })
    }

    async fn run_status(&self, run: &RunId) -> PlatformResult<RunStatus> {
        let mut inner = self.lock();
        let record = inner
            .runs
            .get_mut(run)
            .ok_or_else(|| PlatformError::RunNotFound(run.to_string()))?;

        if record.status.is_terminal() {
            return Ok(record.status);
        }

        record.polls += 1;
        if record.cancel_requested {
            record.status = RunStatus::Canceled;
            record.revealed_logs = record.script.log_lines.len();
            return Ok(record.status);
        }

        if record.status == RunStatus::Queued && record.polls >= record.script.polls_until_running
        {
            record.status = RunStatus::Running;
        }
        if record.status == RunStatus::Running {
            record.revealed_logs =
                (record.revealed_logs + 1).min(record.script.log_lines.len());
            if record.polls >= record.script.polls_until_terminal {
                record.status = record.script.terminal;
                record.revealed_logs = record.script.log_lines.len();
            }
        }
        Ok(record.status)
    }

    async fn run_logs(&self, run: &RunId, offset: usize) -> PlatformResult<Vec<String>> {
        let inner = self.lock();
        let record = inner
            .runs
            .get(run)
            .ok_or_else(|| PlatformError::RunNotFound(run.to_string()))?;
        let end = record.revealed_logs.min(record.script.log_lines.len());
        if offset >= end {
            return Ok(Vec::new());
        }
        Ok(record.script.log_lines[offset..end].to_vec())
    }

    async fn cancel_run(&self, run: &RunId) -> PlatformResult<()> {
        let mut inner = self.lock();
        let record = inner
            .runs
            .get_mut(run)
            .ok_or_else(|| PlatformError::RunNotFound(run.to_string()))?;
        // Canceling a finished run is a no-op, not an error.
        if !record.status.is_terminal() {
            record.cancel_requested = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords() -> WorkspaceCoordinates {
        WorkspaceCoordinates::new("sub-1", "rg-1", "ws-1")
    }

    fn platform() -> LocalPlatform {
        LocalPlatform::builder()
            .with_workspace(&coords())
            .with_compute_target(&coords(), "zenml-compute")
            .build()
    }

    #[tokio::test]
    async fn test_local_compute_always_resolves() {
        let platform = platform();
        let ws = platform
            .get_workspace(&Credential::cli_session("t"), &coords())
            .await
            .unwrap();
        let ct = platform
            .get_compute_target(&ws, &ComputeTargetSource::Local)
            .await
            .unwrap();
        assert!(ct.is_local());
    }

    #[tokio::test]
    async fn test_cancel_is_observed_on_next_poll() {
        let platform = platform();
        let ws = platform
            .get_workspace(&Credential::cli_session("t"), &coords())
            .await
            .unwrap();
        let env = platform
            .register_environment(
                &ws,
                &EnvironmentSpec::from_docker_image("dockerenv", "tensorflow/tensorflow:2.7.1"),
            )
            .await
            .unwrap();
        let exp = platform.get_or_create_experiment(&ws, "exp").await.unwrap();
        let ct = platform
            .get_compute_target(&ws, &ComputeTargetSource::ByName { name: "zenml-compute".into() })
            .await
            .unwrap();
        let run = platform
            .submit_run(
                &exp,
                &ScriptRunConfig {
                    source_directory: "training_scripts".into(),
                    script: "train.py".to_string(),
                    environment: env,
                    compute_target: ct,
                },
            )
            .await
            .unwrap();

        platform.cancel_run(&run.id).await.unwrap();
        let status = platform.run_status(&run.id).await.unwrap();
        assert_eq!(status, RunStatus::Canceled);
        // Terminal state sticks.
        assert_eq!(platform.run_status(&run.id).await.unwrap(), RunStatus::Canceled);
    }
}
