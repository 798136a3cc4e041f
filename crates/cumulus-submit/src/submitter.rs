use crate::config::{SubmitConfig, WaitConfig};
use crate::error::{SubmitError, SubmitResult};
use crate::events::{RunEvent, RunSink};
use cumulus_platform::{
    Credential, MlPlatform, RunHandle, RunStatus, ScriptRunConfig, WorkspaceHandle,
};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How the wait loop polls.
#[derive(Debug, Clone)]
pub struct WaitPolicy {
    pub poll_interval: Duration,
    /// Local bound only; the remote run keeps going after we stop watching.
    pub timeout: Option<Duration>,
}

impl From<&WaitConfig> for WaitPolicy {
    fn from(config: &WaitConfig) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Submits training runs to a platform and monitors them.
///
/// The submission sequence is strictly linear: workspace, then environment
/// registration, then experiment, then compute target, then the run itself.
/// Each step's output feeds the next and any failure surfaces immediately;
/// retry or alerting policy belongs to the caller.
pub struct JobSubmitter<P> {
    platform: P,
}

impl<P: MlPlatform> JobSubmitter<P> {
    pub fn new(platform: P) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Resolve the configured workspace and stop. Verifies credential and
    /// coordinates without submitting anything.
    pub async fn resolve_workspace(
        &self,
        credential: &Credential,
        config: &SubmitConfig,
    ) -> SubmitResult<WorkspaceHandle> {
        config.validate()?;
        let workspace = self.platform.get_workspace(credential, &config.workspace).await?;
        info!(workspace = %workspace.key(), "workspace resolved");
        Ok(workspace)
    }

    /// Run the full submission sequence, returning the run handle in its
    /// initial state. Does not wait.
    pub async fn submit(
        &self,
        credential: &Credential,
        config: &SubmitConfig,
    ) -> SubmitResult<RunHandle> {
        config.validate()?;

        let workspace = self.platform.get_workspace(credential, &config.workspace).await?;
        info!(workspace = %workspace.key(), "workspace resolved");

        let environment = self
            .platform
            .register_environment(&workspace, &config.environment_spec())
            .await?;
        info!(environment = %environment.name, version = environment.version, "environment registered");

        let experiment = self
            .platform
            .get_or_create_experiment(&workspace, &config.experiment.name)
            .await?;
        info!(experiment = %experiment.name, "experiment resolved");

        let compute_target = self.platform.get_compute_target(&workspace, &config.compute).await?;
        info!(compute_target = %compute_target.name, "compute target resolved");

        let run_config = ScriptRunConfig {
            source_directory: config.run.source_directory.clone(),
            script: config.run.script.clone(),
            environment,
            compute_target,
        };
        let run = self.platform.submit_run(&experiment, &run_config).await?;
        info!(run = %run.id, status = %run.status, "run submitted");
        Ok(run)
    }

    /// Block until the run reaches a terminal state, streaming status changes
    /// and log lines to `sink`.
    ///
    /// This is a monitor, not a controller: it only observes transitions. A
    /// remote execution failure comes back as `Ok(RunStatus::Failed)`, never
    /// as an error; inspect the returned status.
    pub async fn wait_for_completion(
        &self,
        run: &RunHandle,
        policy: &WaitPolicy,
        sink: &dyn RunSink,
    ) -> SubmitResult<RunStatus> {
        let started = Instant::now();
        let mut status = run.status;
        let mut log_offset = 0usize;

        sink.on_event(RunEvent::Submitted { run_id: run.id.clone(), status });

        while !status.is_terminal() {
            if let Some(timeout) = policy.timeout {
                if started.elapsed() >= timeout {
                    return Err(SubmitError::WaitTimeout(timeout));
                }
            }
            tokio::time::sleep(policy.poll_interval).await;

            let observed = self.platform.run_status(&run.id).await?;
            debug!(run = %run.id, status = %observed, "run polled");

            for line in self.platform.run_logs(&run.id, log_offset).await? {
                log_offset += 1;
                sink.on_event(RunEvent::Log { run_id: run.id.clone(), line });
            }
            if observed != status {
                status = observed;
                sink.on_event(RunEvent::StatusChanged { run_id: run.id.clone(), status });
            }
        }

        sink.on_event(RunEvent::Finished { run_id: run.id.clone(), status });
        Ok(status)
    }

    /// Submit and block until terminal.
    pub async fn submit_and_wait(
        &self,
        credential: &Credential,
        config: &SubmitConfig,
        sink: &dyn RunSink,
    ) -> SubmitResult<RunStatus> {
        let run = self.submit(credential, config).await?;
        self.wait_for_completion(&run, &WaitPolicy::from(&config.wait), sink).await
    }
}
