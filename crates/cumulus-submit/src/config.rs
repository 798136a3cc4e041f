use crate::error::{SubmitError, SubmitResult};
use cumulus_platform::{ComputeTargetSource, EnvironmentSource, EnvironmentSpec, WorkspaceCoordinates};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything one submission needs, externalized from source.
///
/// Loaded from a TOML file; every required field is checked present before
/// the first remote call so a bad target never reaches the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitConfig {
    pub workspace: WorkspaceCoordinates,
    pub environment: EnvironmentConfig,
    pub experiment: ExperimentConfig,
    pub compute: ComputeTargetSource,
    pub run: RunConfig,
    #[serde(default)]
    pub wait: WaitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub name: String,
    pub source: EnvironmentSource,
    /// Optional package layer on top of the base image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pip_requirements: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub source_directory: PathBuf,
    pub script: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Seconds between status polls.
    pub poll_interval_secs: u64,
    /// Give up waiting (locally) after this many seconds. Absent means wait
    /// indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self { poll_interval_secs: 5, timeout_secs: None }
    }
}

impl SubmitConfig {
    pub fn from_toml_str(raw: &str) -> SubmitResult<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> SubmitResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Checks every required field is present and non-empty. Runs before any
    /// remote call; anything this cannot see is the platform's to validate at
    /// submission time.
    pub fn validate(&self) -> SubmitResult<()> {
        fn required(field: &str, value: &str) -> SubmitResult<()> {
            if value.trim().is_empty() {
                return Err(SubmitError::Config(format!("{field} is required")));
            }
            Ok(())
        }

        required("workspace.subscription_id", &self.workspace.subscription_id)?;
        required("workspace.resource_group", &self.workspace.resource_group)?;
        required("workspace.workspace_name", &self.workspace.workspace_name)?;
        required("environment.name", &self.environment.name)?;
        match &self.environment.source {
            EnvironmentSource::DockerImage { image } => required("environment.source.image", image)?,
            EnvironmentSource::PipRequirements { path } => {
                if path.as_os_str().is_empty() {
                    return Err(SubmitError::Config(
                        "environment.source.path is required".to_string(),
                    ));
                }
            }
        }
        required("experiment.name", &self.experiment.name)?;
        if let ComputeTargetSource::ByName { name } = &self.compute {
            required("compute.name", name)?;
        }
        if self.run.source_directory.as_os_str().is_empty() {
            return Err(SubmitError::Config("run.source_directory is required".to_string()));
        }
        required("run.script", &self.run.script)?;
        if self.wait.poll_interval_secs == 0 {
            return Err(SubmitError::Config("wait.poll_interval_secs must be >= 1".to_string()));
        }
        Ok(())
    }

    /// The environment declaration this config describes. Pure value
    /// construction, nothing remote.
    #[must_use]
    pub fn environment_spec(&self) -> EnvironmentSpec {
        let mut spec = EnvironmentSpec {
            name: self.environment.name.clone(),
            source: self.environment.source.clone(),
            pip_requirements: None,
        };
        if let Some(path) = &self.environment.pip_requirements {
            spec = spec.with_pip_requirements(path.clone());
        }
        spec
    }
}
