use crate::error::{PlatformError, PlatformResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Where the execution environment comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnvironmentSource {
    /// A pre-built container image that already carries every package the
    /// entry script needs.
    DockerImage { image: String },
    /// Build the environment from a pip requirements file.
    PipRequirements { path: PathBuf },
}

/// Declares a reproducible execution environment.
///
/// Pure value object; nothing remote happens until the spec is registered
/// against a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSpec {
    pub name: String,
    pub source: EnvironmentSource,
    /// Optional package layer applied on top of the base image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pip_requirements: Option<PathBuf>,
}

impl EnvironmentSpec {
    #[must_use]
    pub fn from_docker_image(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: EnvironmentSource::DockerImage { image: image.into() },
            pip_requirements: None,
        }
    }

    #[must_use]
    pub fn from_pip_requirements(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: EnvironmentSource::PipRequirements { path: path.into() },
            pip_requirements: None,
        }
    }

    #[must_use]
    pub fn with_pip_requirements(mut self, path: impl Into<PathBuf>) -> Self {
        self.pip_requirements = Some(path.into());
        self
    }

    /// Content fingerprint used for idempotent registration: identical specs
    /// fingerprint identically, so re-registering one cannot mint a new
    /// version.
    pub fn fingerprint(&self) -> PlatformResult<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|e| PlatformError::EnvironmentRegistration(e.to_string()))?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// A versioned environment record tracked by the workspace.
///
/// Immutable once registered; the platform owns version assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredEnvironment {
    pub name: String,
    pub version: u32,
    pub fingerprint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_stable_for_identical_specs() {
        let a = EnvironmentSpec::from_docker_image("dockerenv", "tensorflow/tensorflow:2.7.1");
        let b = EnvironmentSpec::from_docker_image("dockerenv", "tensorflow/tensorflow:2.7.1");
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn test_fingerprint_changes_with_pip_layer() {
        let base = EnvironmentSpec::from_docker_image("dockerenv", "tensorflow/tensorflow:2.7.1");
        let layered = base.clone().with_pip_requirements("zenml-requirements.txt");
        assert_ne!(base.fingerprint().unwrap(), layered.fingerprint().unwrap());
    }
}
