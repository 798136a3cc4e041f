use serde::{Deserialize, Serialize};

/// How the compute target is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComputeTargetSource {
    /// A named compute resource that must already exist in the workspace.
    ByName { name: String },
    /// Run on the submitting machine.
    Local,
}

impl ComputeTargetSource {
    /// The literal token the platform uses for local execution.
    pub const LOCAL_TOKEN: &'static str = "local";

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::ByName { name } => name,
            Self::Local => Self::LOCAL_TOKEN,
        }
    }
}

/// A resolved reference to compute within a workspace.
///
/// Resolution is get-only; provisioning compute is out of scope here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeTargetHandle {
    pub name: String,
    pub workspace: String,
}

impl ComputeTargetHandle {
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.name == ComputeTargetSource::LOCAL_TOKEN
    }
}
