use serde::{Deserialize, Serialize};

/// Coordinates of a remote workspace.
///
/// The workspace is assumed to pre-exist; provisioning one is a platform
/// concern, not ours.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceCoordinates {
    pub subscription_id: String,
    pub resource_group: String,
    pub workspace_name: String,
}

impl WorkspaceCoordinates {
    #[must_use]
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        workspace_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            workspace_name: workspace_name.into(),
        }
    }
}

impl std::fmt::Display for WorkspaceCoordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.subscription_id, self.resource_group, self.workspace_name)
    }
}

/// A resolved reference to a remote workspace.
///
/// Read-only for the process lifetime; all workspace state lives on the
/// platform side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceHandle {
    pub coordinates: WorkspaceCoordinates,
}

impl WorkspaceHandle {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.coordinates.workspace_name
    }

    /// Stable key identifying this workspace across platform calls.
    #[must_use]
    pub fn key(&self) -> String {
        self.coordinates.to_string()
    }
}
