use serde::{Deserialize, Serialize};

/// A lightweight named container that groups submitted runs.
///
/// Resolved get-or-create: resolving an experiment name that does not exist
/// yet creates it, and resolving it again returns the same logical experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentHandle {
    pub name: String,
    pub workspace: String,
}
