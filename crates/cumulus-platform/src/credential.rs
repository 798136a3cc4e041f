use serde::{Deserialize, Serialize};

/// An opaque proof of identity for platform calls.
///
/// Authentication itself happens out-of-band (e.g. an already logged-in
/// platform CLI session); this type only carries the resulting token for the
/// lifetime of the process and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    token: String,
}

impl Credential {
    /// Credential backed by an out-of-band authenticated CLI session.
    #[must_use]
    pub fn cli_session(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}
