use cumulus_platform::PlatformError;
use std::time::Duration;
use thiserror::Error;

pub type SubmitResult<T> = std::result::Result<T, SubmitError>;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("invalid submit configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The wait loop gave up locally; the remote run keeps going.
    #[error("run did not reach a terminal state within {0:?}")]
    WaitTimeout(Duration),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse submit configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
