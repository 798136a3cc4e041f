//! Cumulus Submit
//!
//! The training-job submitter: a strictly linear orchestration over the
//! platform boundary.
//! - Loading and validating the submit configuration (`SubmitConfig`)
//! - The five-step resolve/register/submit sequence (`JobSubmitter`)
//! - Blocking wait-for-completion with status and log streaming (`RunSink`)

pub mod config;
pub mod error;
pub mod events;
pub mod submitter;

pub use config::{SubmitConfig, WaitConfig};
pub use error::{SubmitError, SubmitResult};
pub use events::{NullRunSink, RunEvent, RunSink, StdoutRunSink};
pub use submitter::{JobSubmitter, WaitPolicy};
