use cumulus_platform::{RunId, RunStatus};
use serde::{Deserialize, Serialize};

/// Observations emitted while monitoring a submitted run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    Submitted { run_id: RunId, status: RunStatus },
    StatusChanged { run_id: RunId, status: RunStatus },
    Log { run_id: RunId, line: String },
    Finished { run_id: RunId, status: RunStatus },
}

pub trait RunSink: Send + Sync {
    fn on_event(&self, event: RunEvent);
}

#[derive(Debug, Default)]
pub struct StdoutRunSink;

impl RunSink for StdoutRunSink {
    fn on_event(&self, event: RunEvent) {
        match event {
            RunEvent::Submitted { run_id, status } => println!("[run:{run_id}] submitted ({status})"),
            RunEvent::StatusChanged { run_id, status } => println!("[run:{run_id}] {status}"),
            RunEvent::Log { run_id, line } => println!("[run:{run_id}] {line}"),
            RunEvent::Finished { run_id, status } => println!("[run:{run_id}] finished: {status}"),
        }
    }
}

/// Sink for callers that do not care about progress.
#[derive(Debug, Default)]
pub struct NullRunSink;

impl RunSink for NullRunSink {
    fn on_event(&self, _event: RunEvent) {}
}
