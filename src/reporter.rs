//! Logging capability handed to the orchestrator.
//!
//! Every log boundary of a run is an [`Event`]. The orchestrator never calls
//! the logging macros itself; it hands events to the [`Reporter`] it was given.
//! [`TracingReporter`] forwards them to `tracing`.

use tracing::{debug, error, info, warn};

/// Something worth logging during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    RunStarted,
    StreamClosing,
    RunFinished,
    WorkerStarted { worker: usize },
    WorkerFinished { worker: usize },
    ClosureBatchStarted { worker: usize },
    ClosureDispatched { worker: usize, task: usize },
    ClosureSucceeded { worker: usize, task: usize },
    ClosureBatchFinished { worker: usize },
    InlineTask { worker: usize },
    DelegateStarted { worker: usize, task: usize },
    DelegateEnded { worker: usize, task: usize },
    /// A producer found the result stream already closed.
    SendFailed { message: String },
    FailureDrained { task: usize, message: String },
    DrainFinished,
}

/// Receives run events. Implementations must be callable from any thread.
pub trait Reporter: Send + Sync + 'static {
    fn on_event(&self, event: &Event);
}

/// Writes events through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn on_event(&self, event: &Event) {
        match event {
            Event::RunStarted => info!("Started Execution"),
            Event::StreamClosing => info!("Closing Errors Channel"),
            Event::RunFinished => info!("Finished"),
            Event::WorkerStarted { worker } => info!(worker, "[Main {worker}] Started"),
            Event::WorkerFinished { worker } => info!(worker, "[Main {worker}] Finished"),
            Event::ClosureBatchStarted { worker } => {
                info!(worker, "[Inline {worker}] Procedure Started")
            }
            Event::ClosureDispatched { worker, task } => {
                debug!(worker, task, "[Inline {worker}] Invoking procedure {task}")
            }
            Event::ClosureSucceeded { worker, task } => {
                info!(worker, task, "[Inline {worker}] Procedure {task} successful")
            }
            Event::ClosureBatchFinished { worker } => {
                info!(worker, "[Inline {worker}] All subroutines have finished")
            }
            Event::InlineTask { worker } => info!(
                worker,
                "[Sync {worker}] Simulating synchronous procedure call {worker}"
            ),
            Event::DelegateStarted { worker, task } => {
                info!(worker, task, "[Delegate {task}] Started")
            }
            Event::DelegateEnded { worker, task } => {
                debug!(worker, task, "[Delegate {task}] Ended")
            }
            Event::SendFailed { message } => warn!("{message}"),
            Event::FailureDrained { task, message } => {
                error!(task, "[Error Channel] {message}")
            }
            Event::DrainFinished => info!("[Error Channel] Done reading"),
        }
    }
}
