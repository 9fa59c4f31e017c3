//! Producer side of the result stream.
//!
//! Leaf tasks only ever see a [`ResultSink`]; they cannot read the stream or
//! close it. The stream closes once every sink clone has been released.

use std::sync::mpsc::SyncSender;

use tokio::sync::mpsc::UnboundedSender;

use crate::error::Outcome;

/// Write-only handle to the result stream.
pub trait ResultSink: Clone + Send + 'static {
    /// Sends one outcome. Hands the outcome back if the stream is gone.
    fn emit(&self, outcome: Outcome) -> Result<(), Outcome>;
}

/// Unbounded: never blocks the sender.
impl ResultSink for UnboundedSender<Outcome> {
    fn emit(&self, outcome: Outcome) -> Result<(), Outcome> {
        self.send(outcome).map_err(|err| err.0)
    }
}

/// Blocks the sending thread until the drainer has room (or is ready, for a
/// zero-capacity channel).
impl ResultSink for SyncSender<Outcome> {
    fn emit(&self, outcome: Outcome) -> Result<(), Outcome> {
        self.send(outcome).map_err(|err| err.0)
    }
}
