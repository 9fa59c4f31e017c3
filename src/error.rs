use thiserror::Error;

/// Failure reported by a leaf task.
///
/// This is the only error kind a run produces. Failures are collected and
/// counted; none of them stops the orchestration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeafError {
    // Even identities fail; the wording is kept as-is.
    #[error("Subroutine {task} intentional fail on odd number")]
    IntentionalFailure { task: usize },
}

impl LeafError {
    /// Identity of the leaf task that failed.
    pub fn task(&self) -> usize {
        match self {
            LeafError::IntentionalFailure { task } => *task,
        }
    }
}

/// Result of a single leaf task.
pub type Outcome = Result<(), LeafError>;

/// Errors raised by the orchestration plumbing itself.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("result stream closed before the outcome of {origin} could be sent")]
    StreamClosed { origin: String },
}
