//! Nested fan-out/fan-in routines.
//!
//! A run spawns a fixed number of workers. Each worker runs a batch of
//! concurrent closures, one synchronous task, then a batch of concurrent
//! delegated subroutines. Every leaf task sends one outcome into a shared
//! result stream; a watcher closes the stream once all workers are done, and
//! the caller drains it and counts the failures.
//!
//! The run is available on tokio tasks ([`orchestrator`]) and on OS threads
//! ([`threaded`]).

pub mod completion;
pub mod config;
pub mod drain;
pub mod error;
pub mod leaf;
pub mod orchestrator;
pub mod reporter;
pub mod sink;
pub mod threaded;

pub use config::RunConfig;
pub use error::{LeafError, Outcome, RunError};
pub use orchestrator::{collect_failures, run_nested_routines};
pub use reporter::{Event, Reporter, TracingReporter};

/// Installs the `tracing` fmt subscriber used by the binaries.
///
/// Logs at `info` and above, without source locations. Calling it again once a
/// global subscriber exists is a no-op apart from a debug line.
pub fn init_logging() {
    let installed = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_file(false)
        .with_line_number(false)
        .with_target(false)
        .try_init();

    if let Err(err) = installed {
        tracing::debug!("tracing subscriber already installed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
        tracing::info!("still logging after a second init");
    }
}
