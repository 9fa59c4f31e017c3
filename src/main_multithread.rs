use std::sync::Arc;

use nested_routines::threaded::run_nested_routines;
use nested_routines::{init_logging, RunConfig, TracingReporter};
use tracing::info;

/// Runs the nested routines with one OS thread per task.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    info!("Run nested routines - Multithreading");

    let config = RunConfig::default();
    let failures = run_nested_routines(
        config.workers,
        config.subtasks_per_worker,
        Arc::new(TracingReporter),
    );

    info!("Number of errors is {failures}");
    Ok(())
}
