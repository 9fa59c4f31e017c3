use std::sync::Arc;

use nested_routines::{init_logging, run_nested_routines, RunConfig, TracingReporter};
use tracing::info;

/// Runs the nested routines on tokio tasks and logs how many failed.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = RunConfig::default();
    let failures = run_nested_routines(
        config.workers,
        config.subtasks_per_worker,
        Arc::new(TracingReporter),
    )
    .await;

    info!("Number of errors is {failures}");
    Ok(())
}
