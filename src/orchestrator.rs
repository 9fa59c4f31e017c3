//! Fan-out/fan-in over tokio tasks.
//!
//! ```text
//! run ─► worker 0..N
//!  │       ├─ closure batch   ─┐
//!  │       ├─ inline task      ├─► result stream
//!  │       └─ delegated batch ─┘        │
//!  ├─► watcher: wait, then close        │
//!  └─► drain ◄──────────────────────────┘
//! ```
//!
//! The stream is an unbounded channel, so producers never block. It closes
//! when the last sink clone is released; the watcher holds the original sink
//! and releases it only once every worker has signalled the top-level group.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedSender};

use crate::completion::{CompletionGroup, CompletionGuard};
use crate::drain::drain;
use crate::error::{LeafError, Outcome};
use crate::leaf;
use crate::reporter::{Event, Reporter};

type Sink = UnboundedSender<Outcome>;

/// Runs `num_workers` workers with `num_subtasks` leaf tasks per batch and
/// returns the number of failures drained.
///
/// Must be called from within a tokio runtime.
pub async fn run_nested_routines(
    num_workers: usize,
    num_subtasks: usize,
    reporter: Arc<dyn Reporter>,
) -> usize {
    collect_failures(num_workers, num_subtasks, reporter)
        .await
        .len()
}

/// Like [`run_nested_routines`], but returns the failures themselves in the
/// order the drainer saw them.
pub async fn collect_failures(
    num_workers: usize,
    num_subtasks: usize,
    reporter: Arc<dyn Reporter>,
) -> Vec<LeafError> {
    let (sink, stream) = mpsc::unbounded_channel();
    let workers = CompletionGroup::with_pending(num_workers);

    for worker in 0..num_workers {
        let done = CompletionGuard::new(&workers);
        tokio::spawn(run_worker(
            worker,
            num_subtasks,
            sink.clone(),
            Arc::clone(&reporter),
            done,
        ));
    }

    tokio::spawn(close_when_done(workers, sink, Arc::clone(&reporter)));

    drain(stream, reporter.as_ref()).await
}

async fn close_when_done(
    workers: Arc<CompletionGroup>,
    sink: Sink,
    reporter: Arc<dyn Reporter>,
) {
    reporter.on_event(&Event::RunStarted);
    workers.wait().await;
    reporter.on_event(&Event::StreamClosing);
    drop(sink);
    reporter.on_event(&Event::RunFinished);
}

async fn run_worker(
    worker: usize,
    num_subtasks: usize,
    sink: Sink,
    reporter: Arc<dyn Reporter>,
    _done: CompletionGuard<CompletionGroup>,
) {
    reporter.on_event(&Event::WorkerStarted { worker });

    closure_batch(worker, num_subtasks, &sink, &reporter).await;
    leaf::inline_task(worker, &sink, reporter.as_ref());
    delegated_batch(worker, num_subtasks, &sink, &reporter).await;

    reporter.on_event(&Event::WorkerFinished { worker });
}

async fn closure_batch(
    worker: usize,
    num_subtasks: usize,
    sink: &Sink,
    reporter: &Arc<dyn Reporter>,
) {
    reporter.on_event(&Event::ClosureBatchStarted { worker });
    let batch = CompletionGroup::with_pending(num_subtasks);

    for task in 0..num_subtasks {
        reporter.on_event(&Event::ClosureDispatched { worker, task });
        let done = CompletionGuard::new(&batch);
        let sink = sink.clone();
        let reporter = Arc::clone(reporter);
        tokio::spawn(async move {
            let _done = done;
            leaf::closure_task(worker, task, &sink, reporter.as_ref());
        });
    }

    batch.wait().await;
    reporter.on_event(&Event::ClosureBatchFinished { worker });
}

async fn delegated_batch(
    worker: usize,
    num_subtasks: usize,
    sink: &Sink,
    reporter: &Arc<dyn Reporter>,
) {
    let batch = CompletionGroup::with_pending(num_subtasks);

    for task in 0..num_subtasks {
        tokio::spawn(invoke_subroutine(
            worker,
            task,
            sink.clone(),
            Arc::clone(reporter),
            CompletionGuard::new(&batch),
        ));
    }

    batch.wait().await;
}

async fn invoke_subroutine(
    worker: usize,
    task: usize,
    sink: Sink,
    reporter: Arc<dyn Reporter>,
    _done: CompletionGuard<CompletionGroup>,
) {
    leaf::delegated_task(worker, task, &sink, reporter.as_ref());
}
