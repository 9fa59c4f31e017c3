//! The same choreography as [`crate::orchestrator`], on OS threads.
//!
//! The result stream here is a rendezvous channel: every leaf task blocks on
//! its send until the drainer (the calling thread) takes the outcome.

use std::sync::mpsc::{self, SyncSender};
use std::sync::Arc;
use std::thread;

use crate::completion::{BlockingCompletionGroup, CompletionGuard};
use crate::drain::drain_blocking;
use crate::error::{LeafError, Outcome};
use crate::leaf;
use crate::reporter::{Event, Reporter};

type Sink = SyncSender<Outcome>;
type Done = CompletionGuard<BlockingCompletionGroup>;

/// Runs the nested routines on OS threads.
///
/// Spawns one thread per worker and per leaf task, plus a watcher thread that
/// closes the result stream once every worker has finished. The calling thread
/// drains the stream.
///
/// # Parameters
///
/// * `num_workers` - Number of top-level workers.
/// * `num_subtasks` - Leaf tasks spawned by each of a worker's two batches.
/// * `reporter` - Receives every log event of the run.
///
/// # Returns
///
/// The number of failures drained from the result stream.
pub fn run_nested_routines(
    num_workers: usize,
    num_subtasks: usize,
    reporter: Arc<dyn Reporter>,
) -> usize {
    collect_failures(num_workers, num_subtasks, reporter).len()
}

/// Runs the nested routines on OS threads and returns every failure in the
/// order it was drained.
pub fn collect_failures(
    num_workers: usize,
    num_subtasks: usize,
    reporter: Arc<dyn Reporter>,
) -> Vec<LeafError> {
    let (sink, stream) = mpsc::sync_channel(0);
    let workers = BlockingCompletionGroup::with_pending(num_workers);

    for worker in 0..num_workers {
        let done = CompletionGuard::new(&workers);
        let sink = sink.clone();
        let reporter = Arc::clone(&reporter);
        thread::spawn(move || run_worker(worker, num_subtasks, sink, reporter, done));
    }

    let watcher_reporter = Arc::clone(&reporter);
    thread::spawn(move || {
        watcher_reporter.on_event(&Event::RunStarted);
        workers.wait();
        watcher_reporter.on_event(&Event::StreamClosing);
        drop(sink);
        watcher_reporter.on_event(&Event::RunFinished);
    });

    drain_blocking(stream, reporter.as_ref())
}

fn run_worker(
    worker: usize,
    num_subtasks: usize,
    sink: Sink,
    reporter: Arc<dyn Reporter>,
    _done: Done,
) {
    reporter.on_event(&Event::WorkerStarted { worker });

    closure_batch(worker, num_subtasks, &sink, &reporter);
    leaf::inline_task(worker, &sink, reporter.as_ref());
    delegated_batch(worker, num_subtasks, &sink, &reporter);

    reporter.on_event(&Event::WorkerFinished { worker });
}

fn closure_batch(
    worker: usize,
    num_subtasks: usize,
    sink: &Sink,
    reporter: &Arc<dyn Reporter>,
) {
    reporter.on_event(&Event::ClosureBatchStarted { worker });
    let batch = BlockingCompletionGroup::with_pending(num_subtasks);

    for task in 0..num_subtasks {
        reporter.on_event(&Event::ClosureDispatched { worker, task });
        let done = CompletionGuard::new(&batch);
        let sink = sink.clone();
        let reporter = Arc::clone(reporter);
        thread::spawn(move || {
            let _done = done;
            leaf::closure_task(worker, task, &sink, reporter.as_ref());
        });
    }

    batch.wait();
    reporter.on_event(&Event::ClosureBatchFinished { worker });
}

fn delegated_batch(
    worker: usize,
    num_subtasks: usize,
    sink: &Sink,
    reporter: &Arc<dyn Reporter>,
) {
    let batch = BlockingCompletionGroup::with_pending(num_subtasks);

    for task in 0..num_subtasks {
        let done = CompletionGuard::new(&batch);
        let sink = sink.clone();
        let reporter = Arc::clone(reporter);
        thread::spawn(move || invoke_subroutine(worker, task, sink, reporter, done));
    }

    batch.wait();
}

fn invoke_subroutine(
    worker: usize,
    task: usize,
    sink: Sink,
    reporter: Arc<dyn Reporter>,
    _done: Done,
) {
    leaf::delegated_task(worker, task, &sink, reporter.as_ref());
}
