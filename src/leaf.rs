use crate::error::{LeafError, Outcome, RunError};
use crate::reporter::{Event, Reporter};
use crate::sink::ResultSink;

/// Runs the delegated subroutine for a task identity.
///
/// The failure policy is fixed: even identities fail, odd identities succeed.
///
/// # Parameters
///
/// * `task` - Identity of the leaf task within its batch.
///
/// # Returns
///
/// `Ok(())` for odd identities, `LeafError::IntentionalFailure` for even ones.
pub fn execute(task: usize) -> Outcome {
    if task % 2 == 0 {
        Err(LeafError::IntentionalFailure { task })
    } else {
        Ok(())
    }
}

/// Sends an outcome, reporting instead of propagating a closed stream.
///
/// The stream stays open until every producer is done, so a failed send means
/// the run was torn down underneath this task.
pub fn deliver<S: ResultSink>(
    sink: &S,
    outcome: Outcome,
    origin: impl FnOnce() -> String,
    reporter: &dyn Reporter,
) {
    if sink.emit(outcome).is_err() {
        let err = RunError::StreamClosed { origin: origin() };
        reporter.on_event(&Event::SendFailed {
            message: err.to_string(),
        });
    }
}

/// Body of a closure-batch task: always succeeds.
pub fn closure_task<S: ResultSink>(worker: usize, task: usize, sink: &S, reporter: &dyn Reporter) {
    reporter.on_event(&Event::ClosureSucceeded { worker, task });
    deliver(
        sink,
        Ok(()),
        || format!("[Inline {worker}] procedure {task}"),
        reporter,
    );
}

/// The synchronous task a worker runs on itself between its two batches.
pub fn inline_task<S: ResultSink>(worker: usize, sink: &S, reporter: &dyn Reporter) {
    reporter.on_event(&Event::InlineTask { worker });
    deliver(sink, Ok(()), || format!("[Sync {worker}]"), reporter);
}

/// Body of a delegated-batch task: emits whatever [`execute`] decides.
pub fn delegated_task<S: ResultSink>(
    worker: usize,
    task: usize,
    sink: &S,
    reporter: &dyn Reporter,
) {
    reporter.on_event(&Event::DelegateStarted { worker, task });
    deliver(
        sink,
        execute(task),
        || format!("[Delegate {task}]"),
        reporter,
    );
    reporter.on_event(&Event::DelegateEnded { worker, task });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::testing::RecordingReporter;
    use tokio::sync::mpsc;

    #[test]
    fn test_execute_even_fails() {
        assert_eq!(execute(0), Err(LeafError::IntentionalFailure { task: 0 }));
        assert_eq!(execute(2), Err(LeafError::IntentionalFailure { task: 2 }));
        assert_eq!(execute(1), Ok(()));
        assert_eq!(execute(7), Ok(()));
    }

    #[test]
    fn test_execute_is_deterministic() {
        let first: Vec<_> = (0..16).map(execute).collect();
        let second: Vec<_> = (0..16).map(execute).collect();
        assert_eq!(first, second);
        assert_eq!(first.iter().filter(|o| o.is_err()).count(), 8);
    }

    #[test]
    fn test_delegated_task_emits_once_and_logs() {
        let (sink, mut stream) = mpsc::unbounded_channel();
        let reporter = RecordingReporter::default();

        delegated_task(3, 4, &sink, &reporter);
        drop(sink);

        assert_eq!(
            stream.try_recv(),
            Ok(Err(LeafError::IntentionalFailure { task: 4 }))
        );
        assert!(stream.try_recv().is_err());
        assert_eq!(
            reporter.events(),
            vec![
                Event::DelegateStarted { worker: 3, task: 4 },
                Event::DelegateEnded { worker: 3, task: 4 },
            ]
        );
    }

    #[test]
    fn test_closure_and_inline_tasks_succeed() {
        let (sink, mut stream) = mpsc::unbounded_channel();
        let reporter = RecordingReporter::default();

        closure_task(1, 0, &sink, &reporter);
        inline_task(1, &sink, &reporter);

        assert_eq!(stream.try_recv(), Ok(Ok(())));
        assert_eq!(stream.try_recv(), Ok(Ok(())));
        assert_eq!(
            reporter.events(),
            vec![
                Event::ClosureSucceeded { worker: 1, task: 0 },
                Event::InlineTask { worker: 1 },
            ]
        );
    }

    #[test]
    fn test_deliver_reports_closed_stream() {
        let (sink, stream) = mpsc::unbounded_channel();
        drop(stream);
        let reporter = RecordingReporter::default();

        inline_task(5, &sink, &reporter);

        assert_eq!(
            reporter.events(),
            vec![
                Event::InlineTask { worker: 5 },
                Event::SendFailed {
                    message: "result stream closed before the outcome of [Sync 5] could be sent"
                        .to_string(),
                },
            ]
        );
    }
}
