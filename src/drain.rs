//! Consumer side of the result stream.
//!
//! Successes are dropped on arrival; failures are logged and kept in arrival
//! order. Draining ends only when the stream is closed and empty; there is no
//! timeout, so a stream that is never closed blocks forever.

use std::sync::mpsc::Receiver;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;

use crate::error::{LeafError, Outcome};
use crate::reporter::{Event, Reporter};

fn absorb(failures: &mut Vec<LeafError>, outcome: Outcome, reporter: &dyn Reporter) {
    if let Err(failure) = outcome {
        reporter.on_event(&Event::FailureDrained {
            task: failure.task(),
            message: failure.to_string(),
        });
        failures.push(failure);
    }
}

/// Drains an async result stream until every sender is gone.
pub async fn drain(
    stream: UnboundedReceiver<Outcome>,
    reporter: &dyn Reporter,
) -> Vec<LeafError> {
    let mut outcomes = UnboundedReceiverStream::new(stream);
    let mut failures = Vec::new();

    while let Some(outcome) = outcomes.next().await {
        absorb(&mut failures, outcome, reporter);
    }

    reporter.on_event(&Event::DrainFinished);
    failures
}

/// Same as [`drain`], parking the calling thread between outcomes.
pub fn drain_blocking(stream: Receiver<Outcome>, reporter: &dyn Reporter) -> Vec<LeafError> {
    let mut failures = Vec::new();

    for outcome in stream {
        absorb(&mut failures, outcome, reporter);
    }

    reporter.on_event(&Event::DrainFinished);
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::testing::RecordingReporter;

    fn fail(task: usize) -> Outcome {
        Err(LeafError::IntentionalFailure { task })
    }

    #[tokio::test]
    async fn test_drain_keeps_failures_in_arrival_order() {
        let (sink, stream) = tokio::sync::mpsc::unbounded_channel();
        for outcome in [Ok(()), fail(4), Ok(()), fail(0), fail(2)] {
            sink.send(outcome).unwrap();
        }
        drop(sink);
        let reporter = RecordingReporter::default();

        let failures = drain(stream, &reporter).await;

        let tasks: Vec<_> = failures.iter().map(LeafError::task).collect();
        assert_eq!(tasks, vec![4, 0, 2]);
        let events = reporter.events();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            Event::FailureDrained {
                task: 4,
                message: "Subroutine 4 intentional fail on odd number".to_string()
            }
        );
        assert_eq!(events[3], Event::DrainFinished);
    }

    #[tokio::test]
    async fn test_drain_empty_closed_stream() {
        let (sink, stream) = tokio::sync::mpsc::unbounded_channel::<Outcome>();
        drop(sink);
        let reporter = RecordingReporter::default();

        assert!(drain(stream, &reporter).await.is_empty());
        assert_eq!(reporter.events(), vec![Event::DrainFinished]);
    }

    #[test]
    fn test_drain_blocking_over_rendezvous_channel() {
        let (sink, stream) = std::sync::mpsc::sync_channel(0);
        let producer = std::thread::spawn(move || {
            for task in 0..5 {
                sink.send(crate::leaf::execute(task)).unwrap();
            }
        });
        let reporter = RecordingReporter::default();

        let failures = drain_blocking(stream, &reporter);

        producer.join().unwrap();
        let tasks: Vec<_> = failures.iter().map(LeafError::task).collect();
        assert_eq!(tasks, vec![0, 2, 4]);
        assert_eq!(reporter.events().last(), Some(&Event::DrainFinished));
    }
}
