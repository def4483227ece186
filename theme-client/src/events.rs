//! Event fabric between the sync engine and reporting
//!
//! Emission is fire-and-forget through an unbounded channel: a slow or
//! momentarily blocked sink never stalls the producing operation. That
//! is acceptable at the event volume of one sync operation and is not
//! a backpressure mechanism.

use shared::ThemeEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::ClientError;

/// Handle through which producers emit events to the reporting sink
pub type EventLog = mpsc::UnboundedSender<ThemeEvent>;

/// Create a fresh event stream.
pub fn event_log() -> (EventLog, mpsc::UnboundedReceiver<ThemeEvent>) {
    mpsc::unbounded_channel()
}

/// Hand one event to the sink without blocking the caller.
pub fn log_event(event: ThemeEvent, log: &EventLog) {
    if log.send(event).is_err() {
        tracing::warn!("event sink dropped before the operation finished");
    }
}

/// Fan-in combinator: forward every event from each source into `dest`.
///
/// Intra-source order is preserved; interleaving across concurrently
/// producing sources is not deterministic. Each source is drained to
/// exhaustion. Dropping `dest` (and its clones) to close the merged
/// stream stays the caller's responsibility.
pub fn merge_events(
    dest: EventLog,
    sources: Vec<mpsc::UnboundedReceiver<ThemeEvent>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut forwarders = Vec::with_capacity(sources.len());
        for mut source in sources {
            let dest = dest.clone();
            forwarders.push(tokio::spawn(async move {
                while let Some(event) = source.recv().await {
                    if dest.send(event).is_err() {
                        break;
                    }
                }
            }));
        }
        for forwarder in forwarders {
            let _ = forwarder.await;
        }
    })
}

/// Drain a listing query's error channel into notification events.
///
/// Terminates exactly once, when the channel closes; closure is the
/// sentinel that the producing request has finished.
pub fn drain_errors(
    mut errs: mpsc::Receiver<ClientError>,
    log: EventLog,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(err) = errs.recv().await {
            tracing::warn!(error = %err, "listing query reported an error");
            log_event(ThemeEvent::error(err), &log);
        }
    })
}
