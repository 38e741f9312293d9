use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use super::{PersistFailureCallback, PersistencePort};

/// Fire-and-forget handle to the background persistence writer.
///
/// Every submitted state is written, in commit order, on a dedicated
/// thread. A slow backend grows the queue instead of stalling the loop.
pub(crate) struct PersistenceWriter<S> {
    sender: Sender<S>,
}

impl<S> PersistenceWriter<S>
where
    S: Send + 'static,
{
    pub(crate) fn spawn(
        port: Arc<dyn PersistencePort<S>>,
        on_failure: Option<PersistFailureCallback>,
    ) -> Self {
        let (sender, receiver) = channel();
        let spawned = std::thread::Builder::new()
            .name("persist-writer".to_string())
            .spawn(move || writer_loop(receiver, port, on_failure));
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "failed to start persistence writer, writes disabled");
        }
        Self { sender }
    }

    /// Queue a state for writing; never blocks.
    pub(crate) fn submit(&self, state: S) {
        if self.sender.send(state).is_err() {
            tracing::trace!("persistence writer gone, state not written");
        }
    }
}

fn writer_loop<S: 'static>(
    receiver: Receiver<S>,
    port: Arc<dyn PersistencePort<S>>,
    on_failure: Option<PersistFailureCallback>,
) {
    while let Ok(state) = receiver.recv() {
        match port.persist(&state) {
            Ok(()) => tracing::trace!("state persisted"),
            Err(err) => {
                tracing::warn!(error = %err, "failed to persist state");
                if let Some(callback) = &on_failure {
                    callback(&err);
                }
            }
        }
    }
    tracing::trace!("persistence writer stopped");
}
