//! Unbounded multi-producer/single-consumer intent queue.

use tokio::sync::mpsc;

use crate::error::RuntimeError;
use crate::shutdown::ShutdownHandle;

/// Producer side of the intent queue. Cheap to clone; every clone feeds the
/// same processing loop.
pub struct IntentSender<I> {
    sender: mpsc::UnboundedSender<I>,
    shutdown: ShutdownHandle,
}

impl<I> Clone for IntentSender<I> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<I> IntentSender<I> {
    /// Enqueue an intent and return immediately.
    ///
    /// Fails fast once the runtime is disposed or its loop has died, rather
    /// than dropping the intent silently.
    pub fn send(&self, intent: I) -> Result<(), RuntimeError> {
        if self.shutdown.is_shutting_down() {
            return Err(RuntimeError::Disposed);
        }
        self.sender.send(intent).map_err(|_| {
            if self.shutdown.is_shutting_down() {
                RuntimeError::Disposed
            } else {
                RuntimeError::LoopTerminated
            }
        })
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Consumer side, owned by the processing loop.
pub struct IntentQueue<I> {
    receiver: mpsc::UnboundedReceiver<I>,
}

impl<I> IntentQueue<I> {
    /// Wait for the next intent without busy-polling.
    pub async fn next(&mut self) -> Option<I> {
        self.receiver.recv().await
    }

    /// Stop accepting intents; pending ones are discarded with the queue.
    pub fn close(&mut self) {
        self.receiver.close();
    }
}

pub fn intent_channel<I>(shutdown: ShutdownHandle) -> (IntentSender<I>, IntentQueue<I>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        IntentSender { sender, shutdown },
        IntentQueue { receiver },
    )
}
