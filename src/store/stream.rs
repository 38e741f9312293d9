//! `Stream` adapters over the runtime's state and effect channels.

use std::future::poll_fn;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, UnboundedReceiverStream};

use crate::mvi::{Effect, State};

/// Committed states: the current state first, then every later commit.
///
/// A subscriber that falls more than the configured channel capacity
/// behind skips the overflow and continues with the newest states.
pub struct StateStream<S> {
    pending: Option<S>,
    inner: BroadcastStream<S>,
}

impl<S: State> StateStream<S> {
    pub(crate) fn new(current: S, receiver: broadcast::Receiver<S>) -> Self {
        Self {
            pending: Some(current),
            inner: BroadcastStream::new(receiver),
        }
    }

    /// Wait for the next state. `None` once the runtime is disposed.
    pub async fn recv(&mut self) -> Option<S> {
        poll_fn(|cx| Pin::new(&mut *self).poll_next(cx)).await
    }
}

// Neither field is structurally pinned.
impl<S> Unpin for StateStream<S> {}

impl<S: State> Stream for StateStream<S> {
    type Item = S;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(current) = self.pending.take() {
            return Poll::Ready(Some(current));
        }
        poll_skipping_lag(&mut self.inner, cx)
    }
}

/// Effects emitted after the subscription was created, none skipped.
pub struct EffectStream<E> {
    inner: UnboundedReceiverStream<E>,
}

impl<E: Effect> EffectStream<E> {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<E>) -> Self {
        Self {
            inner: UnboundedReceiverStream::new(receiver),
        }
    }

    /// Wait for the next effect. `None` once the runtime is disposed.
    pub async fn recv(&mut self) -> Option<E> {
        poll_fn(|cx| Pin::new(&mut *self).poll_next(cx)).await
    }
}

impl<E: Effect> Stream for EffectStream<E> {
    type Item = E;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

fn poll_skipping_lag<T>(inner: &mut BroadcastStream<T>, cx: &mut Context<'_>) -> Poll<Option<T>>
where
    T: Clone + Send + 'static,
{
    loop {
        match Pin::new(&mut *inner).poll_next(cx) {
            Poll::Ready(Some(Ok(item))) => return Poll::Ready(Some(item)),
            Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                tracing::warn!(skipped, "state subscriber lagged, skipping to newer states");
            }
            Poll::Ready(None) => return Poll::Ready(None),
            Poll::Pending => return Poll::Pending,
        }
    }
}
