//! Hot multicast bus for one-shot effects.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use super::stream::EffectStream;
use crate::mvi::Effect;

type Subscribers<E> = Vec<mpsc::UnboundedSender<E>>;

/// Fan-out for effects.
///
/// Only subscribers attached at send time receive an effect; nothing is
/// queued for absent subscribers. Each subscriber has its own unbounded
/// queue, so a slow reader never loses effects and never slows the sender.
/// Cloning yields another handle to the same bus, which is how business
/// logic running outside the intent pipeline emits effects.
#[derive(Clone)]
pub struct EffectBus<E> {
    subscribers: Arc<RwLock<Option<Subscribers<E>>>>,
}

impl<E: Effect> EffectBus<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(Some(Vec::new()))),
        }
    }

    /// Push an effect to every current subscriber without waiting.
    ///
    /// Returns how many subscribers it was delivered to. Subscribers whose
    /// stream was dropped are forgotten here.
    pub fn send(&self, effect: E) -> usize {
        let mut guard = self.subscribers.write();
        let Some(subscribers) = guard.as_mut() else {
            tracing::trace!(effect = ?effect, "effect dropped: bus closed");
            return 0;
        };
        subscribers.retain(|subscriber| subscriber.send(effect.clone()).is_ok());
        if subscribers.is_empty() {
            tracing::trace!(effect = ?effect, "effect dropped: no subscribers");
        }
        subscribers.len()
    }

    pub fn subscribe(&self) -> EffectStream<E> {
        let (sender, receiver) = mpsc::unbounded_channel();
        match self.subscribers.write().as_mut() {
            Some(subscribers) => subscribers.push(sender),
            // Dropping the sender ends the stream straight away.
            None => drop(sender),
        }
        EffectStream::new(receiver)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .as_ref()
            .map(|subscribers| subscribers.iter().filter(|s| !s.is_closed()).count())
            .unwrap_or(0)
    }

    /// End every subscription; later sends are dropped.
    ///
    /// Effects already queued for a subscriber are still delivered before
    /// its stream ends.
    pub fn close(&self) {
        self.subscribers.write().take();
    }

    pub fn is_closed(&self) -> bool {
        self.subscribers.read().is_none()
    }
}

impl<E: Effect> Default for EffectBus<E> {
    fn default() -> Self {
        Self::new()
    }
}
