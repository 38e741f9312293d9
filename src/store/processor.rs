//! The single consumer that serializes every state transition.

use std::sync::Arc;

use super::effects::EffectBus;
use super::history::SnapshotStore;
use super::queue::IntentQueue;
use crate::middleware::{MiddlewareChain, Transition};
use crate::mvi::{Effect, Intent, Reducer};
use crate::persistence::PersistenceWriter;
use crate::shutdown::ShutdownHandle;

type ChainFor<R, E> = MiddlewareChain<<R as Reducer>::State, <R as Reducer>::Intent, E>;

/// Owns the middleware chain and pops intents strictly one at a time.
///
/// Exactly one `Processor` exists per store, which is what lets reducers
/// and middleware run without locks.
pub(crate) struct Processor<R: Reducer, E: Effect> {
    pub(crate) queue: IntentQueue<R::Intent>,
    pub(crate) chain: ChainFor<R, E>,
    pub(crate) snapshots: Arc<SnapshotStore<R::State, R::Intent>>,
    pub(crate) effects: EffectBus<E>,
    pub(crate) persistence: Option<PersistenceWriter<R::State>>,
    pub(crate) shutdown: ShutdownHandle,
}

impl<R: Reducer, E: Effect> Processor<R, E> {
    pub(crate) async fn run(mut self) {
        tracing::debug!(middlewares = self.chain.len(), "processing loop started");
        loop {
            let intent = tokio::select! {
                biased;
                _ = self.shutdown.wait() => break,
                next = self.queue.next() => match next {
                    Some(intent) => intent,
                    None => break,
                },
            };
            self.process(intent);
        }
        self.queue.close();
        tracing::debug!("processing loop stopped");
    }

    /// One complete transition. Runs synchronously, so a teardown signal
    /// is only observed between transitions.
    fn process(&mut self, intent: R::Intent) {
        let current = self.snapshots.current();
        let kind = intent.kind();

        let Transition {
            intent,
            state,
            effects,
        } = self.chain.run::<R>(&current, intent);

        self.snapshots.commit(state.clone(), intent);
        if let Some(writer) = &self.persistence {
            writer.submit(state);
        }

        let effect_count = effects.len();
        for effect in effects {
            self.effects.send(effect);
        }

        tracing::debug!(
            intent = %kind,
            effects = effect_count,
            history_len = self.snapshots.len(),
            "transition committed"
        );
    }
}
