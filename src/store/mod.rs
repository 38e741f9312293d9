//! The reactive state/effect runtime.
//!
//! A [`Store`] serializes every state transition through one processing
//! loop:
//!
//! ```text
//! send_intent ─→ IntentQueue ─→ pre hooks ─→ Reducer ─→ post hooks
//!                                                          │
//!      state_stream ←─ SnapshotStore ←─ commit ←───────────┤
//!      PersistencePort ←─ writer thread ←─ submit ←────────┤
//!      effect_stream ←─ EffectBus ←─ effects in order ←────┘
//! ```

pub mod effects;
pub mod history;
mod processor;
pub mod queue;
pub mod stream;

pub use effects::EffectBus;
pub use history::{Snapshot, SnapshotStore};
pub use queue::{IntentQueue, IntentSender};
pub use stream::{EffectStream, StateStream};

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::RuntimeConfig;
use crate::error::RuntimeError;
use crate::middleware::{Middleware, MiddlewareChain};
use crate::mvi::{Effect, Reducer};
use crate::persistence::{
    NoPersistence, PersistFailureCallback, PersistenceError, PersistencePort, PersistenceWriter,
};
use crate::shutdown::{LifecyclePhase, ShutdownCoordinator, ShutdownHandle};
use processor::Processor;

/// Assembles a [`Store`]: initial state, config, middleware in order and
/// the persistence port.
pub struct StoreBuilder<R: Reducer, E: Effect> {
    initial: R::State,
    config: RuntimeConfig,
    chain: MiddlewareChain<R::State, R::Intent, E>,
    persistence: Arc<dyn PersistencePort<R::State>>,
    on_persist_failure: Option<PersistFailureCallback>,
}

impl<R: Reducer, E: Effect> StoreBuilder<R, E> {
    pub fn new(initial: R::State) -> Self {
        Self {
            initial,
            config: RuntimeConfig::default(),
            chain: MiddlewareChain::new(),
            persistence: Arc::new(NoPersistence),
            on_persist_failure: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a middleware. Registration order is execution order.
    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<R::State, R::Intent, E>,
    {
        self.chain.push(Box::new(middleware));
        self
    }

    pub fn persistence<P>(mut self, port: P) -> Self
    where
        P: PersistencePort<R::State>,
    {
        self.persistence = Arc::new(port);
        self
    }

    /// Called on the persistence writer thread for every failed write.
    pub fn on_persist_failure<F>(mut self, callback: F) -> Self
    where
        F: Fn(&PersistenceError) + Send + Sync + 'static,
    {
        self.on_persist_failure = Some(Arc::new(callback));
        self
    }

    /// Restore persisted state and start the processing loop.
    ///
    /// Must be called from within a tokio runtime; the loop is spawned on
    /// it. `restore` runs synchronously here, so the restored state is in
    /// place before any intent can be processed.
    pub fn build(self) -> Result<Store<R, E>, RuntimeError> {
        self.config.validate()?;
        let handle = Handle::try_current().map_err(|_| RuntimeError::NoExecutor)?;

        let initial = if self.config.restore_on_start {
            restore_or(self.initial, &*self.persistence)
        } else {
            self.initial
        };

        let snapshots = Arc::new(SnapshotStore::new(
            initial,
            self.config.max_history_size,
            self.config.state_channel_capacity,
        ));
        let effects = EffectBus::new();
        let shutdown = ShutdownCoordinator::new();
        let (intents, queue) = queue::intent_channel(shutdown.handle());

        let persistence = self
            .config
            .persist_transitions
            .then(|| PersistenceWriter::spawn(self.persistence, self.on_persist_failure));

        let processor = Processor::<R, E> {
            queue,
            chain: self.chain,
            snapshots: Arc::clone(&snapshots),
            effects: effects.clone(),
            persistence,
            shutdown: shutdown.handle(),
        };
        let loop_task = handle.spawn(processor.run());
        let supervisor = handle.spawn(supervise(loop_task, shutdown.handle()));

        Ok(Store {
            intents,
            snapshots,
            effects,
            shutdown,
            supervisor: Mutex::new(Some(supervisor)),
            config: self.config,
        })
    }
}

fn restore_or<S: 'static>(initial: S, port: &dyn PersistencePort<S>) -> S {
    match port.restore() {
        Ok(Some(restored)) => {
            tracing::debug!("restored persisted state");
            restored
        }
        Ok(None) => initial,
        Err(err) => {
            tracing::warn!(error = %err, "failed to restore state, using initial state");
            initial
        }
    }
}

/// Waits for the processing loop and reports it if it died on its own.
async fn supervise(loop_task: JoinHandle<()>, shutdown: ShutdownHandle) {
    match loop_task.await {
        Ok(()) => {}
        Err(err) if err.is_panic() => {
            shutdown.mark_failed();
            tracing::error!("processing loop panicked; runtime is no longer usable");
        }
        Err(err) => tracing::debug!(error = %err, "processing loop cancelled"),
    }
}

/// A running state/effect runtime.
///
/// All methods take `&self`; share the store behind an `Arc` or hand out
/// [`IntentSender`]/[`EffectBus`] clones to concurrent producers.
pub struct Store<R: Reducer, E: Effect> {
    intents: IntentSender<R::Intent>,
    snapshots: Arc<SnapshotStore<R::State, R::Intent>>,
    effects: EffectBus<E>,
    shutdown: ShutdownCoordinator,
    supervisor: Mutex<Option<JoinHandle<()>>>,
    config: RuntimeConfig,
}

impl<R: Reducer, E: Effect> Store<R, E> {
    pub fn builder(initial: R::State) -> StoreBuilder<R, E> {
        StoreBuilder::new(initial)
    }

    /// Enqueue an intent; returns without waiting for it to be processed.
    pub fn send_intent(&self, intent: R::Intent) -> Result<(), RuntimeError> {
        self.intents.send(intent)
    }

    pub fn intent_sender(&self) -> IntentSender<R::Intent> {
        self.intents.clone()
    }

    /// Emit an effect outside the intent pipeline.
    pub fn send_effect(&self, effect: E) -> Result<(), RuntimeError> {
        self.ensure_running()?;
        self.effects.send(effect);
        Ok(())
    }

    pub fn effect_bus(&self) -> EffectBus<E> {
        self.effects.clone()
    }

    /// The state produced by the last completed transition.
    pub fn current_state(&self) -> R::State {
        self.snapshots.current()
    }

    pub fn state_stream(&self) -> StateStream<R::State> {
        let (current, receiver) = self.snapshots.subscribe();
        StateStream::new(current, receiver)
    }

    pub fn effect_stream(&self) -> EffectStream<E> {
        self.effects.subscribe()
    }

    /// Debug only: force the current state to `history[index].state`.
    ///
    /// Runs no reducer or middleware, appends no snapshot, writes nothing
    /// to persistence and emits no effects. State subscribers do see the
    /// new value.
    pub fn time_travel(&self, index: usize) -> Result<(), RuntimeError> {
        self.ensure_running()?;
        self.snapshots.travel(index)?;
        tracing::debug!(index, "time travel");
        Ok(())
    }

    /// Copy of the snapshot history, oldest first.
    pub fn state_history(&self) -> Vec<Snapshot<R::State, R::Intent>> {
        self.snapshots.history()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn lifecycle_phase(&self) -> LifecyclePhase {
        self.shutdown.phase()
    }

    pub fn is_disposed(&self) -> bool {
        self.shutdown.is_shutting_down()
    }

    pub(crate) fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.handle()
    }

    /// Tear the runtime down. Idempotent.
    ///
    /// Cancels the loop's wait, ends every state and effect stream and
    /// makes later `send_intent` calls fail with [`RuntimeError::Disposed`].
    /// Intents still queued are dropped.
    pub fn dispose(&self) {
        if !self.shutdown.signal() {
            return;
        }
        self.shutdown.advance(LifecyclePhase::Disposing);
        self.effects.close();
        self.snapshots.close();
        self.shutdown.advance(LifecyclePhase::Disposed);
    }

    /// Dispose and wait until the processing loop has exited.
    pub async fn dispose_and_join(&self) {
        self.dispose();
        let supervisor = self.supervisor.lock().take();
        if let Some(supervisor) = supervisor {
            let _ = supervisor.await;
        }
    }

    fn ensure_running(&self) -> Result<(), RuntimeError> {
        if self.shutdown.is_shutting_down() {
            return Err(RuntimeError::Disposed);
        }
        if self.shutdown.phase() == LifecyclePhase::Failed {
            return Err(RuntimeError::LoopTerminated);
        }
        Ok(())
    }
}

impl<R: Reducer, E: Effect> Drop for Store<R, E> {
    fn drop(&mut self) {
        self.dispose();
    }
}
