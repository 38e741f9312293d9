//! Lifecycle wrapper owned by a screen or other UI component.
//!
//! A [`ViewModel`] owns one [`Store`] for its whole life, adds scoped
//! launching of asynchronous business logic whose failures become effects,
//! and tears everything down exactly once.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::error::RuntimeError;
use crate::mvi::{Effect, Reducer};
use crate::store::{EffectStream, Snapshot, StateStream, Store};

/// Converts a domain error from launched work into an effect.
pub trait ErrorEffectFactory<E>: Send + Sync + 'static {
    fn create_error_effect(&self, error: &anyhow::Error) -> E;
}

impl<E, F> ErrorEffectFactory<E> for F
where
    F: Fn(&anyhow::Error) -> E + Send + Sync + 'static,
{
    fn create_error_effect(&self, error: &anyhow::Error) -> E {
        self(error)
    }
}

pub struct ViewModel<R: Reducer, E: Effect> {
    store: Store<R, E>,
    error_effects: Arc<dyn ErrorEffectFactory<E>>,
}

impl<R: Reducer, E: Effect> ViewModel<R, E> {
    pub fn new<F>(store: Store<R, E>, error_effects: F) -> Self
    where
        F: ErrorEffectFactory<E>,
    {
        Self {
            store,
            error_effects: Arc::new(error_effects),
        }
    }

    pub fn handle_intent(&self, intent: R::Intent) -> Result<(), RuntimeError> {
        self.store.send_intent(intent)
    }

    pub fn current_state(&self) -> R::State {
        self.store.current_state()
    }

    pub fn state_stream(&self) -> StateStream<R::State> {
        self.store.state_stream()
    }

    pub fn effect_stream(&self) -> EffectStream<E> {
        self.store.effect_stream()
    }

    pub fn send_effect(&self, effect: E) -> Result<(), RuntimeError> {
        self.store.send_effect(effect)
    }

    pub fn time_travel(&self, index: usize) -> Result<(), RuntimeError> {
        self.store.time_travel(index)
    }

    pub fn state_history(&self) -> Vec<Snapshot<R::State, R::Intent>> {
        self.store.state_history()
    }

    pub fn store(&self) -> &Store<R, E> {
        &self.store
    }

    /// Run asynchronous business logic scoped to this view-model.
    ///
    /// An `Err` (or a panic) from `work` is turned into an effect through
    /// the [`ErrorEffectFactory`] instead of propagating. The work is
    /// aborted when the view-model is disposed.
    pub fn launch_with_error_handling<F>(&self, work: F) -> Result<JoinHandle<()>, RuntimeError>
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        if self.store.is_disposed() {
            return Err(RuntimeError::Disposed);
        }

        let shutdown = self.store.shutdown_handle();
        let effects = self.store.effect_bus();
        let error_effects = Arc::clone(&self.error_effects);

        Ok(tokio::spawn(async move {
            let mut task = tokio::spawn(work);
            let outcome = tokio::select! {
                _ = shutdown.wait() => {
                    task.abort();
                    tracing::trace!("launched work cancelled by dispose");
                    return;
                }
                outcome = &mut task => outcome,
            };

            let error = match outcome {
                Ok(Ok(())) => return,
                Ok(Err(err)) => err,
                Err(join_err) if join_err.is_panic() => {
                    anyhow::anyhow!("launched work panicked")
                }
                Err(_) => return,
            };

            tracing::debug!(error = %error, "launched work failed");
            effects.send(error_effects.create_error_effect(&error));
        }))
    }

    pub fn is_disposed(&self) -> bool {
        self.store.is_disposed()
    }

    /// Cancel launched work, stop the processing loop and close the
    /// intent queue. Idempotent.
    pub fn dispose(&self) {
        self.store.dispose();
    }
}
