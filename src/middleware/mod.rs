//! Ordered pre/post processors wrapped around every reduction.
//!
//! For each dequeued intent the chain runs in two phases:
//!
//! 1. `pre_process`, in registration order, threading the intent through
//!    every middleware before it reaches the reducer.
//! 2. `post_process`, in registration order, threading the candidate state
//!    through every middleware. Middleware N sees the state as left by
//!    middleware N-1. Effects are concatenated in registration order.
//!
//! A middleware must not panic past its own boundary. Panics in
//! `pre_process` are fatal for the owning runtime; see
//! [`ErrorContainmentMiddleware`] for the one supported way of turning a
//! failure inside `post_process` into an effect.

mod containment;
mod logging;
mod timing;

pub use containment::ErrorContainmentMiddleware;
pub use logging::LoggingMiddleware;
pub use timing::{IntentTiming, TimingMiddleware, TimingReport};

use crate::mvi::{Effect, Intent, Reducer, State};

/// Output of a single `post_process` hook.
#[derive(Debug, Clone, PartialEq)]
pub struct PostProcess<S, E> {
    pub state: S,
    pub effects: Vec<E>,
}

impl<S, E> PostProcess<S, E> {
    /// Pass the state through without emitting anything.
    pub fn unchanged(state: S) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    pub fn with_effects(state: S, effects: Vec<E>) -> Self {
        Self { state, effects }
    }
}

/// Hook pair run around each reduction.
///
/// Hooks take `&mut self`: the chain is owned by the single processing
/// loop, so middleware may keep per-transition bookkeeping without locks.
pub trait Middleware<S, I, E>: Send + 'static {
    /// Observe or rewrite the intent before it reaches the reducer.
    fn pre_process(&mut self, _state: &S, intent: I) -> I {
        intent
    }

    /// Observe or rewrite the candidate state and emit effects.
    ///
    /// `original` is the state before the transition, `intent` the intent
    /// after every `pre_process` hook ran.
    fn post_process(&mut self, _original: &S, _intent: &I, candidate: S) -> PostProcess<S, E> {
        PostProcess::unchanged(candidate)
    }
}

/// Result of running one intent through the chain and reducer.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S, I, E> {
    /// The intent as it reached the reducer.
    pub intent: I,
    /// The state left by the last `post_process` hook.
    pub state: S,
    /// Effects from every middleware, in registration order.
    pub effects: Vec<E>,
}

pub struct MiddlewareChain<S, I, E> {
    middlewares: Vec<Box<dyn Middleware<S, I, E>>>,
}

impl<S, I, E> MiddlewareChain<S, I, E>
where
    S: State,
    I: Intent,
    E: Effect,
{
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    pub fn push(&mut self, middleware: Box<dyn Middleware<S, I, E>>) {
        self.middlewares.push(middleware);
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    pub fn pre_process(&mut self, state: &S, intent: I) -> I {
        self.middlewares
            .iter_mut()
            .fold(intent, |acc, middleware| middleware.pre_process(state, acc))
    }

    pub fn post_process(&mut self, original: &S, intent: &I, candidate: S) -> PostProcess<S, E> {
        let mut state = candidate;
        let mut effects = Vec::new();
        for middleware in &mut self.middlewares {
            let step = middleware.post_process(original, intent, state);
            state = step.state;
            effects.extend(step.effects);
        }
        PostProcess { state, effects }
    }

    /// Run one full transition: pre hooks, reducer, post hooks.
    ///
    /// The reducer runs exactly once, after every `pre_process` and before
    /// any `post_process`.
    pub fn run<R>(&mut self, state: &S, intent: I) -> Transition<S, I, E>
    where
        R: Reducer<State = S, Intent = I>,
    {
        let intent = self.pre_process(state, intent);
        let candidate = R::reduce(state.clone(), intent.clone());
        let PostProcess { state, effects } = self.post_process(state, &intent, candidate);
        Transition {
            intent,
            state,
            effects,
        }
    }
}

impl<S, I, E> Default for MiddlewareChain<S, I, E>
where
    S: State,
    I: Intent,
    E: Effect,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, I, E> FromIterator<Box<dyn Middleware<S, I, E>>> for MiddlewareChain<S, I, E> {
    fn from_iter<T: IntoIterator<Item = Box<dyn Middleware<S, I, E>>>>(iter: T) -> Self {
        Self {
            middlewares: iter.into_iter().collect(),
        }
    }
}
