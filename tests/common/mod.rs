//! Shared counter domain for the integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::time::Duration;

use mvi_runtime::{Effect, Intent, Middleware, PostProcess, Reducer, State, StateStream};

pub const WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CounterState {
    pub count: i64,
}

impl CounterState {
    pub fn at(count: i64) -> Self {
        Self { count }
    }
}

impl State for CounterState {}

#[derive(Debug, Clone, PartialEq)]
pub enum CounterIntent {
    Increment,
    Add(i64),
    Reset,
    /// Makes the reducer panic.
    Crash,
}

impl Intent for CounterIntent {}

#[derive(Debug, Clone, PartialEq)]
pub enum CounterEffect {
    Toast(String),
    Navigate(String),
    Error(String),
}

impl Effect for CounterEffect {}

pub struct CounterReducer;

impl Reducer for CounterReducer {
    type State = CounterState;
    type Intent = CounterIntent;

    fn reduce(state: CounterState, intent: CounterIntent) -> CounterState {
        match intent {
            CounterIntent::Increment => CounterState::at(state.count + 1),
            CounterIntent::Add(n) => CounterState::at(state.count + n),
            CounterIntent::Reset => CounterState::at(0),
            CounterIntent::Crash => panic!("reducer crashed"),
        }
    }
}

/// Emits a toast with the new count after every transition.
pub struct ToastMiddleware;

impl Middleware<CounterState, CounterIntent, CounterEffect> for ToastMiddleware {
    fn post_process(
        &mut self,
        _original: &CounterState,
        _intent: &CounterIntent,
        candidate: CounterState,
    ) -> PostProcess<CounterState, CounterEffect> {
        let toast = CounterEffect::Toast(format!("count={}", candidate.count));
        PostProcess::with_effects(candidate, vec![toast])
    }
}

/// Bound a future so a broken runtime fails the test instead of hanging it.
pub async fn within<F: Future>(future: F) -> F::Output {
    tokio::time::timeout(WAIT, future)
        .await
        .expect("timed out waiting for the runtime")
}

pub async fn next_state(stream: &mut StateStream<CounterState>) -> CounterState {
    within(stream.recv()).await.expect("state stream ended")
}

/// Read states until one matches, returning it.
pub async fn wait_for_state<F>(
    stream: &mut StateStream<CounterState>,
    mut matches: F,
) -> CounterState
where
    F: FnMut(&CounterState) -> bool,
{
    within(async {
        loop {
            let state = stream.recv().await.expect("state stream ended");
            if matches(&state) {
                return state;
            }
        }
    })
    .await
}

/// Poll a condition that is updated off the processing loop.
pub async fn eventually<F: FnMut() -> bool>(mut condition: F) {
    within(async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
}
