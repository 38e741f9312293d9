mod common;

use common::*;
use mvi_runtime::{
    ErrorContainmentMiddleware, LoggingMiddleware, Middleware, Store, TimingMiddleware,
};

type CounterStore = Store<CounterReducer, CounterEffect>;

/// Rejects transitions that would make the counter negative.
fn non_negative_guard() -> ErrorContainmentMiddleware<CounterState, CounterIntent, CounterEffect> {
    ErrorContainmentMiddleware::new(
        |_original: &CounterState, _intent: &CounterIntent, candidate: CounterState| {
            anyhow::ensure!(candidate.count >= 0, "count would become {}", candidate.count);
            Ok(candidate)
        },
        |err| CounterEffect::Error(err.to_string()),
    )
}

#[tokio::test]
async fn containment_reverts_and_emits_error_effect() {
    let store: CounterStore = Store::builder(CounterState::at(0))
        .middleware(non_negative_guard())
        .build()
        .unwrap();
    let mut states = store.state_stream();
    let mut effects = store.effect_stream();

    store.send_intent(CounterIntent::Add(2)).unwrap();
    store.send_intent(CounterIntent::Add(-5)).unwrap();

    assert_eq!(next_state(&mut states).await, CounterState::at(0));
    assert_eq!(next_state(&mut states).await, CounterState::at(2));
    // The rejected transition still commits, but with the reverted state.
    assert_eq!(next_state(&mut states).await, CounterState::at(2));
    assert_eq!(
        within(effects.recv()).await,
        Some(CounterEffect::Error("count would become -3".into()))
    );
    assert_eq!(store.state_history().len(), 2);
}

#[tokio::test]
async fn later_middleware_sees_reverted_state() {
    let store: CounterStore = Store::builder(CounterState::at(1))
        .middleware(non_negative_guard())
        .middleware(ToastMiddleware)
        .build()
        .unwrap();
    let mut effects = store.effect_stream();

    store.send_intent(CounterIntent::Add(-10)).unwrap();

    assert_eq!(
        within(effects.recv()).await,
        Some(CounterEffect::Error("count would become -9".into()))
    );
    assert_eq!(
        within(effects.recv()).await,
        Some(CounterEffect::Toast("count=1".into()))
    );
}

#[tokio::test]
async fn timing_records_each_intent_kind() {
    let timing = TimingMiddleware::new();
    let report = timing.report();
    let store: CounterStore = Store::builder(CounterState::at(0))
        .middleware(timing)
        .middleware(LoggingMiddleware::default())
        .build()
        .unwrap();
    let mut states = store.state_stream();

    store.send_intent(CounterIntent::Increment).unwrap();
    store.send_intent(CounterIntent::Add(3)).unwrap();
    store.send_intent(CounterIntent::Add(4)).unwrap();
    wait_for_state(&mut states, |s| s.count == 8).await;

    let snapshot = report.snapshot();
    assert_eq!(snapshot.get("Increment").map(|t| t.count), Some(1));
    let add = snapshot.get("Add").expect("Add bucket");
    assert_eq!(add.count, 2);
    assert!(add.max >= add.last);
}

/// Rewrites `Increment` into `Add(10)` before reduction.
struct Amplifier;

impl Middleware<CounterState, CounterIntent, CounterEffect> for Amplifier {
    fn pre_process(&mut self, _state: &CounterState, intent: CounterIntent) -> CounterIntent {
        match intent {
            CounterIntent::Increment => CounterIntent::Add(10),
            other => other,
        }
    }
}

#[tokio::test]
async fn history_records_the_intent_that_was_reduced() {
    let store: CounterStore = Store::builder(CounterState::at(0))
        .middleware(LoggingMiddleware::new(tracing::Level::TRACE))
        .middleware(Amplifier)
        .build()
        .unwrap();
    let mut states = store.state_stream();

    store.send_intent(CounterIntent::Increment).unwrap();
    wait_for_state(&mut states, |s| s.count == 10).await;

    let history = store.state_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].intent, CounterIntent::Add(10));
    assert_eq!(history[0].state, CounterState::at(10));
}
