mod common;

use common::*;
use mvi_runtime::{Middleware, PostProcess, Store};

type CounterStore = Store<CounterReducer, CounterEffect>;

/// Navigates away once the counter reaches a threshold.
struct NavigateAt(i64);

impl Middleware<CounterState, CounterIntent, CounterEffect> for NavigateAt {
    fn post_process(
        &mut self,
        _original: &CounterState,
        _intent: &CounterIntent,
        candidate: CounterState,
    ) -> PostProcess<CounterState, CounterEffect> {
        if candidate.count == self.0 {
            let effect = CounterEffect::Navigate(format!("/done/{}", self.0));
            return PostProcess::with_effects(candidate, vec![effect]);
        }
        PostProcess::unchanged(candidate)
    }
}

fn store_with_effects() -> CounterStore {
    Store::builder(CounterState::at(0))
        .middleware(ToastMiddleware)
        .middleware(NavigateAt(2))
        .build()
        .expect("store")
}

#[tokio::test]
async fn subscriber_receives_effects_in_emission_order() {
    let store = store_with_effects();
    let mut effects = store.effect_stream();

    store.send_intent(CounterIntent::Increment).unwrap();
    store.send_intent(CounterIntent::Increment).unwrap();

    let mut seen = Vec::new();
    for _ in 0..3 {
        seen.push(within(effects.recv()).await.expect("effect"));
    }
    assert_eq!(
        seen,
        vec![
            CounterEffect::Toast("count=1".into()),
            CounterEffect::Toast("count=2".into()),
            CounterEffect::Navigate("/done/2".into()),
        ]
    );
}

/// Emits a numbered toast per step for every transition.
struct Burst(usize);

impl Middleware<CounterState, CounterIntent, CounterEffect> for Burst {
    fn post_process(
        &mut self,
        _original: &CounterState,
        _intent: &CounterIntent,
        candidate: CounterState,
    ) -> PostProcess<CounterState, CounterEffect> {
        let effects = (0..self.0)
            .map(|step| CounterEffect::Toast(step.to_string()))
            .collect();
        PostProcess::with_effects(candidate, effects)
    }
}

#[tokio::test]
async fn large_burst_from_one_intent_arrives_complete() {
    let store: CounterStore = Store::builder(CounterState::at(0))
        .middleware(Burst(300))
        .build()
        .unwrap();
    let mut effects = store.effect_stream();

    store.send_intent(CounterIntent::Increment).unwrap();

    for step in 0..300 {
        let effect = within(effects.recv()).await.expect("effect");
        assert_eq!(effect, CounterEffect::Toast(step.to_string()));
    }
}

#[tokio::test]
async fn late_subscriber_gets_no_replay() {
    let store = store_with_effects();
    let mut states = store.state_stream();

    store.send_intent(CounterIntent::Increment).unwrap();
    wait_for_state(&mut states, |s| s.count == 1).await;

    let mut late = store.effect_stream();
    store.send_intent(CounterIntent::Add(10)).unwrap();

    assert_eq!(
        within(late.recv()).await,
        Some(CounterEffect::Toast("count=11".into()))
    );
}

#[tokio::test]
async fn every_subscriber_sees_each_effect_once() {
    let store = store_with_effects();
    let mut first = store.effect_stream();
    let mut second = store.effect_stream();

    store.send_intent(CounterIntent::Add(3)).unwrap();
    store.send_intent(CounterIntent::Reset).unwrap();

    for stream in [&mut first, &mut second] {
        assert_eq!(
            within(stream.recv()).await,
            Some(CounterEffect::Toast("count=3".into()))
        );
        assert_eq!(
            within(stream.recv()).await,
            Some(CounterEffect::Toast("count=0".into()))
        );
    }
}

#[tokio::test]
async fn effects_sent_outside_the_pipeline_reach_subscribers() {
    let store = store_with_effects();
    let mut effects = store.effect_stream();
    let bus = store.effect_bus();

    let producer = tokio::spawn(async move {
        bus.send(CounterEffect::Navigate("/profile".into()));
    });
    producer.await.unwrap();

    store
        .send_effect(CounterEffect::Toast("saved".into()))
        .unwrap();

    assert_eq!(
        within(effects.recv()).await,
        Some(CounterEffect::Navigate("/profile".into()))
    );
    assert_eq!(
        within(effects.recv()).await,
        Some(CounterEffect::Toast("saved".into()))
    );
}

#[tokio::test]
async fn dispose_ends_effect_streams() {
    let store = store_with_effects();
    let mut effects = store.effect_stream();
    store.dispose();
    assert_eq!(within(effects.recv()).await, None);
}
