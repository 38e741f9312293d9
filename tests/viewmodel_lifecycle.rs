mod common;

use std::time::Duration;

use common::*;
use mvi_runtime::{RuntimeError, Store, ViewModel};
use tokio::sync::oneshot;

type CounterViewModel = ViewModel<CounterReducer, CounterEffect>;

fn view_model() -> CounterViewModel {
    let store = Store::builder(CounterState::at(0))
        .middleware(ToastMiddleware)
        .build()
        .expect("store");
    ViewModel::new(store, |err: &anyhow::Error| {
        CounterEffect::Error(err.to_string())
    })
}

async fn explode() -> anyhow::Result<()> {
    panic!("boom")
}

#[tokio::test]
async fn handle_intent_drives_the_store() {
    let vm = view_model();
    let mut states = vm.state_stream();
    let mut effects = vm.effect_stream();

    vm.handle_intent(CounterIntent::Add(4)).unwrap();

    assert_eq!(next_state(&mut states).await, CounterState::at(0));
    assert_eq!(next_state(&mut states).await, CounterState::at(4));
    assert_eq!(
        within(effects.recv()).await,
        Some(CounterEffect::Toast("count=4".into()))
    );
    assert_eq!(vm.current_state(), CounterState::at(4));
    assert_eq!(vm.state_history().len(), 1);
}

#[tokio::test]
async fn launched_error_becomes_an_effect() {
    let vm = view_model();
    let mut effects = vm.effect_stream();

    let task = vm
        .launch_with_error_handling(async { Err(anyhow::anyhow!("network unreachable")) })
        .unwrap();
    within(task).await.unwrap();

    assert_eq!(
        within(effects.recv()).await,
        Some(CounterEffect::Error("network unreachable".into()))
    );
}

#[tokio::test]
async fn launched_panic_becomes_an_effect() {
    let vm = view_model();
    let mut effects = vm.effect_stream();

    let task = vm
        .launch_with_error_handling(explode())
        .unwrap();
    within(task).await.unwrap();

    assert_eq!(
        within(effects.recv()).await,
        Some(CounterEffect::Error("launched work panicked".into()))
    );
}

#[tokio::test]
async fn launched_success_emits_nothing_extra() {
    let vm = view_model();
    let mut effects = vm.effect_stream();
    let sender = vm.store().intent_sender();

    let task = vm
        .launch_with_error_handling(async move {
            sender.send(CounterIntent::Increment)?;
            Ok::<(), anyhow::Error>(())
        })
        .unwrap();
    within(task).await.unwrap();

    assert_eq!(
        within(effects.recv()).await,
        Some(CounterEffect::Toast("count=1".into()))
    );
}

#[tokio::test]
async fn dispose_cancels_launched_work() {
    let vm = view_model();
    let (alive_tx, alive_rx) = oneshot::channel::<()>();

    let task = vm
        .launch_with_error_handling(async move {
            let _alive = alive_tx;
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        })
        .unwrap();

    tokio::task::yield_now().await;
    vm.dispose();

    within(task).await.unwrap();
    // The sender is only dropped, never used, so the receiver resolving
    // proves the work future was torn down.
    assert!(within(alive_rx).await.is_err());
}

#[tokio::test]
async fn operations_after_dispose_fail_fast() {
    let vm = view_model();
    vm.dispose();
    vm.dispose();

    assert!(vm.is_disposed());
    assert!(matches!(
        vm.handle_intent(CounterIntent::Increment),
        Err(RuntimeError::Disposed)
    ));
    assert!(matches!(
        vm.launch_with_error_handling(async { Ok(()) }),
        Err(RuntimeError::Disposed)
    ));
    assert!(matches!(
        vm.send_effect(CounterEffect::Toast("x".into())),
        Err(RuntimeError::Disposed)
    ));
    assert_eq!(vm.current_state(), CounterState::at(0));
}

#[tokio::test]
async fn drop_disposes_the_runtime() {
    let vm = view_model();
    let sender = vm.store().intent_sender();
    drop(vm);
    assert!(matches!(
        sender.send(CounterIntent::Increment),
        Err(RuntimeError::Disposed)
    ));
}
