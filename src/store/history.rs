//! Current state plus a bounded ring of past transitions.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::error::RuntimeError;
use crate::mvi::{Intent, State};

/// A committed transition: the intent that was reduced and the state it
/// produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<S, I> {
    pub state: S,
    pub intent: I,
    /// Milliseconds since the Unix epoch at commit time.
    pub timestamp: u64,
}

/// Holds the one current state and the last `capacity` snapshots.
///
/// Commits, time travel and new subscriptions all go through the same lock,
/// so a subscriber receives the current state and then every later commit
/// exactly once.
pub struct SnapshotStore<S, I> {
    inner: RwLock<SnapshotInner<S, I>>,
}

struct SnapshotInner<S, I> {
    current: S,
    history: VecDeque<Snapshot<S, I>>,
    capacity: usize,
    states: Option<broadcast::Sender<S>>,
}

impl<S, I> SnapshotStore<S, I>
where
    S: State,
    I: Intent,
{
    pub fn new(initial: S, capacity: usize, channel_capacity: usize) -> Self {
        let (states, _) = broadcast::channel(channel_capacity);
        Self {
            inner: RwLock::new(SnapshotInner {
                current: initial,
                history: VecDeque::with_capacity(capacity),
                capacity,
                states: Some(states),
            }),
        }
    }

    pub fn current(&self) -> S {
        self.inner.read().current.clone()
    }

    /// Publish a new current state and record the transition.
    ///
    /// The oldest snapshot is evicted once the history is full.
    pub fn commit(&self, state: S, intent: I) {
        let mut inner = self.inner.write();
        if inner.history.len() == inner.capacity {
            inner.history.pop_front();
        }
        inner.history.push_back(Snapshot {
            state: state.clone(),
            intent,
            timestamp: now_millis(),
        });
        inner.current = state.clone();
        publish(&inner.states, state);
    }

    /// Overwrite the current state with `history[index].state`.
    ///
    /// The history itself is left untouched.
    pub fn travel(&self, index: usize) -> Result<S, RuntimeError> {
        let mut inner = self.inner.write();
        let len = inner.history.len();
        let state = inner
            .history
            .get(index)
            .map(|snapshot| snapshot.state.clone())
            .ok_or(RuntimeError::HistoryIndexOutOfRange { index, len })?;
        inner.current = state.clone();
        publish(&inner.states, state.clone());
        Ok(state)
    }

    pub fn history(&self) -> Vec<Snapshot<S, I>> {
        self.inner.read().history.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current state together with a receiver for every later publish.
    pub fn subscribe(&self) -> (S, broadcast::Receiver<S>) {
        let inner = self.inner.read();
        let receiver = match &inner.states {
            Some(sender) => sender.subscribe(),
            None => closed_receiver(),
        };
        (inner.current.clone(), receiver)
    }

    /// End every state subscription. The current state stays readable.
    pub fn close(&self) {
        self.inner.write().states = None;
    }
}

fn publish<S: State>(states: &Option<broadcast::Sender<S>>, state: S) {
    if let Some(sender) = states {
        // Err only means nobody is subscribed right now.
        let _ = sender.send(state);
    }
}

pub(crate) fn closed_receiver<T: Clone>() -> broadcast::Receiver<T> {
    let (sender, receiver) = broadcast::channel(1);
    drop(sender);
    receiver
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
