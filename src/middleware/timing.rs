use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use super::{Middleware, PostProcess};
use crate::mvi::{Effect, Intent, State};

/// Aggregated wall-clock timings for one intent kind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IntentTiming {
    pub count: u64,
    pub total: Duration,
    pub max: Duration,
    pub last: Duration,
}

impl IntentTiming {
    fn record(&mut self, elapsed: Duration) {
        self.count += 1;
        self.total += elapsed;
        self.max = self.max.max(elapsed);
        self.last = elapsed;
    }

    pub fn average(&self) -> Duration {
        if self.count == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total.as_nanos() / u128::from(self.count);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// Read side of a [`TimingMiddleware`], shareable with other threads.
#[derive(Debug, Clone, Default)]
pub struct TimingReport {
    timings: Arc<RwLock<HashMap<String, IntentTiming>>>,
}

impl TimingReport {
    pub fn get(&self, kind: &str) -> Option<IntentTiming> {
        self.timings.read().get(kind).cloned()
    }

    pub fn snapshot(&self) -> HashMap<String, IntentTiming> {
        self.timings.read().clone()
    }

    fn record(&self, kind: String, elapsed: Duration) {
        self.timings.write().entry(kind).or_default().record(elapsed);
    }
}

/// Measures the time between the pre and post phases of each intent.
///
/// The measured span covers every middleware registered after this one in
/// the pre phase, the reducer, and every middleware registered before it in
/// the post phase. Register it first to time the whole transition.
pub struct TimingMiddleware<S, I, E> {
    started: Option<(String, Instant)>,
    report: TimingReport,
    _marker: PhantomData<fn() -> (S, I, E)>,
}

impl<S, I, E> TimingMiddleware<S, I, E> {
    pub fn new() -> Self {
        Self {
            started: None,
            report: TimingReport::default(),
            _marker: PhantomData,
        }
    }

    pub fn report(&self) -> TimingReport {
        self.report.clone()
    }
}

impl<S, I, E> Default for TimingMiddleware<S, I, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, I, E> Middleware<S, I, E> for TimingMiddleware<S, I, E>
where
    S: State,
    I: Intent,
    E: Effect,
{
    fn pre_process(&mut self, _state: &S, intent: I) -> I {
        self.started = Some((intent.kind(), Instant::now()));
        intent
    }

    fn post_process(&mut self, _original: &S, intent: &I, candidate: S) -> PostProcess<S, E> {
        // Bucket by the kind seen on entry; a later middleware may have
        // rewritten the intent.
        let (kind, started_at) = self
            .started
            .take()
            .unwrap_or_else(|| (intent.kind(), Instant::now()));
        let elapsed = started_at.elapsed();
        tracing::trace!(
            intent = %kind,
            elapsed_us = elapsed.as_micros() as u64,
            "intent timed"
        );
        self.report.record(kind, elapsed);
        PostProcess::unchanged(candidate)
    }
}
