use std::marker::PhantomData;

use tracing::Level;

use super::{Middleware, PostProcess};
use crate::mvi::{Effect, Intent, State};

/// Diagnostic-only middleware: logs every intent and the resulting state.
///
/// Never changes the intent or the state and never emits effects.
pub struct LoggingMiddleware<S, I, E> {
    level: Level,
    _marker: PhantomData<fn() -> (S, I, E)>,
}

impl<S, I, E> LoggingMiddleware<S, I, E> {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            _marker: PhantomData,
        }
    }
}

impl<S, I, E> Default for LoggingMiddleware<S, I, E> {
    fn default() -> Self {
        Self::new(Level::DEBUG)
    }
}

macro_rules! log_at {
    ($level:expr, $($arg:tt)+) => {
        match $level {
            Level::ERROR => tracing::error!($($arg)+),
            Level::WARN => tracing::warn!($($arg)+),
            Level::INFO => tracing::info!($($arg)+),
            Level::DEBUG => tracing::debug!($($arg)+),
            _ => tracing::trace!($($arg)+),
        }
    };
}

impl<S, I, E> Middleware<S, I, E> for LoggingMiddleware<S, I, E>
where
    S: State,
    I: Intent,
    E: Effect,
{
    fn pre_process(&mut self, _state: &S, intent: I) -> I {
        log_at!(self.level, intent = %intent.kind(), payload = ?intent, "intent received");
        intent
    }

    fn post_process(&mut self, original: &S, intent: &I, candidate: S) -> PostProcess<S, E> {
        let changed = *original != candidate;
        log_at!(
            self.level,
            intent = %intent.kind(),
            changed,
            state = ?candidate,
            "intent reduced"
        );
        PostProcess::unchanged(candidate)
    }
}
