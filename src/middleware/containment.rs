use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::{Middleware, PostProcess};
use crate::mvi::{Effect, Intent, State};

type PostBody<S, I> = Box<dyn FnMut(&S, &I, S) -> anyhow::Result<S> + Send>;
type ErrorEffect<E> = Box<dyn Fn(&anyhow::Error) -> E + Send>;

/// Runs a fallible post-processing step and contains its failures.
///
/// When the wrapped body returns `Err` or panics, the candidate state is
/// discarded, the state reverts to the pre-transition value, and the
/// caller-supplied error effect is emitted instead.
pub struct ErrorContainmentMiddleware<S, I, E> {
    body: PostBody<S, I>,
    on_error: ErrorEffect<E>,
}

impl<S, I, E> ErrorContainmentMiddleware<S, I, E>
where
    S: State,
    I: Intent,
    E: Effect,
{
    pub fn new<B, F>(body: B, on_error: F) -> Self
    where
        B: FnMut(&S, &I, S) -> anyhow::Result<S> + Send + 'static,
        F: Fn(&anyhow::Error) -> E + Send + 'static,
    {
        Self {
            body: Box::new(body),
            on_error: Box::new(on_error),
        }
    }
}

impl<S, I, E> Middleware<S, I, E> for ErrorContainmentMiddleware<S, I, E>
where
    S: State,
    I: Intent,
    E: Effect,
{
    fn post_process(&mut self, original: &S, intent: &I, candidate: S) -> PostProcess<S, E> {
        let body = &mut self.body;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(original, intent, candidate)));

        let error = match outcome {
            Ok(Ok(state)) => return PostProcess::unchanged(state),
            Ok(Err(err)) => err,
            Err(payload) => anyhow::anyhow!("post-process panicked: {}", panic_message(&*payload)),
        };

        tracing::warn!(
            intent = %intent.kind(),
            error = %error,
            "post-process failed, reverting transition"
        );
        PostProcess::with_effects(original.clone(), vec![(self.on_error)(&error)])
    }
}

fn panic_message<'a>(payload: &'a (dyn Any + Send + 'static)) -> &'a str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
