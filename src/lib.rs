//! A reactive state/effect runtime for view-model layers.
//!
//! A [`Store`] owns one immutable state, serializes every transition driven
//! by intents through an ordered [middleware](middleware) pipeline and a
//! pure [`Reducer`], publishes committed states to replay-latest
//! subscribers, emits one-shot effects on a hot bus, keeps a bounded
//! snapshot history for time travel, and writes every committed state to an
//! abstract [`PersistencePort`].
//!
//! # Example
//!
//! ```ignore
//! use mvi_runtime::{Effect, Intent, Reducer, State, Store};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Counter { count: i64 }
//! impl State for Counter {}
//!
//! #[derive(Debug, Clone)]
//! enum CounterIntent { Increment }
//! impl Intent for CounterIntent {}
//!
//! #[derive(Debug, Clone)]
//! enum CounterEffect {}
//! impl Effect for CounterEffect {}
//!
//! struct CounterReducer;
//! impl Reducer for CounterReducer {
//!     type State = Counter;
//!     type Intent = CounterIntent;
//!     fn reduce(state: Counter, _intent: CounterIntent) -> Counter {
//!         Counter { count: state.count + 1 }
//!     }
//! }
//!
//! let store = Store::<CounterReducer, CounterEffect>::builder(Counter { count: 0 }).build()?;
//! let mut states = store.state_stream();
//! store.send_intent(CounterIntent::Increment)?;
//! assert_eq!(states.recv().await, Some(Counter { count: 0 }));
//! assert_eq!(states.recv().await, Some(Counter { count: 1 }));
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod mvi;
pub mod persistence;
pub mod shutdown;
pub mod store;
pub mod telemetry;
pub mod viewmodel;

pub use config::{ConfigError, RuntimeConfig};
pub use error::RuntimeError;
pub use middleware::{
    ErrorContainmentMiddleware, LoggingMiddleware, Middleware, MiddlewareChain, PostProcess,
    TimingMiddleware, TimingReport,
};
pub use mvi::{Effect, Intent, Reducer, State};
pub use persistence::{InMemoryPersistence, NoPersistence, PersistenceError, PersistencePort};
pub use shutdown::LifecyclePhase;
pub use store::{EffectStream, Snapshot, StateStream, Store, StoreBuilder};
pub use viewmodel::{ErrorEffectFactory, ViewModel};
