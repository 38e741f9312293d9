//! Abstract save/restore of the whole state object.
//!
//! The runtime restores once at build time and writes after every committed
//! transition. Writes happen on a background writer so a slow backend never
//! stalls the processing loop; failures are logged and reported to an
//! optional callback, never propagated into the state pipeline.

mod memory;
mod writer;

pub use memory::InMemoryPersistence;
pub(crate) use writer::PersistenceWriter;

use std::sync::Arc;

use thiserror::Error;

/// Errors a persistence port may report.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Persistence I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Persistence backend error: {0}")]
    Backend(String),

    #[error("Persistence backend unavailable")]
    Unavailable,
}

/// Callback invoked on the writer thread for every failed write.
pub type PersistFailureCallback = Arc<dyn Fn(&PersistenceError) + Send + Sync>;

/// Port through which the runtime saves and restores its state.
///
/// Implementations own durability concerns such as retries. Both methods
/// are called off the processing loop or before it starts, so they may
/// block.
pub trait PersistencePort<S>: Send + Sync + 'static {
    fn persist(&self, state: &S) -> Result<(), PersistenceError>;

    fn restore(&self) -> Result<Option<S>, PersistenceError>;
}

impl<S, P> PersistencePort<S> for Arc<P>
where
    P: PersistencePort<S> + ?Sized,
{
    fn persist(&self, state: &S) -> Result<(), PersistenceError> {
        (**self).persist(state)
    }

    fn restore(&self) -> Result<Option<S>, PersistenceError> {
        (**self).restore()
    }
}

/// Port that stores nothing and never restores.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersistence;

impl<S> PersistencePort<S> for NoPersistence {
    fn persist(&self, _state: &S) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn restore(&self) -> Result<Option<S>, PersistenceError> {
        Ok(None)
    }
}
