use std::sync::Arc;

use parking_lot::Mutex;

use super::{PersistenceError, PersistencePort};

/// In-memory persistence port.
///
/// Clones share the same slot, so a component can hand one clone to the
/// runtime and keep another to inspect or seed the stored state. Failures
/// can be switched on to exercise error paths.
pub struct InMemoryPersistence<S> {
    inner: Arc<Mutex<MemoryInner<S>>>,
}

struct MemoryInner<S> {
    stored: Option<S>,
    writes: u64,
    fail_writes: bool,
    fail_restore: bool,
}

impl<S> Clone for InMemoryPersistence<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Clone> InMemoryPersistence<S> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryInner {
                stored: None,
                writes: 0,
                fail_writes: false,
                fail_restore: false,
            })),
        }
    }

    /// Port pre-seeded with a previously saved state.
    pub fn with_state(state: S) -> Self {
        let port = Self::new();
        port.inner.lock().stored = Some(state);
        port
    }

    pub fn stored(&self) -> Option<S> {
        self.inner.lock().stored.clone()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> u64 {
        self.inner.lock().writes
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.lock().fail_writes = fail;
    }

    pub fn set_fail_restore(&self, fail: bool) {
        self.inner.lock().fail_restore = fail;
    }
}

impl<S: Clone> Default for InMemoryPersistence<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> PersistencePort<S> for InMemoryPersistence<S>
where
    S: Clone + Send + 'static,
{
    fn persist(&self, state: &S) -> Result<(), PersistenceError> {
        let mut inner = self.inner.lock();
        if inner.fail_writes {
            return Err(PersistenceError::Backend("write rejected".to_string()));
        }
        inner.stored = Some(state.clone());
        inner.writes += 1;
        Ok(())
    }

    fn restore(&self) -> Result<Option<S>, PersistenceError> {
        let inner = self.inner.lock();
        if inner.fail_restore {
            return Err(PersistenceError::Unavailable);
        }
        Ok(inner.stored.clone())
    }
}
