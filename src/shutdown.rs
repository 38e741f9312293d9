//! Teardown signalling shared by the processing loop and launched tasks.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecyclePhase {
    Running = 0,
    Disposing = 1,
    Disposed = 2,
    /// The processing loop died without being disposed.
    Failed = 3,
}

pub struct ShutdownCoordinator {
    shutdown: Arc<AtomicBool>,
    phase: Arc<AtomicU8>,
    notify: Arc<Notify>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(AtomicBool::new(false)),
            phase: Arc::new(AtomicU8::new(LifecyclePhase::Running as u8)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Signal teardown start. Returns `true` only for the first caller.
    pub fn signal(&self) -> bool {
        if !self.shutdown.swap(true, Ordering::SeqCst) {
            tracing::debug!("runtime teardown initiated");
            self.notify.notify_waiters();
            return true;
        }
        false
    }

    /// Check if teardown is in progress or finished
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Get current phase
    pub fn phase(&self) -> LifecyclePhase {
        phase_from_u8(self.phase.load(Ordering::SeqCst))
    }

    /// Advance to next phase
    pub fn advance(&self, phase: LifecyclePhase) {
        self.phase.store(phase as u8, Ordering::SeqCst);
        tracing::debug!(phase = ?phase, "runtime lifecycle phase");
    }

    /// Create a handle for sharing
    pub fn handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            shutdown: Arc::clone(&self.shutdown),
            phase: Arc::clone(&self.phase),
            notify: Arc::clone(&self.notify),
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

fn phase_from_u8(raw: u8) -> LifecyclePhase {
    match raw {
        0 => LifecyclePhase::Running,
        1 => LifecyclePhase::Disposing,
        2 => LifecyclePhase::Disposed,
        _ => LifecyclePhase::Failed,
    }
}

/// Lightweight handle for checking and awaiting teardown
#[derive(Clone)]
pub struct ShutdownHandle {
    shutdown: Arc<AtomicBool>,
    phase: Arc<AtomicU8>,
    notify: Arc<Notify>,
}

impl ShutdownHandle {
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> LifecyclePhase {
        phase_from_u8(self.phase.load(Ordering::SeqCst))
    }

    /// Record that the processing loop died on its own.
    ///
    /// Does nothing once teardown has started, so a loop cancelled by
    /// `dispose` is never reported as failed.
    pub fn mark_failed(&self) {
        let _ = self.phase.compare_exchange(
            LifecyclePhase::Running as u8,
            LifecyclePhase::Failed as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }

    pub async fn wait(&self) {
        // Subscribe to Notify BEFORE checking the flag: signal() could fire
        // between the check and the await, and notify_waiters() would have no
        // subscribers, losing the notification.
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_shutting_down() {
            return;
        }
        notified.await;
    }
}
