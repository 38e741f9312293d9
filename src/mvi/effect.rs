//! Base trait for one-shot effects in MVI architecture.

use std::fmt::Debug;

/// Marker trait for effect objects.
///
/// Effects are side instructions to the outside world (show a toast,
/// navigate). They are not part of state, carry no acknowledgment and are
/// never replayed: an observer that is not subscribed when an effect is
/// emitted never sees it.
pub trait Effect: Clone + Debug + Send + Sync + 'static {}
