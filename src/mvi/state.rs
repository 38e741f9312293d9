//! Base trait for runtime state in MVI architecture.

use std::fmt::Debug;

/// Marker trait for state objects owned by a [`Store`](crate::store::Store).
///
/// States should be:
/// - Immutable (Clone to create new states, never mutated in place)
/// - Self-contained (all data an observer needs)
/// - Comparable (PartialEq for detecting changes)
///
/// `Sync` is required because committed states are shared with every
/// subscriber of the state stream.
pub trait State: Clone + PartialEq + Debug + Send + Sync + 'static {}
