//! Model-View-Intent (MVI) architecture primitives.
//!
//! This module provides the base traits the runtime is generic over.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Middleware(pre) ──→ Reducer ──→ Middleware(post) ──→ State
//!    ↑                                              │               │
//!    │                                              └──→ Effect     │
//!    └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **State**: Immutable snapshot replaced wholesale on every transition
//! - **Intent**: User actions or system events
//! - **Reducer**: Pure function that transforms state based on intents
//! - **Effect**: One-shot outward instruction, not part of state

mod effect;
mod intent;
mod reducer;
mod state;

pub use effect::Effect;
pub use intent::Intent;
pub use reducer::Reducer;
pub use state::State;
