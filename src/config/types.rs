use serde::{Deserialize, Serialize};

/// Tuning knobs for a single runtime instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Maximum number of snapshots kept for time travel (default: 100).
    #[serde(default = "default_max_history_size")]
    pub max_history_size: usize,
    /// Committed states a slow state subscriber may lag behind (default: 64).
    #[serde(default = "default_channel_capacity")]
    pub state_channel_capacity: usize,
    /// Write every committed state to the persistence port (default: true).
    #[serde(default = "default_true")]
    pub persist_transitions: bool,
    /// Ask the persistence port for a prior state at startup (default: true).
    #[serde(default = "default_true")]
    pub restore_on_start: bool,
}

fn default_max_history_size() -> usize {
    100
}

fn default_channel_capacity() -> usize {
    64
}

fn default_true() -> bool {
    true
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_history_size: default_max_history_size(),
            state_channel_capacity: default_channel_capacity(),
            persist_transitions: true,
            restore_on_start: true,
        }
    }
}

impl RuntimeConfig {
    pub fn with_max_history_size(mut self, size: usize) -> Self {
        self.max_history_size = size;
        self
    }
}
