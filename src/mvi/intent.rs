//! Base trait for intents (user/system actions) in MVI architecture.

use std::fmt::Debug;

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (button clicks, key presses)
/// - System events (API responses, timers)
/// - Navigation events
///
/// Intents are processed by reducers to produce new states. Each intent is
/// consumed exactly once by the processing loop.
pub trait Intent: Clone + Debug + Send + Sync + 'static {
    /// Short name used for log fields and timing buckets.
    ///
    /// Defaults to the variant name of the `Debug` rendering, so
    /// `Increment { by: 2 }` and `Increment { by: 5 }` share the bucket
    /// `"Increment"`.
    fn kind(&self) -> String {
        variant_name(&format!("{:?}", self)).to_string()
    }
}

/// Strip the payload from a `Debug` rendering, keeping the leading name.
pub(crate) fn variant_name(rendered: &str) -> &str {
    let end = rendered
        .find(|c: char| c == '(' || c == '{' || c.is_whitespace())
        .unwrap_or(rendered.len());
    &rendered[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    #[derive(Debug, Clone)]
    enum Sample {
        Unit,
        Tuple(u8),
        Named { value: u8 },
    }

    impl Intent for Sample {}

    #[test]
    fn kind_strips_payload() {
        assert_eq!(Sample::Unit.kind(), "Unit");
        assert_eq!(Sample::Tuple(3).kind(), "Tuple");
        assert_eq!(Sample::Named { value: 1 }.kind(), "Named");
    }

    #[test]
    fn variant_name_handles_empty() {
        assert_eq!(variant_name(""), "");
    }
}
