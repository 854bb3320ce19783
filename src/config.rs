//! # Topic configuration.
//!
//! [`TopicConfig`] names the topic and sets the default acknowledgment
//! window used by `deliver`.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use evbus::TopicConfig;
//!
//! let cfg = TopicConfig::new("logger").with_timeout(Duration::from_millis(50));
//!
//! assert_eq!(cfg.topic, "logger");
//! assert_eq!(cfg.timeout, Duration::from_millis(50));
//! ```

use std::time::Duration;

/// Default acknowledgment window for `deliver` (3000 ms).
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_millis(3000);

/// Configuration for a [`Topic`](crate::Topic).
///
/// Controls the topic name and the per-subscription acknowledgment window.
#[derive(Clone, Debug)]
pub struct TopicConfig {
    /// Topic name, stamped into every metadata bundle.
    pub topic: String,
    /// Acknowledgment window for `deliver`. Must be positive.
    pub timeout: Duration,
}

impl TopicConfig {
    /// Creates a configuration with the default acknowledgment window.
    #[must_use]
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            timeout: DEFAULT_ACK_TIMEOUT,
        }
    }

    /// Overrides the acknowledgment window.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
