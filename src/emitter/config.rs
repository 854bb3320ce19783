//! # Wildcard emitter configuration.
//!
//! # Example
//! ```
//! use evbus::EmitterConfig;
//!
//! let cfg = EmitterConfig::default();
//! assert_eq!(cfg.delimiter, "_");
//! assert_eq!(cfg.wildcard, "%");
//! assert_eq!(cfg.no_subscriptions_event, "");
//! ```

/// Configuration for a [`WildcardEmitter`](crate::WildcardEmitter).
#[derive(Clone, Debug)]
pub struct EmitterConfig {
    /// Segment separator for hierarchical event names.
    pub delimiter: String,
    /// Terminal-segment wildcard token.
    pub wildcard: String,
    /// Event name synthesized when nothing matched an emit.
    pub no_subscriptions_event: String,
}

impl Default for EmitterConfig {
    /// Provides the default configuration:
    /// - `delimiter = "_"`
    /// - `wildcard = "%"`
    /// - `no_subscriptions_event = ""`
    fn default() -> Self {
        Self {
            delimiter: "_".to_string(),
            wildcard: "%".to_string(),
            no_subscriptions_event: String::new(),
        }
    }
}

impl EmitterConfig {
    /// Overrides the segment separator.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Overrides the wildcard token.
    #[must_use]
    pub fn with_wildcard(mut self, wildcard: impl Into<String>) -> Self {
        self.wildcard = wildcard.into();
        self
    }

    /// Overrides the no-subscriptions event name.
    #[must_use]
    pub fn with_no_subscriptions_event(mut self, event: impl Into<String>) -> Self {
        self.no_subscriptions_event = event.into();
        self
    }
}
