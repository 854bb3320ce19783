//! # Wildcard emitter — dispatch by hierarchical name.
//!
//! [`WildcardEmitter`] is an in-process emitter whose dispatch key is the
//! emitted name parsed as a delimiter-separated path. Listeners register
//! on exact names or on patterns with a terminal wildcard segment.
//!
//! ## Rules
//! - Matched listeners run in registration order; there is no
//!   stratification by pattern specificity.
//! - Wildcard matches receive a prepended `{event: name}` object; exact
//!   matches receive the arguments unchanged.
//! - If nothing matched, listeners registered on the configured
//!   no-subscriptions event get one synthetic dispatch with the
//!   `{event: name}` object prepended. The synthetic dispatch never
//!   recurses.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::emitter::config::EmitterConfig;
use crate::emitter::pattern::{match_pattern, MatchKind};

/// Shared handle to a registered listener.
pub type ListenerRef = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Identifier of one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct ListenerEntry {
    id: ListenerId,
    pattern: String,
    listener: ListenerRef,
}

/// In-process emitter dispatching by hierarchical event name.
///
/// ## Example
/// ```
/// use evbus::{EmitterConfig, WildcardEmitter};
/// use serde_json::json;
///
/// let emitter = WildcardEmitter::new(EmitterConfig::default());
/// emitter.on("metrics_%", |args| {
///     // args[0] is {"event": "<emitted name>"}
///     assert_eq!(args[0]["event"], json!("metrics_cpu"));
/// });
///
/// let invoked = emitter.emit("metrics_cpu", &[json!(42)]);
/// assert_eq!(invoked, 1);
/// ```
pub struct WildcardEmitter {
    config: EmitterConfig,
    next_id: AtomicU64,
    listeners: Mutex<Vec<ListenerEntry>>,
}

impl WildcardEmitter {
    /// Creates an emitter from its configuration.
    #[must_use]
    pub fn new(config: EmitterConfig) -> Self {
        Self {
            config,
            next_id: AtomicU64::new(0),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Registers a listener on `pattern`.
    ///
    /// The pattern is an exact name, the bare wildcard token, or a path
    /// whose terminal segment is the wildcard token.
    pub fn on(
        &self,
        pattern: impl Into<String>,
        listener: impl Fn(&[Value]) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push(ListenerEntry {
            id,
            pattern: pattern.into(),
            listener: Arc::new(listener),
        });
        id
    }

    /// Removes one listener; idempotent, returns whether it was present.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|entry| entry.id != id);
        listeners.len() != before
    }

    /// Number of listeners registered on exactly `pattern`.
    pub fn listener_count(&self, pattern: &str) -> usize {
        self.listeners
            .lock()
            .iter()
            .filter(|entry| entry.pattern == pattern)
            .count()
    }

    /// Dispatches `args` to every listener whose pattern matches `name`.
    ///
    /// Returns the number of listeners invoked (including a synthetic
    /// no-subscriptions dispatch, if one happened).
    pub fn emit(&self, name: &str, args: &[Value]) -> usize {
        // Snapshot under the lock, invoke after dropping it, so a
        // listener may register or remove listeners for future emits.
        let matched: Vec<(MatchKind, ListenerRef)> = {
            let listeners = self.listeners.lock();
            listeners
                .iter()
                .filter_map(|entry| {
                    match_pattern(
                        &entry.pattern,
                        name,
                        &self.config.delimiter,
                        &self.config.wildcard,
                    )
                    .map(|kind| (kind, Arc::clone(&entry.listener)))
                })
                .collect()
        };

        if matched.is_empty() {
            return self.emit_unmatched(name, args);
        }

        let mut prefixed = Vec::with_capacity(args.len() + 1);
        prefixed.push(json!({ "event": name }));
        prefixed.extend_from_slice(args);

        for (kind, listener) in &matched {
            match kind {
                MatchKind::Exact => listener(args),
                MatchKind::Wildcard => listener(&prefixed),
            }
        }
        matched.len()
    }

    /// Synthesizes the no-subscriptions dispatch. Direct lookup, not a
    /// recursive emit.
    fn emit_unmatched(&self, name: &str, args: &[Value]) -> usize {
        let fallbacks: Vec<ListenerRef> = {
            let listeners = self.listeners.lock();
            listeners
                .iter()
                .filter(|entry| entry.pattern == self.config.no_subscriptions_event)
                .map(|entry| Arc::clone(&entry.listener))
                .collect()
        };
        if fallbacks.is_empty() {
            return 0;
        }
        let mut prefixed = Vec::with_capacity(args.len() + 1);
        prefixed.push(json!({ "event": name }));
        prefixed.extend_from_slice(args);
        for listener in &fallbacks {
            listener(&prefixed);
        }
        fallbacks.len()
    }
}

impl Default for WildcardEmitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}
