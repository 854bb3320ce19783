//! # Per-publication metadata bundle.
//!
//! One [`Meta`] is built per dispatch call and shared by every subscriber
//! of that call: a single `id`, a single `time`. Producer overrides are
//! merged in at construction; the bus-authoritative keys (`id`, `time`,
//! `topic`, `event`) silently win. Per-recipient copies add the
//! `subscription_id` without mutating the shared bundle.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::topic::SubscriptionId;

/// Keys the producer cannot override.
const RESERVED_KEYS: [&str; 4] = ["id", "time", "topic", "event"];

/// Immutable metadata bundle threading through every delivery discipline.
///
/// The copy returned to the producer has `subscription_id: None`; the copy
/// passed to each subscriber identifies the receiving subscription.
#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    /// Unique id of this publication attempt, stable across all
    /// subscribers of one call.
    pub id: String,
    /// Publication timestamp, milliseconds since the Unix epoch.
    pub time: u64,
    /// Owning topic name.
    pub topic: String,
    /// Event name.
    pub event: String,
    /// Receiving subscription; set only on per-subscriber copies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<SubscriptionId>,
    /// Producer-supplied overrides that survived the merge.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Meta {
    /// Builds the bundle for one publication attempt.
    ///
    /// Reads the wall clock, generates a fresh id, and merges `overrides`
    /// under the rule that reserved keys cannot be overwritten.
    pub(crate) fn build(topic: &str, event: &str, overrides: Option<Map<String, Value>>) -> Self {
        let mut extra = overrides.unwrap_or_default();
        for key in RESERVED_KEYS {
            extra.remove(key);
        }
        Self {
            id: Uuid::now_v7().to_string(),
            time: epoch_millis(),
            topic: topic.to_string(),
            event: event.to_string(),
            subscription_id: None,
            extra,
        }
    }

    /// Returns the per-recipient copy for `subscription`.
    pub(crate) fn for_subscription(&self, subscription: &SubscriptionId) -> Self {
        let mut meta = self.clone();
        meta.subscription_id = Some(subscription.clone());
        meta
    }

    /// Looks up a merged override by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merges_overrides_under_reserved_keys() {
        let mut overrides = Map::new();
        overrides.insert("id".into(), json!("forged"));
        overrides.insert("time".into(), json!(0));
        overrides.insert("topic".into(), json!("forged"));
        overrides.insert("event".into(), json!("forged"));
        overrides.insert("trace".into(), json!("abc-123"));

        let meta = Meta::build("logger", "info", Some(overrides));

        assert_ne!(meta.id, "forged");
        assert_ne!(meta.time, 0);
        assert_eq!(meta.topic, "logger");
        assert_eq!(meta.event, "info");
        assert_eq!(meta.get("trace"), Some(&json!("abc-123")));
        assert_eq!(meta.get("id"), None);
    }

    #[test]
    fn per_subscription_copy_leaves_shared_bundle_untouched() {
        let meta = Meta::build("logger", "info", None);
        let id = SubscriptionId::generate();

        let copy = meta.for_subscription(&id);

        assert_eq!(copy.subscription_id.as_ref(), Some(&id));
        assert!(meta.subscription_id.is_none());
        assert_eq!(copy.id, meta.id);
        assert_eq!(copy.time, meta.time);
    }

    #[test]
    fn fresh_id_per_publication() {
        let a = Meta::build("logger", "info", None);
        let b = Meta::build("logger", "info", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn serializes_without_absent_subscription_id() {
        let meta = Meta::build("logger", "info", None);
        let v = serde_json::to_value(&meta).unwrap();
        assert!(v.get("subscriptionId").is_none());
        assert!(v.get("subscription_id").is_none());
        assert_eq!(v["topic"], json!("logger"));
    }
}
