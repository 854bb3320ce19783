//! # Subscription registry.
//!
//! Stores live subscriptions for one topic and answers "which
//! subscriptions listen to event name E?" in registration order.
//!
//! ## Rules
//! - One subscription may watch several event names; it keeps a single
//!   identifier across all of them.
//! - `remove` detaches the subscription from every name it watched and
//!   is idempotent.
//! - `matching` is stable by insertion time; dispatch snapshots the
//!   matches under the read lock and drops the guard before running any
//!   handler.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::topic::handler::Subscriber;

/// Unique identifier of a subscription within its topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct Entry {
    events: Vec<String>,
    subscriber: Subscriber,
}

#[derive(Default)]
struct State {
    subs: HashMap<SubscriptionId, Entry>,
    /// Per-event id lists in registration order.
    by_event: HashMap<String, Vec<SubscriptionId>>,
}

/// Registry of live subscriptions for one topic.
pub(crate) struct Registry {
    state: RwLock<State>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }

    /// Registers one subscription bound to `events`.
    ///
    /// Duplicate names in `events` are collapsed; the subscription is
    /// enumerated once per event.
    pub(crate) async fn add(&self, events: Vec<String>, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId::generate();
        let mut state = self.state.write().await;
        let mut watched: Vec<String> = Vec::with_capacity(events.len());
        for event in events {
            if watched.contains(&event) {
                continue;
            }
            state
                .by_event
                .entry(event.clone())
                .or_default()
                .push(id.clone());
            watched.push(event);
        }
        state.subs.insert(
            id.clone(),
            Entry {
                events: watched,
                subscriber,
            },
        );
        id
    }

    /// Removes the subscription from every event name it watched.
    ///
    /// Returns whether anything was removed.
    pub(crate) async fn remove(&self, id: &SubscriptionId) -> bool {
        let mut state = self.state.write().await;
        let Some(entry) = state.subs.remove(id) else {
            return false;
        };
        for event in &entry.events {
            if let Some(ids) = state.by_event.get_mut(event) {
                ids.retain(|other| other != id);
                if ids.is_empty() {
                    state.by_event.remove(event);
                }
            }
        }
        true
    }

    /// Snapshot of the subscriptions listening to `event`, in
    /// registration order.
    pub(crate) async fn matching(&self, event: &str) -> Vec<(SubscriptionId, Subscriber)> {
        let state = self.state.read().await;
        let Some(ids) = state.by_event.get(event) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| {
                state
                    .subs
                    .get(id)
                    .map(|entry| (id.clone(), entry.subscriber.clone()))
            })
            .collect()
    }

    /// Number of subscriptions listening to `event`.
    pub(crate) async fn subscription_count(&self, event: &str) -> usize {
        let state = self.state.read().await;
        state.by_event.get(event).map(Vec::len).unwrap_or(0)
    }

    /// Total number of live subscriptions.
    pub(crate) async fn len(&self) -> usize {
        self.state.read().await.subs.len()
    }

    pub(crate) async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::handler::HandlerFn;
    use crate::{Meta, SubscriberError};
    use serde_json::{json, Value};

    fn plain() -> Subscriber {
        Subscriber::Plain(HandlerFn::arc(|_p: Value, _m: Meta| async move {
            Ok::<_, SubscriberError>(json!(null))
        }))
    }

    #[tokio::test]
    async fn matching_preserves_registration_order() {
        let reg = Registry::new();
        let a = reg.add(vec!["info".into()], plain()).await;
        let b = reg.add(vec!["info".into(), "warn".into()], plain()).await;
        let c = reg.add(vec!["info".into()], plain()).await;

        let ids: Vec<_> = reg
            .matching("info")
            .await
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec![a, b.clone(), c]);

        let warn: Vec<_> = reg
            .matching("warn")
            .await
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(warn, vec![b]);
    }

    #[tokio::test]
    async fn remove_detaches_every_event_and_is_idempotent() {
        let reg = Registry::new();
        let id = reg.add(vec!["a".into(), "b".into()], plain()).await;

        assert!(reg.remove(&id).await);
        assert!(!reg.remove(&id).await);
        assert!(reg.matching("a").await.is_empty());
        assert!(reg.matching("b").await.is_empty());
        assert!(reg.is_empty().await);
    }

    #[tokio::test]
    async fn duplicate_event_names_collapse() {
        let reg = Registry::new();
        let id = reg.add(vec!["info".into(), "info".into()], plain()).await;

        assert_eq!(reg.subscription_count("info").await, 1);
        assert!(reg.remove(&id).await);
        assert_eq!(reg.subscription_count("info").await, 0);
    }

    #[tokio::test]
    async fn unknown_event_matches_nothing() {
        let reg = Registry::new();
        reg.add(vec!["info".into()], plain()).await;
        assert!(reg.matching("debug").await.is_empty());
        assert_eq!(reg.subscription_count("debug").await, 0);
    }
}
