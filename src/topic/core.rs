//! # Topic dispatcher — the four delivery disciplines.
//!
//! [`Topic`] owns a subscription registry and dispatches events under
//! four synchronization contracts:
//!
//! | Discipline | Producer waits for | Failure surface |
//! |------------|--------------------|-----------------|
//! | `emit`     | scheduling only    | swallowed (stderr side channel) |
//! | `publish`  | all completions    | per-subscription `results` |
//! | `execute`  | all completions    | `BusError::ExecuteFailed` if any rejected |
//! | `deliver`  | all acknowledgments| per-subscription `results`, timeout per sub |
//!
//! ## Rules
//! - The matching snapshot is frozen before any handler runs; handlers
//!   subscribing or unsubscribing during dispatch affect future calls only.
//! - One metadata bundle per call (one `id`, one `time`), shared by all
//!   subscribers; each recipient's copy carries its `subscription_id`.
//! - `results` is in registration order regardless of completion order.
//! - Handler panics are caught and isolated; they never cross into the
//!   producer.
//!
//! ## Dispatch flow
//! ```text
//!    publish(event, payload)
//!        │
//!        ├── registry.matching(event)      (snapshot, read lock dropped)
//!        ├── Meta::build(topic, event)     (one bundle per call)
//!        ├────────────────► handler S1 ──┐
//!        ├────────────────► handler S2 ──┼─► join_all (registration order)
//!        └────────────────► handler SN ──┘
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use futures::FutureExt;
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::config::TopicConfig;
use crate::error::{BusError, SubscriberError};
use crate::meta::Meta;
use crate::outcome::{Outcome, SubscriberResult};
use crate::topic::ack::Ack;
use crate::topic::handler::{AckHandlerRef, HandlerRef, Subscriber};
use crate::topic::registry::{Registry, SubscriptionId};

struct Inner {
    config: TopicConfig,
    registry: Registry,
}

/// Named dispatch channel owning a subscription registry.
///
/// Cheap to clone; clones share the registry, so a handler may capture a
/// clone and unsubscribe itself mid-dispatch.
///
/// ## Example
/// ```no_run
/// use evbus::{HandlerFn, Meta, SubscriberError, Topic, TopicConfig};
/// use serde_json::{json, Value};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let topic = Topic::new(TopicConfig::new("logger"));
///
///     topic
///         .subscribe(
///             ["info"],
///             HandlerFn::arc(|payload: Value, _meta: Meta| async move {
///                 println!("got {payload}");
///                 Ok::<_, SubscriberError>(json!(true))
///             }),
///         )
///         .await?;
///
///     let outcome = topic.publish("info", json!("hi"), None).await;
///     assert_eq!(outcome.count, 1);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Topic {
    inner: Arc<Inner>,
}

impl Topic {
    /// Creates a topic from its configuration.
    #[must_use]
    pub fn new(config: TopicConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                registry: Registry::new(),
            }),
        }
    }

    /// Creates a topic with the default configuration for `name`.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(TopicConfig::new(name))
    }

    /// Returns the topic name.
    pub fn name(&self) -> &str {
        &self.inner.config.topic
    }

    /// Returns the configured acknowledgment window.
    pub fn timeout(&self) -> Duration {
        self.inner.config.timeout
    }

    /// Registers a plain `(payload, meta)` handler on one or more events.
    ///
    /// Returns the subscription identifier, or
    /// [`BusError::NoEventNames`] for an empty list.
    pub async fn subscribe<I>(
        &self,
        events: I,
        handler: HandlerRef,
    ) -> Result<SubscriptionId, BusError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.register(events, Subscriber::Plain(handler)).await
    }

    /// Registers an acknowledging `(payload, meta, ack)` handler.
    ///
    /// Only `deliver` arms the continuation; under the other disciplines
    /// the handler receives a disarmed [`Ack`].
    pub async fn subscribe_acked<I>(
        &self,
        events: I,
        handler: AckHandlerRef,
    ) -> Result<SubscriptionId, BusError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.register(events, Subscriber::Acked(handler)).await
    }

    /// Removes a subscription from every event it watches.
    ///
    /// Idempotent; returns whether anything was removed. In-flight
    /// dispatches keep their snapshot.
    pub async fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        self.inner.registry.remove(id).await
    }

    /// Number of subscriptions currently listening to `event`.
    pub async fn subscription_count(&self, event: &str) -> usize {
        self.inner.registry.subscription_count(event).await
    }

    /// Total number of live subscriptions on this topic.
    pub async fn len(&self) -> usize {
        self.inner.registry.len().await
    }

    /// True if no subscriptions are registered.
    pub async fn is_empty(&self) -> bool {
        self.inner.registry.is_empty().await
    }

    async fn register<I>(&self, events: I, subscriber: Subscriber) -> Result<SubscriptionId, BusError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let events: Vec<String> = events.into_iter().map(Into::into).collect();
        if events.is_empty() {
            return Err(BusError::NoEventNames);
        }
        Ok(self.inner.registry.add(events, subscriber).await)
    }

    /// Fire-and-forget emission.
    ///
    /// Schedules every matching handler and returns without awaiting
    /// completion. Handler errors and panics are swallowed and reported
    /// to stderr; they never reach the producer.
    pub async fn emit(
        &self,
        event: &str,
        payload: Value,
        overrides: Option<Map<String, Value>>,
    ) -> Outcome {
        let snapshot = self.inner.registry.matching(event).await;
        let meta = Meta::build(self.name(), event, overrides);
        let count = snapshot.len();
        for (id, subscriber) in snapshot {
            let payload = payload.clone();
            let sub_meta = meta.for_subscription(&id);
            let event = event.to_string();
            tokio::spawn(async move {
                if let Err(err) = settle(subscriber, payload, sub_meta).await {
                    eprintln!("[evbus] subscriber '{id}' failed during emit of '{event}': {err}");
                }
            });
        }
        Outcome::scheduled(count, meta)
    }

    /// Best-effort publication.
    ///
    /// Runs all matching handlers concurrently, awaits every completion
    /// and aggregates the outcomes. A rejection in one handler does not
    /// short-circuit the others, and the call itself always resolves.
    pub async fn publish(
        &self,
        event: &str,
        payload: Value,
        overrides: Option<Map<String, Value>>,
    ) -> Outcome {
        let snapshot = self.inner.registry.matching(event).await;
        let meta = Meta::build(self.name(), event, overrides);
        let settles = snapshot.into_iter().map(|(id, subscriber)| {
            let payload = payload.clone();
            let sub_meta = meta.for_subscription(&id);
            settle(subscriber, payload, sub_meta)
        });
        let results = join_all(settles).await;
        Outcome::settled(meta, results)
    }

    /// Strict execution.
    ///
    /// Identical dispatch to [`publish`](Topic::publish); every handler
    /// still runs to completion, but the call fails with
    /// [`BusError::ExecuteFailed`] if any subscription rejected.
    pub async fn execute(
        &self,
        event: &str,
        payload: Value,
        overrides: Option<Map<String, Value>>,
    ) -> Result<Outcome, BusError> {
        let outcome = self.publish(event, payload, overrides).await;
        let rejected = outcome.rejected();
        if rejected == 0 {
            return Ok(outcome);
        }
        let Outcome { meta, results, .. } = outcome;
        Err(BusError::ExecuteFailed {
            meta,
            results: results.unwrap_or_default(),
            rejected,
        })
    }

    /// Acknowledged delivery.
    ///
    /// Each matching subscription gets an armed [`Ack`] and the topic's
    /// acknowledgment window. The subscription's result is whatever its
    /// continuation settles first; an unacknowledged subscription is
    /// rejected with [`SubscriberError::AckTimeout`] once the window
    /// elapses. Handler return values are ignored.
    pub async fn deliver(
        &self,
        event: &str,
        payload: Value,
        overrides: Option<Map<String, Value>>,
    ) -> Outcome {
        let snapshot = self.inner.registry.matching(event).await;
        let meta = Meta::build(self.name(), event, overrides);
        let window = self.timeout();
        let machines = snapshot.into_iter().map(|(id, subscriber)| {
            let payload = payload.clone();
            let sub_meta = meta.for_subscription(&id);
            let topic = self.name().to_string();
            let event = event.to_string();
            deliver_one(subscriber, payload, sub_meta, window, topic, event, id)
        });
        let results = join_all(machines).await;
        Outcome::settled(meta, results)
    }
}

/// Runs one subscriber to completion under the settling disciplines.
///
/// A plain handler's return is the result; an acked handler gets a
/// disarmed continuation and fulfills with `Null` on completion. Panics
/// become rejections.
async fn settle(subscriber: Subscriber, payload: Value, meta: Meta) -> SubscriberResult {
    match subscriber {
        Subscriber::Plain(handler) => {
            match AssertUnwindSafe(handler.call(payload, meta)).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => Err(SubscriberError::Panicked {
                    reason: panic_reason(panic),
                }),
            }
        }
        Subscriber::Acked(handler) => {
            let fut = handler.call(payload, meta, Ack::disarmed());
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(()) => Ok(Value::Null),
                Err(panic) => Err(SubscriberError::Panicked {
                    reason: panic_reason(panic),
                }),
            }
        }
    }
}

/// One acknowledgment state machine: arm the slot and the deadline, then
/// invoke the handler and race the two.
async fn deliver_one(
    subscriber: Subscriber,
    payload: Value,
    meta: Meta,
    window: Duration,
    topic: String,
    event: String,
    id: SubscriptionId,
) -> SubscriberResult {
    let (tx, mut rx) = mpsc::channel(1);
    let ack = Ack::armed(tx);
    // Held across the wait so the slot stays open even after the handler
    // drops its clone; an unacknowledged subscription waits out the full
    // window.
    let guard = ack.clone();

    // Machine is armed; only now does the handler run. Its own outcome
    // (return, error, panic) does not settle the subscription.
    tokio::spawn(async move {
        match subscriber {
            Subscriber::Acked(handler) => {
                let _ = AssertUnwindSafe(handler.call(payload, meta, ack))
                    .catch_unwind()
                    .await;
            }
            Subscriber::Plain(handler) => {
                let _ = AssertUnwindSafe(handler.call(payload, meta))
                    .catch_unwind()
                    .await;
            }
        }
    });

    // The timer is dropped on either exit path.
    let result = match tokio::time::timeout(window, rx.recv()).await {
        Ok(Some(result)) => result,
        Ok(None) | Err(_) => Err(SubscriberError::AckTimeout {
            topic,
            event,
            subscription: id,
            timeout: window,
        }),
    };
    drop(guard);
    result
}

fn panic_reason(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
