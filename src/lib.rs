//! # evbus
//!
//! **evbus** is an in-process asynchronous event bus.
//!
//! A producer publishes named events to a [`Topic`]; subscribers
//! registered on that topic receive them, optionally acknowledging
//! receipt or returning values. A secondary facility, the
//! [`WildcardEmitter`], dispatches by hierarchical name prefix and
//! surfaces unhandled events.
//!
//! ## Features
//!
//! | Area               | Description                                                      | Key types / traits                   |
//! |--------------------|------------------------------------------------------------------|--------------------------------------|
//! | **Disciplines**    | Four delivery contracts: emit, publish, execute, deliver.        | [`Topic`], [`Outcome`]               |
//! | **Handlers**       | Plain and acknowledging subscribers, closure adapters.           | [`Handle`], [`HandleAcked`], [`HandlerFn`], [`AckHandlerFn`] |
//! | **Acknowledgment** | Single-shot continuation raced against a per-event deadline.     | [`Ack`]                              |
//! | **Metadata**       | One immutable bundle per publication, override merge.            | [`Meta`]                             |
//! | **Errors**         | Typed errors for the dispatcher and for subscriptions.           | [`BusError`], [`SubscriberError`]    |
//! | **Wildcards**      | Hierarchical-name emitter with no-subscriptions synthesis.       | [`WildcardEmitter`], [`EmitterConfig`] |
//!
//! ```no_run
//! use evbus::{Ack, AckHandlerFn, HandlerFn, Meta, SubscriberError, Topic, TopicConfig};
//! use serde_json::{json, Value};
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let topic = Topic::new(TopicConfig::new("logger").with_timeout(Duration::from_millis(50)));
//!
//!     // A plain subscriber: its return value is its result under publish.
//!     topic
//!         .subscribe(
//!             ["info"],
//!             HandlerFn::arc(|payload: Value, meta: Meta| async move {
//!                 println!("{}: {payload}", meta.event);
//!                 Ok::<_, SubscriberError>(json!(true))
//!             }),
//!         )
//!         .await?;
//!
//!     // An acknowledging subscriber: only the ack settles its result.
//!     topic
//!         .subscribe_acked(
//!             ["info"],
//!             AckHandlerFn::arc(|_payload: Value, _meta: Meta, ack: Ack| async move {
//!                 ack.resolve(json!("seen"));
//!             }),
//!         )
//!         .await?;
//!
//!     let outcome = topic.publish("info", json!("hi"), None).await;
//!     assert_eq!(outcome.count, 2);
//!
//!     let outcome = topic.deliver("info", json!("hi"), None).await;
//!     assert_eq!(outcome.count, 2);
//!     Ok(())
//! }
//! ```
//!
//! ---

mod config;
mod emitter;
mod error;
mod meta;
mod outcome;
mod topic;

// ---- Public re-exports ----

pub use config::{TopicConfig, DEFAULT_ACK_TIMEOUT};
pub use emitter::{EmitterConfig, ListenerId, ListenerRef, WildcardEmitter};
pub use error::{BusError, SubscriberError};
pub use meta::Meta;
pub use outcome::{Outcome, SubscriberResult};
pub use topic::{
    Ack, AckHandlerFn, AckHandlerRef, Handle, HandleAcked, HandlerFn, HandlerRef, SubscriptionId,
    Topic,
};
