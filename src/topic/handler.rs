//! # Subscriber handler traits.
//!
//! Two handler shapes exist, selected at registration rather than by
//! reflecting on arity:
//!
//! - **[`Handle`]** — `(payload, meta)` handlers for `emit`, `publish`
//!   and `execute`. The returned value (or error) becomes the
//!   subscription's result under `publish`/`execute`.
//! - **[`HandleAcked`]** — `(payload, meta, ack)` handlers for `deliver`.
//!   The handler's own return is ignored; only the [`Ack`] contributes to
//!   the result.
//!
//! The crate provides [`HandlerFn`] / [`AckHandlerFn`] — function-backed
//! implementations that wrap closures as handlers.
//!
//! ## Rules
//! - Handlers run concurrently within one call; do not rely on ordering
//!   between subscriptions.
//! - A handler dispatched under a discipline that does not match its
//!   shape still runs: an acked handler gets a disarmed [`Ack`] under
//!   `publish`, a plain handler gets no continuation under `deliver` and
//!   therefore times out.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SubscriberError;
use crate::meta::Meta;
use crate::topic::ack::Ack;

/// Shared handle to a plain handler.
pub type HandlerRef = Arc<dyn Handle>;

/// Shared handle to an acknowledgment handler.
pub type AckHandlerRef = Arc<dyn HandleAcked>;

/// Two-argument subscriber handler.
///
/// The returned value is the subscription's fulfilled result under
/// `publish` and `execute`; the error is its rejection.
#[async_trait]
pub trait Handle: Send + Sync + 'static {
    /// Processes one event.
    async fn call(&self, payload: Value, meta: Meta) -> Result<Value, SubscriberError>;
}

/// Acknowledging subscriber handler for `deliver`.
///
/// The subscription's result is whatever the handler settles through
/// `ack` first; the handler's own completion is not observed.
#[async_trait]
pub trait HandleAcked: Send + Sync + 'static {
    /// Processes one event, settling the outcome through `ack`.
    async fn call(&self, payload: Value, meta: Meta, ack: Ack);
}

/// Function-backed plain handler.
///
/// Wraps a closure that *creates* a new future per dispatch.
///
/// ## Example
/// ```rust,no_run
/// use evbus::{HandlerFn, HandlerRef, Meta, SubscriberError};
/// use serde_json::{json, Value};
///
/// let h: HandlerRef = HandlerFn::arc(|_payload: Value, _meta: Meta| async move {
///     Ok::<_, SubscriberError>(json!(true))
/// });
/// ```
pub struct HandlerFn<F> {
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a [`HandlerRef`].
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Handle for HandlerFn<F>
where
    F: Fn(Value, Meta) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, SubscriberError>> + Send + 'static,
{
    async fn call(&self, payload: Value, meta: Meta) -> Result<Value, SubscriberError> {
        (self.f)(payload, meta).await
    }
}

/// Function-backed acknowledgment handler.
///
/// ## Example
/// ```rust,no_run
/// use evbus::{Ack, AckHandlerFn, AckHandlerRef, Meta};
/// use serde_json::{json, Value};
///
/// let h: AckHandlerRef = AckHandlerFn::arc(|_payload: Value, _meta: Meta, ack: Ack| async move {
///     ack.resolve(json!(true));
/// });
/// ```
pub struct AckHandlerFn<F> {
    f: F,
}

impl<F> AckHandlerFn<F> {
    /// Creates a new function-backed acknowledgment handler.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> HandleAcked for AckHandlerFn<F>
where
    F: Fn(Value, Meta, Ack) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn call(&self, payload: Value, meta: Meta, ack: Ack) {
        (self.f)(payload, meta, ack).await;
    }
}

/// A registered handler, one of the two shapes.
#[derive(Clone)]
pub(crate) enum Subscriber {
    Plain(HandlerRef),
    Acked(AckHandlerRef),
}
