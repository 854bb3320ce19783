//! # Outcome envelope returned by the delivery disciplines.
//!
//! Every dispatch call returns an [`Outcome`]: how many subscriptions the
//! event was dispatched to, the producer-visible metadata, and (for the
//! settling disciplines) the per-subscription results in registration
//! order. `emit` is fire-and-forget and carries no `results`.

use serde_json::Value;

use crate::error::SubscriberError;
use crate::meta::Meta;

/// Settled outcome of one subscription: fulfilled with a value, or
/// rejected with a [`SubscriberError`].
pub type SubscriberResult = Result<Value, SubscriberError>;

/// Producer-visible result of a dispatch call.
#[derive(Debug)]
pub struct Outcome {
    /// Number of subscriptions the event was dispatched to.
    pub count: usize,
    /// Producer-visible metadata (no `subscription_id`).
    pub meta: Meta,
    /// Per-subscription outcomes in registration order.
    ///
    /// `Some` for `publish`, `execute` and `deliver`; `None` for `emit`.
    /// When present, `count == results.len()`.
    pub results: Option<Vec<SubscriberResult>>,
}

impl Outcome {
    /// Envelope for `emit`: handlers were scheduled, nothing was awaited.
    pub(crate) fn scheduled(count: usize, meta: Meta) -> Self {
        Self {
            count,
            meta,
            results: None,
        }
    }

    /// Envelope for the settling disciplines.
    pub(crate) fn settled(meta: Meta, results: Vec<SubscriberResult>) -> Self {
        Self {
            count: results.len(),
            meta,
            results: Some(results),
        }
    }

    /// Number of fulfilled results (0 when `results` is absent).
    pub fn fulfilled(&self) -> usize {
        self.results
            .as_deref()
            .map(|rs| rs.iter().filter(|r| r.is_ok()).count())
            .unwrap_or(0)
    }

    /// Number of rejected results (0 when `results` is absent).
    pub fn rejected(&self) -> usize {
        self.results
            .as_deref()
            .map(|rs| rs.iter().filter(|r| r.is_err()).count())
            .unwrap_or(0)
    }
}
