//! # Error types used by the bus and by individual subscriptions.
//!
//! This module defines two main error enums:
//!
//! - [`BusError`] errors raised by the dispatcher itself.
//! - [`SubscriberError`] errors settled for individual subscriptions.
//!
//! Both types provide helper methods `as_label` for metrics.
//! [`SubscriberError`] has an additional `is_timeout()` predicate.

use std::time::Duration;

use thiserror::Error;

use crate::meta::Meta;
use crate::outcome::SubscriberResult;
use crate::topic::SubscriptionId;

/// # Errors produced by the dispatcher.
///
/// These represent failures of a dispatch call as a whole, as opposed to
/// failures of individual subscriptions (see [`SubscriberError`]).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BusError {
    /// `subscribe` was called with an empty event-name list.
    #[error("subscribe requires at least one event name")]
    NoEventNames,

    /// At least one subscription rejected under `execute`.
    ///
    /// Carries the complete per-subscription `results` (in registration
    /// order) and the producer-visible `meta` for caller diagnosis.
    #[error("execute of '{}' on topic '{}' failed: {} of {} subscribers rejected", .meta.event, .meta.topic, .rejected, .results.len())]
    ExecuteFailed {
        /// Producer-visible metadata of the failed call.
        meta: Meta,
        /// Every subscription's outcome, registration order.
        results: Vec<SubscriberResult>,
        /// Number of rejected entries in `results`.
        rejected: usize,
    },
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::NoEventNames => "bus_no_event_names",
            BusError::ExecuteFailed { .. } => "bus_execute_failed",
        }
    }
}

/// # Errors settled for a single subscription.
///
/// These never fail the producer's call by themselves; they appear as
/// `rejected` entries in the outcome envelope. Only `execute` turns them
/// into a caller-visible [`BusError::ExecuteFailed`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubscriberError {
    /// Handler returned an error.
    #[error("handler failed: {reason}")]
    Handler { reason: String },

    /// Handler panicked; the panic was caught and isolated.
    #[error("handler panicked: {reason}")]
    Panicked { reason: String },

    /// Subscription acknowledged with an error under `deliver`.
    #[error("acknowledgment rejected: {reason}")]
    Rejected { reason: String },

    /// Subscription did not acknowledge within the configured window.
    #[error("acknowledgment of '{event}' on topic '{topic}' timed out after {timeout:?} (subscription {subscription})")]
    AckTimeout {
        /// Owning topic name.
        topic: String,
        /// Event name that was being delivered.
        event: String,
        /// Subscription that failed to acknowledge.
        subscription: SubscriptionId,
        /// The configured acknowledgment window.
        timeout: Duration,
    },
}

impl SubscriberError {
    /// Creates a plain handler failure from any printable reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        SubscriberError::Handler {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label.
    pub fn as_label(&self) -> &'static str {
        match self {
            SubscriberError::Handler { .. } => "subscriber_failed",
            SubscriberError::Panicked { .. } => "subscriber_panicked",
            SubscriberError::Rejected { .. } => "subscriber_rejected",
            SubscriberError::AckTimeout { .. } => "subscriber_ack_timeout",
        }
    }

    /// Indicates whether the error is an acknowledgment timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SubscriberError::AckTimeout { .. })
    }
}
