//! # Single-shot acknowledgment continuation.
//!
//! [`Ack`] is the continuation handed to `deliver` subscribers. It is a
//! single-shot outcome slot: whoever settles first wins, every later call
//! is a no-op. The dispatcher races the slot against the topic's
//! acknowledgment window.
//!
//! ## State machine
//! ```text
//! Pending ──resolve(v)──► Fulfilled(v)
//!    │    ──reject(e)───► Rejected(e)
//!    └────window elapses► TimedOut        (settled by the dispatcher)
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::SubscriberError;
use crate::outcome::SubscriberResult;

struct AckInner {
    settled: AtomicBool,
    slot: Option<mpsc::Sender<SubscriberResult>>,
}

/// Acknowledgment continuation passed to `deliver` subscribers.
///
/// Cheap to clone; all clones share the same single-shot slot.
#[derive(Clone)]
pub struct Ack {
    inner: Arc<AckInner>,
}

impl Ack {
    /// Creates an armed continuation writing into `slot`.
    pub(crate) fn armed(slot: mpsc::Sender<SubscriberResult>) -> Self {
        Self {
            inner: Arc::new(AckInner {
                settled: AtomicBool::new(false),
                slot: Some(slot),
            }),
        }
    }

    /// Creates an inert continuation whose settles are all no-ops.
    ///
    /// Handed to acked handlers dispatched under `emit`, `publish` and
    /// `execute`, where no acknowledgment is awaited.
    pub(crate) fn disarmed() -> Self {
        Self {
            inner: Arc::new(AckInner {
                settled: AtomicBool::new(true),
                slot: None,
            }),
        }
    }

    /// Acknowledges success with `value`.
    ///
    /// Returns `true` if this call settled the subscription, `false` if
    /// the slot was already settled (or disarmed).
    pub fn resolve(&self, value: Value) -> bool {
        self.settle(Ok(value))
    }

    /// Acknowledges failure with `reason`.
    ///
    /// Returns `true` if this call settled the subscription.
    pub fn reject(&self, reason: impl Into<String>) -> bool {
        self.settle(Err(SubscriberError::Rejected {
            reason: reason.into(),
        }))
    }

    fn settle(&self, result: SubscriberResult) -> bool {
        if self.inner.settled.swap(true, Ordering::SeqCst) {
            return false;
        }
        match &self.inner.slot {
            Some(slot) => slot.try_send(result).is_ok(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn first_settle_wins() {
        let (tx, mut rx) = mpsc::channel(1);
        let ack = Ack::armed(tx);

        assert!(ack.resolve(json!(1)));
        assert!(!ack.resolve(json!(2)));
        assert!(!ack.reject("late"));

        assert_eq!(rx.recv().await, Some(Ok(json!(1))));
        // no second message behind the first
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn reject_carries_the_reason() {
        let (tx, mut rx) = mpsc::channel(1);
        let ack = Ack::armed(tx);

        assert!(ack.reject("BOOM!"));
        match rx.recv().await {
            Some(Err(SubscriberError::Rejected { reason })) => assert_eq!(reason, "BOOM!"),
            other => panic!("unexpected slot contents: {other:?}"),
        }
    }

    #[tokio::test]
    async fn clones_share_the_slot() {
        let (tx, mut rx) = mpsc::channel(1);
        let ack = Ack::armed(tx);
        let other = ack.clone();

        assert!(other.resolve(json!("first")));
        assert!(!ack.resolve(json!("second")));
        assert_eq!(rx.recv().await, Some(Ok(json!("first"))));
    }

    #[test]
    fn disarmed_is_a_no_op() {
        let ack = Ack::disarmed();
        assert!(!ack.resolve(json!(true)));
        assert!(!ack.reject("ignored"));
    }
}
