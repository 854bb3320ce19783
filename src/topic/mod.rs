//! Topics: subscription registry, handler traits and the dispatcher.
//!
//! This module groups the per-topic machinery:
//! - [`Topic`] the dispatcher with the four delivery disciplines
//! - [`Handle`], [`HandleAcked`] the two handler shapes, with
//!   [`HandlerFn`] / [`AckHandlerFn`] closure adapters
//! - [`Ack`] the single-shot acknowledgment continuation
//! - [`SubscriptionId`] subscription identity within a topic
//!
//! See `emitter` for the hierarchical-name wildcard emitter.

mod ack;
mod core;
mod handler;
mod registry;

pub use ack::Ack;
pub use core::Topic;
pub use handler::{AckHandlerFn, AckHandlerRef, Handle, HandleAcked, HandlerFn, HandlerRef};
pub use registry::SubscriptionId;
