//! # The reconciler public API.
//!
//! [`ReconcilerApi`] consumes batches of payment-status notifications and applies them to the
//! order-state store. The whole module is built around a fail-open policy: a batch call never
//! fails, whatever happens to the individual notifications inside it.
mod batch;
mod reconciler_api;

pub use batch::{BatchParseError, NotificationBatch, TransportRecord};
pub use reconciler_api::ReconcilerApi;
