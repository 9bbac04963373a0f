//! # Store management and control.
//!
//! This module defines the interface contract that order-state store *backends* must expose in
//! order to back the reconciler.
//!
//! The [`OrderStateStore`] trait covers the three operations the engine needs: a keyed lookup, a
//! conditional status write, and record insertion for the intake flow. Anything beyond that
//! (secondary indexes, scans, TTLs) is a backend concern and deliberately absent here.
mod order_state_store;

pub use order_state_store::{OrderStateStore, OrderStateStoreError};
