use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

pub use opr_common::{OrderId, TaggedOrderId};

//--------------------------------------    PaymentStatus    ---------------------------------------------------------
/// The payment progress of an order, as reported by the upstream payment stream.
///
/// On the wire the status arrives in SCREAMING_SNAKE_CASE (`"PAID"`); in the store it is
/// persisted under the variant name (`"Paid"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// No payment has been captured for the order yet.
    Pending,
    /// A payment has been authorised but not captured.
    Authorized,
    /// The order has been paid in full.
    Paid,
    /// The payment was cancelled before capture.
    Cancelled,
    /// A captured payment has been returned to the customer.
    Refunded,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Authorized => write!(f, "Authorized"),
            PaymentStatus::Paid => write!(f, "Paid"),
            PaymentStatus::Cancelled => write!(f, "Cancelled"),
            PaymentStatus::Refunded => write!(f, "Refunded"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid payment status: {0}")]
pub struct ConversionError(String);

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Authorized" => Ok(Self::Authorized),
            "Paid" => Ok(Self::Paid),
            "Cancelled" => Ok(Self::Cancelled),
            "Refunded" => Ok(Self::Refunded),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid payment status: {value}. But this conversion cannot fail. Defaulting to Pending");
            PaymentStatus::Pending
        })
    }
}

//-------------------------------------- PaymentNotification ---------------------------------------------------------
/// A single inbound payment-status notification. Notifications are ephemeral: they exist for the
/// duration of one batch and are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentNotification {
    pub order_id: OrderId,
    pub payment_status: PaymentStatus,
}

//--------------------------------------   OrderStateRecord  ---------------------------------------------------------
/// The persisted order-state entity. Records are created elsewhere in the order lifecycle; the
/// reconciler only ever reads them and rewrites `payment_status` and `updated_at`.
///
/// Both key halves hold the tagged order id, matching the composite-key layout of the store.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct OrderStateRecord {
    pub pk: TaggedOrderId,
    pub sk: TaggedOrderId,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderStateRecord {
    pub fn order_id(&self) -> OrderId {
        self.pk.untag()
    }
}

//--------------------------------------    NewOrderState    ---------------------------------------------------------
/// A new order-state record. Record creation belongs to the order intake flow rather than the
/// reconciler, but the store exposes it so that flow (and the tests) have somewhere to write.
#[derive(Debug, Clone)]
pub struct NewOrderState {
    pub order_id: OrderId,
    pub payment_status: PaymentStatus,
    /// The time the order entered the system.
    pub created_at: DateTime<Utc>,
}

impl NewOrderState {
    pub fn new<T: Into<OrderId>>(order_id: T, payment_status: PaymentStatus) -> Self {
        Self { order_id: order_id.into(), payment_status, created_at: Utc::now() }
    }
}

//--------------------------------------      RecordKey      ---------------------------------------------------------
/// The composite (partition, sort) key addressing a single record in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey {
    pub pk: TaggedOrderId,
    pub sk: TaggedOrderId,
}

impl RecordKey {
    /// Order-state rows use the tagged id for both key halves.
    pub fn for_order_state(id: TaggedOrderId) -> Self {
        Self { pk: id.clone(), sk: id }
    }
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.pk, self.sk)
    }
}

//--------------------------------------  StateUpdateRequest ---------------------------------------------------------
/// A conditional write against one order-state record: set the payment status and refresh the
/// modification timestamp. The timestamp is taken when the request is built, not when it is
/// applied.
#[derive(Debug, Clone)]
pub struct StateUpdateRequest {
    pub key: RecordKey,
    pub payment_status: PaymentStatus,
    pub updated_at: DateTime<Utc>,
}

impl StateUpdateRequest {
    pub fn new(key: RecordKey, payment_status: PaymentStatus) -> Self {
        Self { key, payment_status, updated_at: Utc::now() }
    }
}
