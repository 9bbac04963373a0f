use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db_types::{OrderId, OrderStateRecord, PaymentStatus};

/// Emitted after every successful conditional write against the order-state store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdatedEvent {
    pub order_id: OrderId,
    pub old_status: PaymentStatus,
    pub new_status: PaymentStatus,
    pub updated_at: DateTime<Utc>,
}

impl StatusUpdatedEvent {
    pub fn new(record: &OrderStateRecord, old_status: PaymentStatus) -> Self {
        Self {
            order_id: record.order_id(),
            old_status,
            new_status: record.payment_status,
            updated_at: record.updated_at,
        }
    }
}
