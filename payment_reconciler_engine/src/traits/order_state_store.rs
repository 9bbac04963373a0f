use thiserror::Error;

use crate::db_types::{NewOrderState, OrderStateRecord, RecordKey, StateUpdateRequest, TaggedOrderId};

/// The behaviour a storage backend must provide to act as the order-state store.
///
/// Per-record mutation safety (two writers racing on the same key) is the store's problem, not
/// the caller's: [`update_payment_status`](OrderStateStore::update_payment_status) is a single
/// conditional write, never read-modify-write.
#[allow(async_fn_in_trait)]
pub trait OrderStateStore {
    /// The URL of the underlying store.
    fn url(&self) -> &str;

    /// Keyed lookup of a single order-state record. A missing record is `Ok(None)`, not an error.
    async fn fetch_order_state(
        &self,
        id: &TaggedOrderId,
    ) -> Result<Option<OrderStateRecord>, OrderStateStoreError>;

    /// Inserts a brand-new order-state record, deriving both key halves from the order id.
    /// Returns `RecordAlreadyExists` if the key is taken.
    async fn insert_order_state(
        &self,
        state: NewOrderState,
    ) -> Result<OrderStateRecord, OrderStateStoreError>;

    /// Applies a conditional write: sets `payment_status` and `updated_at` on the addressed
    /// record and returns the updated row. If no record exists for the key, the store is left
    /// untouched and `RecordNotFound` is returned.
    async fn update_payment_status(
        &self,
        update: StateUpdateRequest,
    ) -> Result<OrderStateRecord, OrderStateStoreError>;

    /// Closes the store connection.
    async fn close(&mut self) -> Result<(), OrderStateStoreError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderStateStoreError {
    #[error("There is an internal store engine error. {0}")]
    DatabaseError(String),
    #[error("No order-state record exists for key {0}")]
    RecordNotFound(RecordKey),
    #[error("An order-state record already exists for key {0}")]
    RecordAlreadyExists(RecordKey),
}

impl From<sqlx::Error> for OrderStateStoreError {
    fn from(e: sqlx::Error) -> Self {
        OrderStateStoreError::DatabaseError(e.to_string())
    }
}
