use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrderState, OrderStateRecord, RecordKey, StateUpdateRequest, TaggedOrderId},
    traits::OrderStateStoreError,
};

/// Returns the order-state record for the given tagged id, if one exists. Order-state rows carry
/// the tagged id in both key halves, so a single parameter addresses the full composite key.
pub async fn fetch_order_state(
    id: &TaggedOrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderStateRecord>, sqlx::Error> {
    let record = sqlx::query_as("SELECT * FROM order_state WHERE pk = $1 AND sk = $1")
        .bind(id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(record)
}

/// Inserts a new order-state record. The key is derived from the order id; a duplicate key maps
/// to `RecordAlreadyExists` rather than a generic database error.
pub async fn insert_order_state(
    state: NewOrderState,
    conn: &mut SqliteConnection,
) -> Result<OrderStateRecord, OrderStateStoreError> {
    let key = RecordKey::for_order_state(TaggedOrderId::tag(&state.order_id));
    let record = sqlx::query_as(
        r#"
            INSERT INTO order_state (pk, sk, payment_status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *;
        "#,
    )
    .bind(key.pk.as_str())
    .bind(key.sk.as_str())
    .bind(state.payment_status)
    .bind(state.created_at)
    .fetch_one(conn)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(de) if de.is_unique_violation() => {
            OrderStateStoreError::RecordAlreadyExists(key.clone())
        },
        _ => OrderStateStoreError::from(e),
    })?;
    debug!("🗃️ Order state for {} inserted", state.order_id);
    Ok(record)
}

/// Applies the conditional status write. Returns `None` when no row matches the key, leaving the
/// table untouched.
pub async fn update_payment_status(
    update: &StateUpdateRequest,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderStateRecord>, sqlx::Error> {
    let record = sqlx::query_as(
        "UPDATE order_state SET payment_status = $1, updated_at = $2 WHERE pk = $3 AND sk = $4 RETURNING *",
    )
    .bind(update.payment_status)
    .bind(update.updated_at)
    .bind(update.key.pk.as_str())
    .bind(update.key.sk.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(record)
}
