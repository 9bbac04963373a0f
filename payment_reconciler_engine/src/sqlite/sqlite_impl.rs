//! `SqliteDatabase` is a concrete order-state store backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements the [`OrderStateStore`] trait
//! over an sqlx connection pool.
use std::fmt::Debug;

use log::debug;
use sqlx::SqlitePool;

use super::db::{new_pool, order_state};
use crate::{
    db_types::{NewOrderState, OrderStateRecord, StateUpdateRequest, TaggedOrderId},
    traits::{OrderStateStore, OrderStateStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new connection pool with the given maximum number of connections and connects to
    /// the database at the given URL.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl OrderStateStore for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch_order_state(
        &self,
        id: &TaggedOrderId,
    ) -> Result<Option<OrderStateRecord>, OrderStateStoreError> {
        let mut conn = self.pool.acquire().await?;
        let record = order_state::fetch_order_state(id, &mut conn).await?;
        Ok(record)
    }

    async fn insert_order_state(
        &self,
        state: NewOrderState,
    ) -> Result<OrderStateRecord, OrderStateStoreError> {
        let mut conn = self.pool.acquire().await?;
        let record = order_state::insert_order_state(state, &mut conn).await?;
        debug!("🗃️ Order state {} saved with status {}", record.pk, record.payment_status);
        Ok(record)
    }

    async fn update_payment_status(
        &self,
        update: StateUpdateRequest,
    ) -> Result<OrderStateRecord, OrderStateStoreError> {
        let mut conn = self.pool.acquire().await?;
        let record = order_state::update_payment_status(&update, &mut conn).await?;
        record.ok_or(OrderStateStoreError::RecordNotFound(update.key))
    }

    async fn close(&mut self) -> Result<(), OrderStateStoreError> {
        self.pool.close().await;
        Ok(())
    }
}
