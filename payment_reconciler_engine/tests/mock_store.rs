use chrono::Utc;
use mockall::mock;
use payment_reconciler_engine::{
    db_types::{
        NewOrderState,
        OrderStateRecord,
        PaymentStatus,
        StateUpdateRequest,
        TaggedOrderId,
    },
    events::EventProducers,
    reconciler::{NotificationBatch, TransportRecord},
    OrderStateStore,
    OrderStateStoreError,
    ReconcilerApi,
};

mock! {
    pub OrderStore {}
    impl OrderStateStore for OrderStore {
        fn url(&self) -> &str;
        async fn fetch_order_state(&self, id: &TaggedOrderId) -> Result<Option<OrderStateRecord>, OrderStateStoreError>;
        async fn insert_order_state(&self, state: NewOrderState) -> Result<OrderStateRecord, OrderStateStoreError>;
        async fn update_payment_status(&self, update: StateUpdateRequest) -> Result<OrderStateRecord, OrderStateStoreError>;
        async fn close(&mut self) -> Result<(), OrderStateStoreError>;
    }
}

fn stored_record(id: &TaggedOrderId, status: PaymentStatus) -> OrderStateRecord {
    let now = Utc::now();
    OrderStateRecord {
        pk: id.clone(),
        sk: id.clone(),
        payment_status: status,
        created_at: now,
        updated_at: now,
    }
}

fn updated_record(update: &StateUpdateRequest) -> OrderStateRecord {
    OrderStateRecord {
        pk: update.key.pk.clone(),
        sk: update.key.sk.clone(),
        payment_status: update.payment_status,
        created_at: update.updated_at,
        updated_at: update.updated_at,
    }
}

fn batch_of(bodies: &[&str]) -> NotificationBatch {
    NotificationBatch::new(bodies.iter().map(|body| TransportRecord::new(*body)).collect())
}

#[tokio::test]
async fn malformed_batch_issues_no_store_calls() {
    let mut db = MockOrderStore::new();
    db.expect_fetch_order_state().times(0);
    db.expect_update_payment_status().times(0);
    let api = ReconcilerApi::new(db, EventProducers::default());
    api.process_batch(batch_of(&["{ definitely not json"])).await;
}

#[tokio::test]
async fn lookup_miss_issues_no_update_calls() {
    let mut db = MockOrderStore::new();
    db.expect_fetch_order_state().times(1).returning(|_| Ok(None));
    db.expect_update_payment_status().times(0);
    let api = ReconcilerApi::new(db, EventProducers::default());
    api.process_batch(batch_of(&[r#"{"orderId":"GHOST","paymentStatus":"PAID"}"#])).await;
}

#[tokio::test]
async fn one_failed_update_does_not_abort_the_rest() {
    let _ = env_logger::try_init();
    let mut db = MockOrderStore::new();
    db.expect_fetch_order_state()
        .times(3)
        .returning(|id| Ok(Some(stored_record(id, PaymentStatus::Pending))));
    db.expect_update_payment_status().times(3).returning(|update| {
        if update.key.pk.as_str() == "ORDER_STATE#B2" {
            Err(OrderStateStoreError::DatabaseError("connection reset by peer".to_string()))
        } else {
            Ok(updated_record(&update))
        }
    });
    let api = ReconcilerApi::new(db, EventProducers::default());
    api.process_batch(batch_of(&[
        r#"{"orderId":"A1","paymentStatus":"PAID"}"#,
        r#"{"orderId":"B2","paymentStatus":"PAID"}"#,
        r#"{"orderId":"C3","paymentStatus":"CANCELLED"}"#,
    ]))
    .await;
}

#[tokio::test]
async fn store_lookup_errors_are_contained() {
    let mut db = MockOrderStore::new();
    db.expect_fetch_order_state()
        .times(1)
        .returning(|_| Err(OrderStateStoreError::DatabaseError("no connection".to_string())));
    db.expect_update_payment_status().times(0);
    let api = ReconcilerApi::new(db, EventProducers::default());
    api.process_batch(batch_of(&[r#"{"orderId":"A1","paymentStatus":"PAID"}"#])).await;
}
