use mockall::mock;
use payment_reconciler_engine::{
    db_types::{NewOrderState, OrderStateRecord, StateUpdateRequest, TaggedOrderId},
    traits::{OrderStateStore, OrderStateStoreError},
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
