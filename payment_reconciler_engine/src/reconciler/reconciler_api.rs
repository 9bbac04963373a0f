use std::fmt::Debug;

use futures_util::future::join_all;
use log::*;

use crate::{
    db_types::{PaymentNotification, RecordKey, StateUpdateRequest, TaggedOrderId},
    events::{EventProducers, StatusUpdatedEvent},
    reconciler::NotificationBatch,
    traits::OrderStateStore,
};

/// `ReconcilerApi` is the primary API for applying inbound payment-status notifications to the
/// order-state store.
pub struct ReconcilerApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for ReconcilerApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconcilerApi")
    }
}

impl<B> ReconcilerApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> ReconcilerApi<B>
where B: OrderStateStore
{
    /// Reconciles one batch of payment-status notifications against the order-state store.
    ///
    /// The call is fire-and-forget: it never fails, whatever the batch contains.
    /// * A batch that does not parse is logged and treated as empty.
    /// * Notifications are reconciled independently and concurrently; they may complete in any
    ///   order, and one notification's failure never aborts the others.
    /// * The call returns once every notification has settled. Redelivery of systemically failed
    ///   batches is the transport's job, not ours.
    pub async fn process_batch(&self, batch: NotificationBatch) {
        let notifications = match batch.parse_notifications() {
            Ok(notifications) => notifications,
            Err(e) => {
                error!("🔄️💰️ Notification batch failed at parsing. {e} Raw batch: {batch:?}");
                return;
            },
        };
        if notifications.is_empty() {
            return;
        }
        debug!("🔄️💰️ Reconciling {} payment notification(s)", notifications.len());
        let tasks = notifications.iter().map(|n| self.reconcile_notification(n, &notifications));
        join_all(tasks).await;
        debug!("🔄️💰️ Batch reconciliation complete");
    }

    /// Reconciles a single notification. All failure modes are terminal for this notification
    /// only: they log and return.
    async fn reconcile_notification(
        &self,
        notification: &PaymentNotification,
        batch: &[PaymentNotification],
    ) {
        let tagged = TaggedOrderId::tag(&notification.order_id);
        let record = match self.db.fetch_order_state(&tagged).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                info!(
                    "🔄️💰️ Order {} could not be found in the order-state store. Notification: {notification:?}",
                    notification.order_id
                );
                return;
            },
            Err(e) => {
                warn!("🔄️💰️ Order-state lookup for {} failed. {e}", notification.order_id);
                return;
            },
        };
        // The store key format differs from the notification's plain id. Re-confirm identity
        // before mutating: reverse-tag the stored key and match it against the incoming batch.
        let updated_order_id = record.pk.untag();
        let updated = match batch.iter().find(|n| n.order_id == updated_order_id) {
            Some(n) => n,
            None => {
                trace!("🔄️💰️ No notification in this batch matches stored key {}", record.pk);
                return;
            },
        };
        let old_status = record.payment_status;
        let update =
            StateUpdateRequest::new(RecordKey::for_order_state(record.pk), updated.payment_status);
        let key = update.key.clone();
        match self.db.update_payment_status(update).await {
            Ok(record) => {
                debug!(
                    "🔄️💰️ Order {updated_order_id} payment status set to {}",
                    record.payment_status
                );
                self.call_status_updated_hook(StatusUpdatedEvent::new(&record, old_status)).await;
            },
            Err(e) => {
                warn!("🔄️💰️ Updating order state for {key} failed. {e}");
            },
        }
    }

    async fn call_status_updated_hook(&self, event: StatusUpdatedEvent) {
        for producer in &self.producers.status_updated_producer {
            trace!("🔄️💰️ Notifying status-updated hook subscribers");
            producer.publish_event(event.clone()).await;
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
