use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::db_types::PaymentNotification;

/// One transport-level record. The body is an opaque string as it came off the queue; it only
/// becomes a [`PaymentNotification`] (or several) once the batch is parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportRecord {
    pub body: String,
}

impl TransportRecord {
    pub fn new<S: Into<String>>(body: S) -> Self {
        Self { body: body.into() }
    }
}

/// A batch of inbound transport records, consumed once and discarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationBatch {
    pub records: Vec<TransportRecord>,
}

#[derive(Debug, Error)]
#[error("Malformed notification payload. {0}")]
pub struct BatchParseError(#[from] serde_json::Error);

impl NotificationBatch {
    pub fn new(records: Vec<TransportRecord>) -> Self {
        Self { records }
    }

    /// Parses every record body and flattens the results into one notification sequence. A body
    /// holding a JSON array contributes each of its elements; any other JSON value must be a
    /// single notification object.
    ///
    /// One malformed body fails the whole batch. Callers are expected to treat that as an empty
    /// batch rather than propagate it.
    pub fn parse_notifications(&self) -> Result<Vec<PaymentNotification>, BatchParseError> {
        let mut notifications = Vec::with_capacity(self.records.len());
        for record in &self.records {
            let value: Value = serde_json::from_str(&record.body)?;
            match value {
                Value::Array(items) => {
                    for item in items {
                        notifications.push(serde_json::from_value(item)?);
                    }
                },
                other => notifications.push(serde_json::from_value(other)?),
            }
        }
        Ok(notifications)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::db_types::{OrderId, PaymentStatus};

    #[test]
    fn parses_single_object_bodies() {
        let batch = NotificationBatch::new(vec![
            TransportRecord::new(r#"{"orderId":"A1","paymentStatus":"PAID"}"#),
            TransportRecord::new(r#"{"orderId":"B2","paymentStatus":"PENDING"}"#),
        ]);
        let notifications = batch.parse_notifications().unwrap();
        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].order_id, OrderId::from("A1"));
        assert_eq!(notifications[1].payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn flattens_array_bodies() {
        let batch = NotificationBatch::new(vec![TransportRecord::new(
            r#"[{"orderId":"A1","paymentStatus":"PAID"},{"orderId":"B2","paymentStatus":"REFUNDED"}]"#,
        )]);
        let notifications = batch.parse_notifications().unwrap();
        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[1].order_id, OrderId::from("B2"));
        assert_eq!(notifications[1].payment_status, PaymentStatus::Refunded);
    }

    #[test]
    fn one_malformed_body_fails_the_whole_batch() {
        let batch = NotificationBatch::new(vec![
            TransportRecord::new(r#"{"orderId":"A1","paymentStatus":"PAID"}"#),
            TransportRecord::new("not json at all"),
        ]);
        let err = batch.parse_notifications().unwrap_err();
        assert!(err.to_string().starts_with("Malformed notification payload."));
    }

    #[test]
    fn unknown_status_fails_the_batch() {
        let batch =
            NotificationBatch::new(vec![TransportRecord::new(r#"{"orderId":"A1","paymentStatus":"TELEPORTED"}"#)]);
        assert!(batch.parse_notifications().is_err());
    }

    #[test]
    fn empty_batch_parses_to_nothing() {
        assert!(NotificationBatch::default().parse_notifications().unwrap().is_empty());
    }
}
