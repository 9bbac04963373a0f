use actix_web::{get, web, HttpResponse, Responder};
use log::trace;
use payment_reconciler_engine::{reconciler::NotificationBatch, OrderStateStore, ReconcilerApi};

use crate::data_objects::JsonResponse;

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------   Payment webhook  --------------------------------------------------------
/// Route handler for the payment-status notification webhook.
///
/// The queue bridge retries on non-2xx responses, and reconciliation is best-effort and never
/// fails, so the answer is always 200 once the batch has settled.
pub async fn payment_status_webhook<B: OrderStateStore>(
    body: web::Json<NotificationBatch>,
    api: web::Data<ReconcilerApi<B>>,
) -> HttpResponse {
    let batch = body.into_inner();
    trace!("📨️ Received payment notification batch with {} record(s)", batch.records.len());
    api.process_batch(batch).await;
    HttpResponse::Ok().json(JsonResponse::success("Batch processed."))
}
