use actix_web::{http::StatusCode, test, web, App};
use opr_common::Secret;
use payment_reconciler_engine::{events::EventProducers, ReconcilerApi};

use crate::{
    data_objects::JsonResponse,
    endpoint_tests::mocks::MockOrderStore,
    helpers::calculate_hmac,
    middleware::hmac::{HmacMiddlewareFactory, NOTIFICATION_HMAC_HEADER},
    routes::{health, payment_status_webhook},
};

#[actix_web::test]
async fn health_check() {
    let app = test::init_service(App::new().service(health)).await;
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn webhook_answers_200_even_for_unknown_orders() {
    let mut db = MockOrderStore::new();
    db.expect_fetch_order_state().times(1).returning(|_| Ok(None));
    db.expect_update_payment_status().times(0);
    let api = ReconcilerApi::new(db, EventProducers::default());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(api))
            .route("/webhook/payment_status", web::post().to(payment_status_webhook::<MockOrderStore>)),
    )
    .await;
    let batch = serde_json::json!({
        "records": [{ "body": r#"{"orderId":"GHOST","paymentStatus":"PAID"}"# }]
    });
    let req = test::TestRequest::post().uri("/webhook/payment_status").set_json(&batch).to_request();
    let resp: JsonResponse = test::call_and_read_body_json(&app, req).await;
    assert!(resp.success);
}

#[actix_web::test]
async fn webhook_rejects_unsigned_requests() {
    let api = ReconcilerApi::new(MockOrderStore::new(), EventProducers::default());
    let app = test::init_service(
        App::new().app_data(web::Data::new(api)).service(
            web::scope("/webhook")
                .wrap(HmacMiddlewareFactory::new(Secret::new("shhh".to_string()), true))
                .route("/payment_status", web::post().to(payment_status_webhook::<MockOrderStore>)),
        ),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/webhook/payment_status")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(r#"{"records":[]}"#)
        .to_request();
    // Middleware failures surface as service errors rather than responses in the test harness.
    let err = test::try_call_service(&app, req).await.expect_err("unsigned request must be rejected");
    assert_eq!(err.error_response().status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn webhook_accepts_correctly_signed_requests() {
    let api = ReconcilerApi::new(MockOrderStore::new(), EventProducers::default());
    let app = test::init_service(
        App::new().app_data(web::Data::new(api)).service(
            web::scope("/webhook")
                .wrap(HmacMiddlewareFactory::new(Secret::new("shhh".to_string()), true))
                .route("/payment_status", web::post().to(payment_status_webhook::<MockOrderStore>)),
        ),
    )
    .await;
    let body = r#"{"records":[]}"#;
    let req = test::TestRequest::post()
        .uri("/webhook/payment_status")
        .insert_header(("Content-Type", "application/json"))
        .insert_header((NOTIFICATION_HMAC_HEADER, calculate_hmac("shhh", body.as_bytes())))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn webhook_rejects_tampered_bodies() {
    let api = ReconcilerApi::new(MockOrderStore::new(), EventProducers::default());
    let app = test::init_service(
        App::new().app_data(web::Data::new(api)).service(
            web::scope("/webhook")
                .wrap(HmacMiddlewareFactory::new(Secret::new("shhh".to_string()), true))
                .route("/payment_status", web::post().to(payment_status_webhook::<MockOrderStore>)),
        ),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/webhook/payment_status")
        .insert_header(("Content-Type", "application/json"))
        .insert_header((NOTIFICATION_HMAC_HEADER, calculate_hmac("shhh", br#"{"records":[]}"#)))
        .set_payload(r#"{"records":[{"body":"{}"}]}"#)
        .to_request();
    let err = test::try_call_service(&app, req).await.expect_err("tampered body must be rejected");
    assert_eq!(err.error_response().status(), StatusCode::FORBIDDEN);
}
