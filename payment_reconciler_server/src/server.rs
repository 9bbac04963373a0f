use std::{future::Future, pin::Pin, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::info;
use payment_reconciler_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    ReconcilerApi,
    SqliteDatabase,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    middleware::hmac::HmacMiddlewareFactory,
    routes::{health, payment_status_webhook},
};

const EVENT_BUFFER_SIZE: usize = 100;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, default_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// The server's own hook subscriptions. Currently just an audit line per status change; anything
/// heavier (fulfilment triggers, customer notifications) would be registered here too.
fn default_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_status_updated(|ev| {
        Box::pin(async move {
            info!(
                "💳️ Order {} payment status changed from {} to {}",
                ev.order_id, ev.old_status, ev.new_status
            );
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let api = ReconcilerApi::new(db.clone(), producers.clone());
        let webhook_scope = web::scope("/webhook")
            .wrap(HmacMiddlewareFactory::new(config.hmac.secret.clone(), config.hmac.checks))
            .route("/payment_status", web::post().to(payment_status_webhook::<SqliteDatabase>));
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("opr::access_log"))
            .app_data(web::Data::new(api))
            .service(health)
            .service(webhook_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
