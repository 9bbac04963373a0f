//! HMAC middleware for Actix Web.
//!
//! The queue bridge signs every webhook request body with HMAC-SHA256, using the shared secret,
//! and sends the signature base64-encoded in the `X-Notification-Hmac-SHA256` header. This
//! middleware verifies the signature before the body reaches any handler, and re-attaches the
//! consumed body so that extractors downstream still work.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorBadRequest, ErrorForbidden},
    web,
    Error,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use opr_common::Secret;

use crate::helpers::verify_hmac;

pub const NOTIFICATION_HMAC_HEADER: &str = "X-Notification-Hmac-SHA256";

pub struct HmacMiddlewareFactory {
    key: Secret<String>,
    // If false, the middleware does not check signatures and always allows the call
    enabled: bool,
}

impl HmacMiddlewareFactory {
    pub fn new(key: Secret<String>, enabled: bool) -> Self {
        HmacMiddlewareFactory { key, enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for HmacMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = HmacMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(HmacMiddlewareService {
            key: self.key.clone(),
            enabled: self.enabled,
            service: Rc::new(service),
        }))
    }
}

pub struct HmacMiddlewareService<S> {
    key: Secret<String>,
    enabled: bool,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for HmacMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let secret = self.key.reveal().clone();
        let enabled = self.enabled;
        Box::pin(async move {
            if !enabled {
                trace!("🔐️ HMAC checks are disabled. Allowing request.");
                return service.call(req).await;
            }
            trace!("🔐️ Checking HMAC for request");
            let signature = match req.headers().get(NOTIFICATION_HMAC_HEADER).and_then(|v| v.to_str().ok()) {
                Some(signature) => signature.to_string(),
                None => {
                    warn!("🔐️ No HMAC signature found in request. Denying access.");
                    return Err(ErrorForbidden("No HMAC signature found."));
                },
            };
            let body = req.extract::<web::Bytes>().await.map_err(|e| {
                warn!("🔐️ Failed to extract request body: {e:?}");
                ErrorBadRequest("Failed to extract request body.")
            })?;
            if verify_hmac(&secret, body.as_ref(), &signature) {
                trace!("🔐️ HMAC check for request ✅️");
                req.set_payload(bytes_to_payload(body));
                service.call(req).await
            } else {
                warn!("🔐️ Invalid HMAC signature found in request. Denying access.");
                Err(ErrorForbidden("Invalid HMAC signature."))
            }
        })
    }
}

fn bytes_to_payload(buf: web::Bytes) -> Payload {
    let (_, mut pl) = h1::Payload::create(true);
    pl.unread_data(buf);
    Payload::from(pl)
}
