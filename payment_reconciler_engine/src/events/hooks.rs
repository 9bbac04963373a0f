use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{EventHandler, EventProducer, Handler, StatusUpdatedEvent};

/// The producer halves handed to the reconciler. Cloneable, so every worker holding a copy can
/// publish into the same channels.
#[derive(Default, Clone)]
pub struct EventProducers {
    pub status_updated_producer: Vec<EventProducer<StatusUpdatedEvent>>,
}

pub struct EventHandlers {
    pub on_status_updated: Option<EventHandler<StatusUpdatedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_status_updated = hooks.on_status_updated.map(|f| EventHandler::new(buffer_size, f));
        Self { on_status_updated }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_status_updated {
            result.status_updated_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_status_updated {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_status_updated: Option<Handler<StatusUpdatedEvent>>,
}

impl EventHooks {
    pub fn on_status_updated<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(StatusUpdatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_status_updated = Some(Arc::new(f));
        self
    }
}
