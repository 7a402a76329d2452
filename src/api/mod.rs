//! The application's route table.

pub mod tickets;

use std::sync::Arc;

use crate::health;
use crate::store::SharedStore;
use crate::{Method, Request, Router};

/// Mount point of the ticket routes.
pub const TICKETS_PREFIX: &str = "/api/tickets";

pub const WELCOME: &str = "Welcome to the Ticket Management System API";

/// Builds the full router around one shared store.
pub fn router(store: SharedStore) -> Router {
    let ready = Arc::clone(&store);
    Router::new()
        .on(Method::Get, "/", welcome)
        .on(Method::Get, "/healthz", health::liveness)
        .on(Method::Get, "/readyz", move |req: Request| health::readiness(Arc::clone(&ready), req))
        .nest(TICKETS_PREFIX, tickets::routes(store))
}

async fn welcome(_req: Request) -> &'static str {
    WELCOME
}
