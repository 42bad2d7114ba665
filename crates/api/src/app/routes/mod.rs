use axum::{routing::get, Router};

pub mod events;
pub mod icrc7;
pub mod system;
pub mod tickets;

/// Router for the public (read-only) endpoints.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .merge(events::public_router())
        .merge(tickets::public_router())
        .nest("/icrc7", icrc7::router())
}

/// Router for the endpoints requiring a verified caller.
pub fn identified_router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .merge(events::identified_router())
        .merge(tickets::identified_router())
}
