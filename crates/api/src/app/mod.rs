//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: store wiring (registry + ledger + snapshot handling)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Read-only queries are public; every mutating route sits behind the
/// identity middleware and sees a verified caller.
pub fn build_app(services: Arc<services::AppServices>) -> Router {
    let identified = routes::identified_router()
        .layer(axum::middleware::from_fn(middleware::identity_middleware));

    routes::public_router()
        .merge(identified)
        .layer(Extension(services))
}
