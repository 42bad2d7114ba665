use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use boxoffice_core::{Principal, TicketId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CallerContext;

pub fn public_router() -> Router {
    Router::new()
        .route("/tickets/:id", get(get_ticket))
        .route("/tickets/by-owner/:principal", get(get_tickets_by_owner))
}

pub fn identified_router() -> Router {
    Router::new().route("/tickets/:id/transfer", post(transfer_ticket))
}

pub async fn get_ticket(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: TicketId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid ticket id"),
    };

    match services.get_ticket(id) {
        Ok(ticket) => (StatusCode::OK, Json(dto::ticket_to_json(ticket))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_tickets_by_owner(
    Extension(services): Extension<Arc<AppServices>>,
    Path(principal): Path<String>,
) -> axum::response::Response {
    let owner: Principal = match principal.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid principal"),
    };

    let tickets: Vec<_> = services
        .tickets_by_owner(owner)
        .into_iter()
        .map(dto::ticket_to_json)
        .collect();
    (StatusCode::OK, Json(serde_json::Value::Array(tickets))).into_response()
}

pub async fn transfer_ticket(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::TransferTicketRequest>,
) -> axum::response::Response {
    let ticket_id: TicketId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid ticket id"),
    };

    match services.transfer_ticket(caller.principal(), ticket_id, body.to, body.declared_price) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
