use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use boxoffice_core::{EventId, Principal};
use boxoffice_ledger::PurchaseTicket;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CallerContext;

pub fn public_router() -> Router {
    Router::new()
        .route("/events/:id", get(get_event))
        .route("/events/by-organizer/:principal", get(get_events_by_organizer))
}

pub fn identified_router() -> Router {
    Router::new()
        .route("/events", post(create_event))
        .route("/events/:id/purchase", post(purchase_ticket))
        .route("/events/:id/withdraw", post(withdraw_funds))
}

pub async fn create_event(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Json(body): Json<dto::CreateEventRequest>,
) -> axum::response::Response {
    let params = match body.into_params() {
        Ok(p) => p,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    match services.create_event(caller.principal(), params) {
        Ok(id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_event(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: EventId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid event id"),
    };

    match services.get_event(id) {
        Ok(event) => (StatusCode::OK, Json(dto::event_to_json(event))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_events_by_organizer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(principal): Path<String>,
) -> axum::response::Response {
    let organizer: Principal = match principal.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid principal"),
    };

    let events: Vec<_> = services
        .events_by_organizer(organizer)
        .into_iter()
        .map(dto::event_to_json)
        .collect();
    (StatusCode::OK, Json(serde_json::Value::Array(events))).into_response()
}

pub async fn purchase_ticket(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    body: Option<Json<dto::PurchaseTicketRequest>>,
) -> axum::response::Response {
    let event_id: EventId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid event id"),
    };

    let Json(body) = body.unwrap_or_default();
    let params = PurchaseTicket {
        event_id,
        seat: body.seat,
        tier: body.tier,
        image_url: body.image_url,
    };

    match services.purchase_ticket(caller.principal(), params) {
        Ok(ticket_id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "ticket_id": ticket_id.as_u64() })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn withdraw_funds(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::WithdrawFundsRequest>,
) -> axum::response::Response {
    let event_id: EventId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid event id"),
    };

    match services.withdraw_funds(event_id, body.amount, caller.principal()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
