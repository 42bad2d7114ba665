//! ICRC-7-style asset queries, kept under their original method names.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use boxoffice_core::TicketId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/metadata/:id", get(metadata))
        .route("/owner_of/:id", get(owner_of))
        .route("/transfer_history/:id", get(transfer_history))
}

fn parse_id(raw: &str) -> Result<TicketId, axum::response::Response> {
    raw.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid ticket id")
    })
}

pub async fn metadata(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(r) => return r,
    };
    match services.icrc7_metadata(id) {
        Ok(m) => (StatusCode::OK, Json(dto::metadata_to_json(m))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn owner_of(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(r) => return r,
    };
    match services.icrc7_owner_of(id) {
        Ok(owner) => (
            StatusCode::OK,
            Json(serde_json::json!({ "owner": owner.to_string() })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn transfer_history(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(r) => return r,
    };
    match services.icrc7_transfer_history(id) {
        Ok(history) => (StatusCode::OK, Json(dto::history_to_json(history))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
