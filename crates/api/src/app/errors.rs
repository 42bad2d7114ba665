use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use boxoffice_core::LedgerError;

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        LedgerError::InvalidInput(_) => json_error(StatusCode::BAD_REQUEST, "invalid_input", message),
        LedgerError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", message),
        LedgerError::SoldOut => json_error(StatusCode::CONFLICT, "sold_out", message),
        LedgerError::NotWhitelisted => json_error(StatusCode::FORBIDDEN, "not_whitelisted", message),
        LedgerError::Unauthorized => json_error(StatusCode::FORBIDDEN, "unauthorized", message),
        LedgerError::PriceCapExceeded { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "price_cap_exceeded", message)
        }
        LedgerError::InsufficientFunds { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "insufficient_funds", message)
        }
        LedgerError::PayoutFailed(_) => json_error(StatusCode::BAD_GATEWAY, "payout_failed", message),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
