use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use boxoffice_core::Principal;

use crate::context::CallerContext;

/// Header the authentication collaborator sets after verifying the caller.
pub const PRINCIPAL_HEADER: &str = "x-principal";

/// Extract the verified caller identity into request extensions.
///
/// Requests without a well-formed principal never reach a handler.
pub async fn identity_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let principal = extract_principal(req.headers())?;
    req.extensions_mut().insert(CallerContext::new(principal));
    Ok(next.run(req).await)
}

fn extract_principal(headers: &HeaderMap) -> Result<Principal, StatusCode> {
    let header = headers
        .get(PRINCIPAL_HEADER)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    header
        .trim()
        .parse::<Principal>()
        .map_err(|_| StatusCode::UNAUTHORIZED)
}
