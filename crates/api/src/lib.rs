//! HTTP API: server, routing, and request/response mapping.
//!
//! This is the external request/response boundary. Callers arrive with a
//! principal already verified by the authentication collaborator (the
//! `x-principal` header); everything past the middleware is authorization
//! and domain logic.

pub mod app;
pub mod context;
pub mod middleware;
