//! `boxoffice-core` — shared primitives for the ticket ledger.
//!
//! This crate contains **pure domain** building blocks (no infrastructure
//! concerns): typed identifiers, the verified caller identity, and the
//! closed error taxonomy every operation reports through.

pub mod error;
pub mod id;
pub mod principal;

pub use error::{LedgerError, LedgerResult};
pub use id::{EventId, TicketId};
pub use principal::Principal;
