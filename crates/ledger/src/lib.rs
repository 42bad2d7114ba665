//! `boxoffice-ledger` — the Ticket Ledger.
//!
//! Mints tickets against events, tracks ownership and transfer provenance,
//! enforces resale price caps, and answers the ICRC-7-style asset queries.
//! Holds a read-only handle to the Event Registry for price/whitelist/cap
//! resolution; event records themselves are never owned here.

pub mod ledger;
pub mod snapshot;
pub mod ticket;

pub use ledger::TicketLedger;
pub use snapshot::Snapshot;
pub use ticket::{PurchaseTicket, Ticket, TicketMetadata, TransferRecord};
