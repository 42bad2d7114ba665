//! `boxoffice-registry` — the Event Registry.
//!
//! Owns event records and their fund accounting: creation, lookups, the
//! atomic sale reservation the ticket ledger delegates to, and
//! organizer-only withdrawal of collected funds through the payout seam.

pub mod event;
pub mod payout;
pub mod registry;

pub use event::{CreateEvent, Event, MAX_LOCATION_LENGTH, MAX_NAME_LENGTH};
pub use payout::{PayoutError, PayoutGateway, RecordingPayouts};
pub use registry::EventRegistry;
