use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use boxoffice_core::{EventId, LedgerError, LedgerResult, Principal};

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_LOCATION_LENGTH: usize = 200;

/// An event record: the thing tickets are minted against.
///
/// `id`, `organizer`, `name`, `location`, `date`, `ticket_price` and
/// `total_tickets` are immutable after creation. `tickets_sold` and
/// `funds_collected` are the only mutable fields and change only through
/// [`crate::EventRegistry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub organizer: Principal,
    pub name: String,
    pub location: String,
    /// Informational; not enforced against purchase time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub date: DateTime<Utc>,
    /// Price per ticket, in e8s.
    pub ticket_price: u64,
    pub total_tickets: u64,
    pub tickets_sold: u64,
    /// Funds available for withdrawal, in e8s. Credited on purchase,
    /// debited on withdrawal.
    pub funds_collected: u64,
    /// Maximum resale price as a multiple of a ticket's original price.
    /// `None` means resale is unrestricted.
    pub max_resale_multiplier: Option<f64>,
    /// `None` means anyone may purchase. `Some` restricts purchase to the
    /// listed principals — an empty set admits nobody.
    pub whitelist: Option<BTreeSet<Principal>>,
}

impl Event {
    pub fn remaining_tickets(&self) -> u64 {
        self.total_tickets - self.tickets_sold
    }

    pub fn admits(&self, buyer: Principal) -> bool {
        match &self.whitelist {
            Some(listed) => listed.contains(&buyer),
            None => true,
        }
    }
}

/// Parameters for creating an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEvent {
    pub name: String,
    pub location: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub date: DateTime<Utc>,
    pub ticket_price: u64,
    pub total_tickets: u64,
    pub max_resale_multiplier: Option<f64>,
    pub whitelist: Option<BTreeSet<Principal>>,
}

impl CreateEvent {
    /// Validate creation parameters against `now`.
    ///
    /// Also bounds `ticket_price * total_tickets` to `u64`, so the fund
    /// balance can never overflow no matter how many tickets sell.
    pub fn validate(&self, now: DateTime<Utc>) -> LedgerResult<()> {
        if self.name.is_empty() || self.name.len() > MAX_NAME_LENGTH {
            return Err(LedgerError::invalid_input(format!(
                "event name must be 1-{MAX_NAME_LENGTH} characters"
            )));
        }
        if self.location.is_empty() || self.location.len() > MAX_LOCATION_LENGTH {
            return Err(LedgerError::invalid_input(format!(
                "event location must be 1-{MAX_LOCATION_LENGTH} characters"
            )));
        }
        if self.date <= now {
            return Err(LedgerError::invalid_input("event date must be in the future"));
        }
        if self.total_tickets == 0 {
            return Err(LedgerError::invalid_input("must have at least 1 ticket"));
        }
        if self.ticket_price.checked_mul(self.total_tickets).is_none() {
            return Err(LedgerError::invalid_input(
                "ticket_price * total_tickets overflows the fund balance",
            ));
        }
        if let Some(m) = self.max_resale_multiplier {
            if !m.is_finite() || m <= 0.0 {
                return Err(LedgerError::invalid_input(
                    "max_resale_multiplier must be a positive finite number",
                ));
            }
        }
        Ok(())
    }

    /// Materialize the record, caller recorded as organizer.
    pub fn into_event(self, id: EventId, organizer: Principal) -> Event {
        Event {
            id,
            organizer,
            name: self.name,
            location: self.location,
            date: self.date,
            ticket_price: self.ticket_price,
            total_tickets: self.total_tickets,
            tickets_sold: 0,
            funds_collected: 0,
            max_resale_multiplier: self.max_resale_multiplier,
            whitelist: self.whitelist,
        }
    }
}
