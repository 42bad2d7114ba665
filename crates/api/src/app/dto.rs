use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use boxoffice_core::{LedgerError, LedgerResult, Principal};
use boxoffice_ledger::{Ticket, TicketMetadata, TransferRecord};
use boxoffice_registry::{CreateEvent, Event};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub location: String,
    /// Unix seconds.
    pub date: i64,
    pub ticket_price: u64,
    pub total_tickets: u64,
    pub max_resale_multiplier: Option<f64>,
    pub whitelist: Option<Vec<Principal>>,
}

impl CreateEventRequest {
    pub fn into_params(self) -> LedgerResult<CreateEvent> {
        let date = parse_unix_seconds(self.date)?;
        Ok(CreateEvent {
            name: self.name,
            location: self.location,
            date,
            ticket_price: self.ticket_price,
            total_tickets: self.total_tickets,
            max_resale_multiplier: self.max_resale_multiplier,
            whitelist: self.whitelist.map(BTreeSet::from_iter),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PurchaseTicketRequest {
    pub seat: Option<String>,
    pub tier: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransferTicketRequest {
    pub to: Principal,
    pub declared_price: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawFundsRequest {
    pub amount: u64,
}

fn parse_unix_seconds(secs: i64) -> LedgerResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| LedgerError::invalid_input(format!("date out of range: {secs}")))
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn event_to_json(event: Event) -> serde_json::Value {
    serde_json::json!({
        "id": event.id.to_string(),
        "organizer": event.organizer.to_string(),
        "name": event.name,
        "location": event.location,
        "date": event.date.timestamp(),
        "ticket_price": event.ticket_price,
        "total_tickets": event.total_tickets,
        "tickets_sold": event.tickets_sold,
        "funds_collected": event.funds_collected,
        "max_resale_multiplier": event.max_resale_multiplier,
        "whitelist": event
            .whitelist
            .map(|w| w.iter().map(|p| p.to_string()).collect::<Vec<_>>()),
    })
}

pub fn ticket_to_json(ticket: Ticket) -> serde_json::Value {
    serde_json::json!({
        "id": ticket.id.as_u64(),
        "owner": ticket.owner.to_string(),
        "metadata": metadata_to_json(ticket.metadata),
        "original_price": ticket.original_price,
        "transfer_history": history_to_json(ticket.transfer_history),
    })
}

pub fn metadata_to_json(metadata: TicketMetadata) -> serde_json::Value {
    serde_json::json!({
        "event_id": metadata.event_id.to_string(),
        "seat": metadata.seat,
        "tier": metadata.tier,
        "image_url": metadata.image_url,
    })
}

pub fn history_to_json(history: Vec<TransferRecord>) -> serde_json::Value {
    serde_json::Value::Array(
        history
            .into_iter()
            .map(|r| {
                serde_json::json!({
                    "at": r.at.timestamp(),
                    "owner": r.owner.to_string(),
                })
            })
            .collect(),
    )
}
