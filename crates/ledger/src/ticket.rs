use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use boxoffice_core::{EventId, Principal, TicketId};

/// One entry in a ticket's provenance: who held it, from when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub at: DateTime<Utc>,
    pub owner: Principal,
}

/// Immutable ticket metadata, fixed at mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketMetadata {
    pub event_id: EventId,
    pub seat: Option<String>,
    pub tier: Option<String>,
    pub image_url: Option<String>,
}

/// A ticket: a uniquely owned digital asset bound to an event.
///
/// `id`, `metadata` and `original_price` never change after mint.
/// `transfer_history` is append-only; its first entry is the minting owner
/// and its last entry always names the current `owner` — both fields change
/// only through [`Ticket::record_transfer`], so the invariant is structural.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub owner: Principal,
    pub metadata: TicketMetadata,
    /// Price paid at mint, in e8s; basis for the resale cap.
    pub original_price: u64,
    pub transfer_history: Vec<TransferRecord>,
}

impl Ticket {
    /// Mint a fresh ticket owned by `buyer`.
    pub fn mint(
        id: TicketId,
        buyer: Principal,
        metadata: TicketMetadata,
        original_price: u64,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner: buyer,
            metadata,
            original_price,
            transfer_history: vec![TransferRecord { at, owner: buyer }],
        }
    }

    /// Hand the ticket to `to`, appending exactly one provenance entry.
    pub fn record_transfer(&mut self, to: Principal, at: DateTime<Utc>) {
        self.owner = to;
        self.transfer_history.push(TransferRecord { at, owner: to });
        debug_assert_eq!(self.transfer_history.last().map(|r| r.owner), Some(self.owner));
    }
}

/// Parameters for purchasing a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseTicket {
    pub event_id: EventId,
    pub seat: Option<String>,
    pub tier: Option<String>,
    pub image_url: Option<String>,
}

impl PurchaseTicket {
    pub fn into_metadata(self) -> TicketMetadata {
        TicketMetadata {
            event_id: self.event_id,
            seat: self.seat,
            tier: self.tier,
            image_url: self.image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> TicketMetadata {
        TicketMetadata {
            event_id: EventId::new(),
            seat: Some("A1".to_string()),
            tier: None,
            image_url: None,
        }
    }

    #[test]
    fn mint_seeds_history_with_buyer() {
        let buyer = Principal::new();
        let ticket = Ticket::mint(TicketId::new(1), buyer, metadata(), 100, Utc::now());

        assert_eq!(ticket.owner, buyer);
        assert_eq!(ticket.transfer_history.len(), 1);
        assert_eq!(ticket.transfer_history[0].owner, buyer);
    }

    #[test]
    fn record_transfer_appends_exactly_one_entry() {
        let buyer = Principal::new();
        let mut ticket = Ticket::mint(TicketId::new(1), buyer, metadata(), 100, Utc::now());
        let before = ticket.transfer_history.clone();

        let to = Principal::new();
        ticket.record_transfer(to, Utc::now());

        assert_eq!(ticket.owner, to);
        assert_eq!(ticket.transfer_history.len(), before.len() + 1);
        assert_eq!(&ticket.transfer_history[..before.len()], &before[..]);
        assert_eq!(ticket.transfer_history.last().unwrap().owner, to);
    }

    #[test]
    fn transfer_leaves_identity_and_price_alone() {
        let mut ticket = Ticket::mint(TicketId::new(7), Principal::new(), metadata(), 250, Utc::now());
        let (id, meta, price) = (ticket.id, ticket.metadata.clone(), ticket.original_price);

        ticket.record_transfer(Principal::new(), Utc::now());

        assert_eq!(ticket.id, id);
        assert_eq!(ticket.metadata, meta);
        assert_eq!(ticket.original_price, price);
    }
}
