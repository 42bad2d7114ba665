//! The authoritative ticket store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use boxoffice_core::{LedgerError, LedgerResult, Principal, TicketId};
use boxoffice_registry::EventRegistry;

use crate::ticket::{PurchaseTicket, Ticket, TicketMetadata, TransferRecord};

/// Locked interior: the ticket map plus the monotonic id counter.
#[derive(Debug)]
struct TicketBook {
    tickets: HashMap<TicketId, Ticket>,
    /// Next id to hand out. Only ever increments, and is part of the
    /// persisted snapshot, so ticket ids are never reused across restarts.
    next_ticket_id: u64,
}

/// Ticket Ledger: owns every ticket record.
///
/// Holds a read-only handle to the [`EventRegistry`] for price, whitelist and
/// resale-cap resolution. Lock discipline: at most one store lock is held at
/// a time — the registry's lock and the ledger's lock are never nested — so
/// the two-store system cannot deadlock. Mutations re-validate under the
/// write lock, which gives serializable behavior per ticket.
pub struct TicketLedger {
    book: RwLock<TicketBook>,
    registry: Arc<EventRegistry>,
}

impl TicketLedger {
    pub fn new(registry: Arc<EventRegistry>) -> Self {
        Self {
            book: RwLock::new(TicketBook {
                tickets: HashMap::new(),
                next_ticket_id: 1,
            }),
            registry,
        }
    }

    /// Rebuild a ledger from previously captured records (snapshot restore).
    pub fn from_tickets(
        tickets: HashMap<TicketId, Ticket>,
        next_ticket_id: u64,
        registry: Arc<EventRegistry>,
    ) -> Self {
        Self {
            book: RwLock::new(TicketBook {
                tickets,
                next_ticket_id,
            }),
            registry,
        }
    }

    /// Clone out every record and the id counter (snapshot capture).
    pub fn export_tickets(&self) -> (HashMap<TicketId, Ticket>, u64) {
        let book = self.book.read().unwrap();
        (book.tickets.clone(), book.next_ticket_id)
    }

    pub fn registry(&self) -> &Arc<EventRegistry> {
        &self.registry
    }

    /// Purchase a ticket: reserve a sale with the registry, then mint.
    ///
    /// The reservation carries every fallible check (unknown event,
    /// whitelist, availability) and commits the sale atomically; the mint
    /// that follows cannot fail, so a purchase is all-or-nothing — no
    /// failure path leaves a reserved-but-unminted or minted-but-unreserved
    /// state behind.
    pub fn purchase_ticket(
        &self,
        buyer: Principal,
        params: PurchaseTicket,
        now: DateTime<Utc>,
    ) -> LedgerResult<TicketId> {
        let charged = self.registry.reserve_sale(params.event_id, buyer)?;

        let mut book = self.book.write().unwrap();
        let id = TicketId::new(book.next_ticket_id);
        book.next_ticket_id += 1;

        let event_id = params.event_id;
        let ticket = Ticket::mint(id, buyer, params.into_metadata(), charged, now);
        book.tickets.insert(id, ticket);

        tracing::info!(ticket_id = %id, event_id = %event_id, buyer = %buyer, charged_e8s = charged, "ticket minted");

        Ok(id)
    }

    /// Transfer a ticket to `to`.
    ///
    /// `declared_price` is the claimed sale price: when present and the
    /// event carries a resale multiplier, it must not exceed
    /// `round(original_price * multiplier)`. When absent the cap is not
    /// checked (gifting at an undeclared value is always permitted).
    pub fn transfer_ticket(
        &self,
        caller: Principal,
        ticket_id: TicketId,
        to: Principal,
        declared_price: Option<u64>,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        // Resolve the cap policy without holding the book lock across the
        // registry call.
        let event_id = {
            let book = self.book.read().unwrap();
            let ticket = book.tickets.get(&ticket_id).ok_or(LedgerError::NotFound)?;
            if ticket.owner != caller {
                return Err(LedgerError::Unauthorized);
            }
            ticket.metadata.event_id
        };
        let multiplier = self.registry.get_event(event_id)?.max_resale_multiplier;

        let mut book = self.book.write().unwrap();
        let ticket = book.tickets.get_mut(&ticket_id).ok_or(LedgerError::NotFound)?;
        // Re-validate: a concurrent transfer may have moved the ticket
        // between the read above and this write lock.
        if ticket.owner != caller {
            return Err(LedgerError::Unauthorized);
        }

        if let (Some(declared), Some(m)) = (declared_price, multiplier) {
            let cap = (ticket.original_price as f64 * m).round() as u64;
            if declared > cap {
                return Err(LedgerError::PriceCapExceeded {
                    declared_e8s: declared,
                    cap_e8s: cap,
                });
            }
        }

        ticket.record_transfer(to, now);
        tracing::info!(ticket_id = %ticket_id, from = %caller, to = %to, "ticket transferred");

        Ok(())
    }

    pub fn get_ticket(&self, id: TicketId) -> LedgerResult<Ticket> {
        self.book
            .read()
            .unwrap()
            .tickets
            .get(&id)
            .cloned()
            .ok_or(LedgerError::NotFound)
    }

    pub fn icrc7_owner_of(&self, id: TicketId) -> LedgerResult<Principal> {
        self.book
            .read()
            .unwrap()
            .tickets
            .get(&id)
            .map(|t| t.owner)
            .ok_or(LedgerError::NotFound)
    }

    pub fn icrc7_metadata(&self, id: TicketId) -> LedgerResult<TicketMetadata> {
        self.book
            .read()
            .unwrap()
            .tickets
            .get(&id)
            .map(|t| t.metadata.clone())
            .ok_or(LedgerError::NotFound)
    }

    pub fn icrc7_transfer_history(&self, id: TicketId) -> LedgerResult<Vec<TransferRecord>> {
        self.book
            .read()
            .unwrap()
            .tickets
            .get(&id)
            .map(|t| t.transfer_history.clone())
            .ok_or(LedgerError::NotFound)
    }

    /// Snapshot scan; no ordering guarantee.
    pub fn tickets_by_owner(&self, owner: Principal) -> Vec<Ticket> {
        self.book
            .read()
            .unwrap()
            .tickets
            .values()
            .filter(|t| t.owner == owner)
            .cloned()
            .collect()
    }
}

impl std::fmt::Debug for TicketLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let book = self.book.read().unwrap();
        f.debug_struct("TicketLedger")
            .field("tickets", &book.tickets.len())
            .field("next_ticket_id", &book.next_ticket_id)
            .finish_non_exhaustive()
    }
}
