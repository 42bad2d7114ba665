//! Store wiring behind the HTTP handlers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use boxoffice_core::{EventId, LedgerResult, Principal, TicketId};
use boxoffice_ledger::{PurchaseTicket, Snapshot, Ticket, TicketLedger, TicketMetadata, TransferRecord};
use boxoffice_registry::{CreateEvent, Event, EventRegistry, PayoutGateway, RecordingPayouts};

/// Facade owning the wired registry/ledger pair.
///
/// Handlers never touch the stores directly; this is also where the current
/// instant is sampled, so the core underneath stays deterministic.
pub struct AppServices {
    registry: Arc<EventRegistry>,
    ledger: TicketLedger,
    snapshot_path: Option<PathBuf>,
}

impl AppServices {
    pub fn new(payouts: Arc<dyn PayoutGateway>, snapshot_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let (registry, ledger) = match &snapshot_path {
            Some(path) => match Snapshot::load(path).context("load snapshot")? {
                Some(snapshot) => {
                    tracing::info!(path = %path.display(), "restoring from snapshot");
                    snapshot.restore(payouts)
                }
                None => Self::fresh(payouts),
            },
            None => Self::fresh(payouts),
        };

        Ok(Self {
            registry,
            ledger,
            snapshot_path,
        })
    }

    fn fresh(payouts: Arc<dyn PayoutGateway>) -> (Arc<EventRegistry>, TicketLedger) {
        let registry = Arc::new(EventRegistry::new(payouts));
        let ledger = TicketLedger::new(registry.clone());
        (registry, ledger)
    }

    /// Persist the current state if a snapshot path is configured.
    pub fn save_snapshot(&self) -> anyhow::Result<()> {
        if let Some(path) = &self.snapshot_path {
            Snapshot::capture(&self.registry, &self.ledger).save(path)?;
        }
        Ok(())
    }

    pub fn create_event(&self, organizer: Principal, params: CreateEvent) -> LedgerResult<EventId> {
        self.registry.create_event(organizer, params, Utc::now())
    }

    pub fn get_event(&self, id: EventId) -> LedgerResult<Event> {
        self.registry.get_event(id)
    }

    pub fn events_by_organizer(&self, organizer: Principal) -> Vec<Event> {
        self.registry.events_by_organizer(organizer)
    }

    pub fn withdraw_funds(&self, event_id: EventId, amount_e8s: u64, caller: Principal) -> LedgerResult<()> {
        self.registry.withdraw_funds(event_id, amount_e8s, caller)
    }

    pub fn purchase_ticket(&self, buyer: Principal, params: PurchaseTicket) -> LedgerResult<TicketId> {
        self.ledger.purchase_ticket(buyer, params, Utc::now())
    }

    pub fn transfer_ticket(
        &self,
        caller: Principal,
        ticket_id: TicketId,
        to: Principal,
        declared_price: Option<u64>,
    ) -> LedgerResult<()> {
        self.ledger
            .transfer_ticket(caller, ticket_id, to, declared_price, Utc::now())
    }

    pub fn get_ticket(&self, id: TicketId) -> LedgerResult<Ticket> {
        self.ledger.get_ticket(id)
    }

    pub fn tickets_by_owner(&self, owner: Principal) -> Vec<Ticket> {
        self.ledger.tickets_by_owner(owner)
    }

    pub fn icrc7_owner_of(&self, id: TicketId) -> LedgerResult<Principal> {
        self.ledger.icrc7_owner_of(id)
    }

    pub fn icrc7_metadata(&self, id: TicketId) -> LedgerResult<TicketMetadata> {
        self.ledger.icrc7_metadata(id)
    }

    pub fn icrc7_transfer_history(&self, id: TicketId) -> LedgerResult<Vec<TransferRecord>> {
        self.ledger.icrc7_transfer_history(id)
    }
}

/// Build services from environment configuration.
///
/// `BOXOFFICE_SNAPSHOT_PATH` — optional; when set, state is restored from it
/// at startup and saved to it on graceful shutdown.
pub fn build_services() -> anyhow::Result<AppServices> {
    let snapshot_path = std::env::var("BOXOFFICE_SNAPSHOT_PATH").ok().map(PathBuf::from);
    if snapshot_path.is_none() {
        tracing::warn!("BOXOFFICE_SNAPSHOT_PATH not set; state will not survive restarts");
    }
    AppServices::new(RecordingPayouts::arc(), snapshot_path)
}
