//! Whole-store snapshot persistence.
//!
//! The operation contracts must hold across process restarts, so the full
//! state (both record maps plus the monotonic ticket-id counter) can be
//! captured into a single JSON document and restored on boot. Writes go to a
//! temp file in the target directory followed by a rename, so a crash
//! mid-save never corrupts the previous snapshot.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use boxoffice_core::{EventId, TicketId};
use boxoffice_registry::{Event, EventRegistry, PayoutGateway};

use crate::ledger::TicketLedger;
use crate::ticket::Ticket;

/// A point-in-time capture of the whole store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub events: HashMap<EventId, Event>,
    pub tickets: HashMap<TicketId, Ticket>,
    pub next_ticket_id: u64,
}

impl Snapshot {
    /// Capture the current committed state of both stores.
    ///
    /// Each store is read under its own lock; callers wanting a snapshot
    /// consistent across both should quiesce mutations first (the api crate
    /// saves during shutdown, after the server has stopped).
    pub fn capture(registry: &EventRegistry, ledger: &TicketLedger) -> Self {
        let events = registry.export_events();
        let (tickets, next_ticket_id) = ledger.export_tickets();
        Self {
            events,
            tickets,
            next_ticket_id,
        }
    }

    /// Rebuild a registry/ledger pair from this snapshot.
    pub fn restore(self, payouts: Arc<dyn PayoutGateway>) -> (Arc<EventRegistry>, TicketLedger) {
        let registry = Arc::new(EventRegistry::from_events(self.events, payouts));
        let ledger = TicketLedger::from_tickets(self.tickets, self.next_ticket_id, registry.clone());
        (registry, ledger)
    }

    /// Write the snapshot to `path` (temp file + rename).
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(self).context("serialize snapshot")?;

        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, &json)
            .with_context(|| format!("write snapshot temp file {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("rename snapshot into place at {}", path.display()))?;

        tracing::info!(path = %path.display(), events = self.events.len(), tickets = self.tickets.len(), "snapshot saved");
        Ok(())
    }

    /// Read a snapshot from `path`; `Ok(None)` when no snapshot exists yet.
    pub fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("read snapshot {}", path.display()));
            }
        };
        let snapshot = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse snapshot {}", path.display()))?;
        Ok(Some(snapshot))
    }
}
