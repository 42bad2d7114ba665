//! Payout seam: the external collaborator that releases withdrawn funds.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use boxoffice_core::{EventId, Principal};

/// The payout collaborator rejected a release.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("payout rejected: {0}")]
pub struct PayoutError(pub String);

impl PayoutError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Abstraction over whatever actually moves money to an organizer.
///
/// Called by the registry *inside* its withdrawal transaction, after the
/// balance decrement: a rejection rolls the decrement back before the error
/// surfaces. Implementations must therefore be bounded (no unbounded waits)
/// and must not call back into the registry.
pub trait PayoutGateway: Send + Sync {
    fn release(&self, event_id: EventId, to: Principal, amount_e8s: u64)
        -> Result<(), PayoutError>;
}

/// A released payout, as recorded by [`RecordingPayouts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasedPayout {
    pub event_id: EventId,
    pub to: Principal,
    pub amount_e8s: u64,
}

/// In-memory gateway for tests/dev: accepts every release and records it.
#[derive(Debug, Default)]
pub struct RecordingPayouts {
    released: Mutex<Vec<ReleasedPayout>>,
}

impl RecordingPayouts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn released(&self) -> Vec<ReleasedPayout> {
        self.released.lock().unwrap().clone()
    }
}

impl PayoutGateway for RecordingPayouts {
    fn release(
        &self,
        event_id: EventId,
        to: Principal,
        amount_e8s: u64,
    ) -> Result<(), PayoutError> {
        self.released.lock().unwrap().push(ReleasedPayout {
            event_id,
            to,
            amount_e8s,
        });
        Ok(())
    }
}
