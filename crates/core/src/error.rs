//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger core.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// This is the closed taxonomy every operation reports through. All variants
/// are deterministic business failures; none is retryable by the core itself
/// (the caller decides whether to retry), and a failed operation never leaves
/// the store mutated. Infrastructure concerns (snapshot IO, bind failures)
/// belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Malformed or out-of-range creation parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Reference to an unknown event or ticket id.
    #[error("not found")]
    NotFound,

    /// No remaining inventory at purchase time.
    #[error("sold out")]
    SoldOut,

    /// Buyer absent from a restricted event's access list.
    #[error("not on whitelist")]
    NotWhitelisted,

    /// Caller lacks the required relationship (organizer/owner).
    #[error("unauthorized")]
    Unauthorized,

    /// Declared resale price exceeds the event's resale multiplier policy.
    #[error("declared price {declared_e8s} exceeds resale cap of {cap_e8s}")]
    PriceCapExceeded { declared_e8s: u64, cap_e8s: u64 },

    /// Withdrawal amount exceeds available collected funds.
    #[error("insufficient funds: requested {requested_e8s}, available {available_e8s}")]
    InsufficientFunds {
        requested_e8s: u64,
        available_e8s: u64,
    },

    /// The external payout collaborator rejected a release. The balance
    /// decrement has already been rolled back when this surfaces.
    #[error("payout failed: {0}")]
    PayoutFailed(String),
}

impl LedgerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn payout_failed(msg: impl Into<String>) -> Self {
        Self::PayoutFailed(msg.into())
    }
}
