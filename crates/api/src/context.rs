use boxoffice_core::Principal;

/// Caller context for a request (verified identity).
///
/// This is immutable and must be present for all mutating routes. The
/// principal arrives pre-verified from the external authentication
/// collaborator; the core performs authorization only.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CallerContext {
    principal: Principal,
}

impl CallerContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> Principal {
        self.principal
    }
}
