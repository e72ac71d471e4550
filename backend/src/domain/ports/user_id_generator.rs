//! Port for minting identifiers for newly registered users.

use crate::domain::UserId;

/// Source of fresh, unique user identifiers.
#[cfg_attr(test, mockall::automock)]
pub trait UserIdGenerator: Send + Sync {
    /// Produce an identifier that has not been handed out before.
    fn next_id(&self) -> UserId;
}

/// Generator backed by random UUID v4 values.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidUserIdGenerator;

impl UserIdGenerator for UuidUserIdGenerator {
    fn next_id(&self) -> UserId {
        UserId::random()
    }
}
