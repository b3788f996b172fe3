use thiserror::Error;

use crate::store::StoreError;

/// Closed error taxonomy for one purchase attempt.
///
/// The first six are precondition failures the buyer can act on; `Conflict`
/// is a settlement race resolved against the caller; `Store` is any
/// infrastructure failure, propagated verbatim with no retry and — by
/// design of the naive flow — no compensation of steps already applied.
#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("You must be logged in.")]
    NotAuthenticated,

    #[error("Ticket not found.")]
    NotFound,

    #[error("Your profile was not found.")]
    ProfileNotFound,

    #[error("You can't buy your own ticket.")]
    SelfPurchaseForbidden,

    #[error("Ticket is not active.")]
    NotActive,

    #[error("Not enough quantity.")]
    InsufficientInventory,

    #[error("Insufficient balance.")]
    InsufficientBalance,

    #[error("Ticket was sold to another buyer.")]
    Conflict,

    #[error(transparent)]
    Store(#[from] StoreError),
}
