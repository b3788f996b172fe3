use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewTransaction, Profile, TicketUnit, Transaction};

/// A ledger-store call failed for reasons unrelated to the request itself.
/// Propagated verbatim by the settlement engine, no retry, no classification.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("row not found: {0}")]
    RowNotFound(&'static str),
}

/// Result of inserting a transaction under the idempotency unique index.
#[derive(Debug)]
pub enum InsertOutcome {
    Inserted(Transaction),
    /// The unique constraint fired: this logical attempt already settled.
    DuplicateKey,
}

/// Result of the guarded unit finalize.
#[derive(Debug, PartialEq, Eq)]
pub enum FinalizeOutcome {
    Finalized,
    /// The unit was no longer active; a competing attempt won it.
    AlreadyFinalized,
}

/// The store operations the settlement engine consumes. Each call maps to a
/// single atomic statement on the store side; there is deliberately no
/// multi-operation transaction here (see the settlement module docs).
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn get_unit(&self, id: Uuid) -> Result<Option<TicketUnit>, StoreError>;

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// Absolute set, used for the buyer debit. The engine computes the new
    /// balance after its sufficiency check.
    async fn set_balance(&self, id: Uuid, new_balance: Decimal) -> Result<(), StoreError>;

    /// Atomic relative update, used for the seller credit. Must be a single
    /// store-side `balance = balance + delta`, never read-then-write: many
    /// concurrent sales may credit the same seller.
    async fn increment_balance(&self, id: Uuid, delta: Decimal) -> Result<(), StoreError>;

    async fn insert_transaction(&self, new: &NewTransaction)
        -> Result<InsertOutcome, StoreError>;

    async fn find_transaction_by_key(
        &self,
        idempotency_key: &str,
    ) -> Result<Option<Transaction>, StoreError>;

    /// Flip the unit to sold and link the transaction in one statement,
    /// guarded on `status = active` so only the first finalize wins.
    async fn finalize_unit(
        &self,
        unit_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<FinalizeOutcome, StoreError>;
}
