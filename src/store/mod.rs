pub mod ledger;
pub mod postgres;

pub use ledger::{FinalizeOutcome, InsertOutcome, LedgerStore, StoreError};
pub use postgres::PgLedger;
