// Shared fixtures for the settlement tests: an in-memory LedgerStore with
// the same per-operation atomicity as the real store (every trait method
// takes the state lock once, like a single SQL statement), plus seed
// helpers for profiles and units.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use seatswap_server::models::{NewTransaction, Profile, TicketStatus, TicketUnit, Transaction};
use seatswap_server::qr::QrReplacer;
use seatswap_server::settlement::SettlementEngine;
use seatswap_server::store::{FinalizeOutcome, InsertOutcome, LedgerStore, StoreError};

#[derive(Default)]
pub struct MemoryLedger {
    inner: Mutex<State>,
}

#[derive(Default)]
struct State {
    units: HashMap<Uuid, TicketUnit>,
    profiles: HashMap<Uuid, Profile>,
    transactions: Vec<Transaction>,
}

impl MemoryLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_profile(&self, balance: Decimal) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let profile = Profile {
            id,
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
            balance,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().profiles.insert(id, profile);
        id
    }

    pub fn add_unit(&self, owner: Uuid, price: Decimal, status: TicketStatus) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let unit = TicketUnit {
            id,
            ticket_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            owner_user_id: owner,
            current_price: price,
            status,
            transaction_id: None,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().units.insert(id, unit);
        id
    }

    pub fn balance_of(&self, id: Uuid) -> Decimal {
        self.inner.lock().unwrap().profiles[&id].balance
    }

    pub fn unit(&self, id: Uuid) -> TicketUnit {
        self.inner.lock().unwrap().units[&id].clone()
    }

    pub fn transaction_count(&self) -> usize {
        self.inner.lock().unwrap().transactions.len()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn get_unit(&self, id: Uuid) -> Result<Option<TicketUnit>, StoreError> {
        Ok(self.inner.lock().unwrap().units.get(&id).cloned())
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.inner.lock().unwrap().profiles.get(&id).cloned())
    }

    async fn set_balance(&self, id: Uuid, new_balance: Decimal) -> Result<(), StoreError> {
        let mut state = self.inner.lock().unwrap();
        let profile = state
            .profiles
            .get_mut(&id)
            .ok_or(StoreError::RowNotFound("profile"))?;
        profile.balance = new_balance;
        Ok(())
    }

    async fn increment_balance(&self, id: Uuid, delta: Decimal) -> Result<(), StoreError> {
        let mut state = self.inner.lock().unwrap();
        let profile = state
            .profiles
            .get_mut(&id)
            .ok_or(StoreError::RowNotFound("profile"))?;
        profile.balance += delta;
        Ok(())
    }

    async fn insert_transaction(
        &self,
        new: &NewTransaction,
    ) -> Result<InsertOutcome, StoreError> {
        let mut state = self.inner.lock().unwrap();
        if state
            .transactions
            .iter()
            .any(|t| t.idempotency_key == new.idempotency_key)
        {
            return Ok(InsertOutcome::DuplicateKey);
        }

        let tx = Transaction {
            id: Uuid::new_v4(),
            ticket_id: new.ticket_id,
            buyer_id: new.buyer_id,
            seller_id: new.seller_id,
            unit_price: new.unit_price,
            quantity: new.quantity,
            total_price: new.total_price,
            idempotency_key: new.idempotency_key.clone(),
            created_at: Utc::now(),
        };
        state.transactions.push(tx.clone());
        Ok(InsertOutcome::Inserted(tx))
    }

    async fn find_transaction_by_key(
        &self,
        idempotency_key: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .transactions
            .iter()
            .find(|t| t.idempotency_key == idempotency_key)
            .cloned())
    }

    async fn finalize_unit(
        &self,
        unit_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<FinalizeOutcome, StoreError> {
        let mut state = self.inner.lock().unwrap();
        let unit = state
            .units
            .get_mut(&unit_id)
            .ok_or(StoreError::RowNotFound("ticket_unit"))?;

        if unit.status != TicketStatus::Active {
            return Ok(FinalizeOutcome::AlreadyFinalized);
        }
        unit.status = TicketStatus::Sold;
        unit.transaction_id = Some(transaction_id);
        Ok(FinalizeOutcome::Finalized)
    }
}

/// Which ledger operation should start failing, for exercising the
/// mid-sequence failure surface of the settlement flow.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    IncrementBalance,
    InsertTransaction,
    FinalizeUnit,
}

/// Delegates to a `MemoryLedger` but fails one chosen operation with an
/// infrastructure-style error, the way a dropped connection would.
pub struct FaultyLedger {
    inner: Arc<MemoryLedger>,
    fail_on: FailPoint,
}

impl FaultyLedger {
    pub fn new(inner: Arc<MemoryLedger>, fail_on: FailPoint) -> Self {
        Self { inner, fail_on }
    }

    fn fault() -> StoreError {
        StoreError::Database(sqlx::Error::PoolTimedOut)
    }
}

#[async_trait]
impl LedgerStore for FaultyLedger {
    async fn get_unit(&self, id: Uuid) -> Result<Option<TicketUnit>, StoreError> {
        self.inner.get_unit(id).await
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        self.inner.get_profile(id).await
    }

    async fn set_balance(&self, id: Uuid, new_balance: Decimal) -> Result<(), StoreError> {
        self.inner.set_balance(id, new_balance).await
    }

    async fn increment_balance(&self, id: Uuid, delta: Decimal) -> Result<(), StoreError> {
        if self.fail_on == FailPoint::IncrementBalance {
            return Err(Self::fault());
        }
        self.inner.increment_balance(id, delta).await
    }

    async fn insert_transaction(
        &self,
        new: &NewTransaction,
    ) -> Result<InsertOutcome, StoreError> {
        if self.fail_on == FailPoint::InsertTransaction {
            return Err(Self::fault());
        }
        self.inner.insert_transaction(new).await
    }

    async fn find_transaction_by_key(
        &self,
        idempotency_key: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        self.inner.find_transaction_by_key(idempotency_key).await
    }

    async fn finalize_unit(
        &self,
        unit_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<FinalizeOutcome, StoreError> {
        if self.fail_on == FailPoint::FinalizeUnit {
            return Err(Self::fault());
        }
        self.inner.finalize_unit(unit_id, transaction_id).await
    }
}

pub fn engine(ledger: Arc<MemoryLedger>) -> SettlementEngine<MemoryLedger> {
    SettlementEngine::new(ledger, QrReplacer::disabled())
}

pub fn faulty_engine(
    ledger: Arc<MemoryLedger>,
    fail_on: FailPoint,
) -> SettlementEngine<FaultyLedger> {
    SettlementEngine::new(
        Arc::new(FaultyLedger::new(ledger, fail_on)),
        QrReplacer::disabled(),
    )
}

pub fn coins(n: i64) -> Decimal {
    Decimal::new(n, 0)
}
