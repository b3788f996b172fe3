use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{NewTransaction, Transaction};
use crate::qr::QrReplacer;
use crate::settlement::PurchaseError;
use crate::store::{FinalizeOutcome, InsertOutcome, LedgerStore};

/// One sellable unit is exactly one row; its inventory is always 1.
const UNIT_INVENTORY: i32 = 1;

/// Generated once per logical purchase attempt and reused across retries of
/// that attempt; never per network call.
pub fn new_idempotency_key() -> String {
    Uuid::new_v4().to_string()
}

/// Orchestrates one purchase: validation, balance transfer, transaction
/// record, unit finalize, QR side-effect.
///
/// The steps are sequential store calls, not one wrapped transaction. The
/// consistency backstops are the unique index on the idempotency key (one
/// transaction row per logical attempt, ever) and the guarded finalize (one
/// sold transition per unit, ever). A failure mid-sequence leaves earlier
/// steps applied; the settlement integration tests pin that exact surface
/// with a fault-injecting store.
pub struct SettlementEngine<S> {
    store: Arc<S>,
    qr: QrReplacer,
}

impl<S: LedgerStore> SettlementEngine<S> {
    pub fn new(store: Arc<S>, qr: QrReplacer) -> Self {
        Self { store, qr }
    }

    /// Attempt to buy a unit at its current listed price.
    ///
    /// Safe to call more than once with the same `idempotency_key`: exactly
    /// one transaction row results, and repeat calls return that row. On
    /// success the returned transaction is the settled record, existing or
    /// newly created.
    pub async fn purchase(
        &self,
        unit_id: Uuid,
        quantity: i32,
        idempotency_key: Option<String>,
        buyer: Option<Uuid>,
    ) -> Result<Transaction, PurchaseError> {
        // Preconditions, in contract order.
        let buyer = buyer.ok_or(PurchaseError::NotAuthenticated)?;

        let unit = self
            .store
            .get_unit(unit_id)
            .await?
            .ok_or(PurchaseError::NotFound)?;

        let key = idempotency_key.unwrap_or_else(new_idempotency_key);

        // A resubmitted attempt that already settled must return its
        // transaction, not trip over the unit now being sold.
        if let Some(existing) = self.store.find_transaction_by_key(&key).await? {
            return Ok(existing);
        }

        if unit.owner_user_id == buyer {
            return Err(PurchaseError::SelfPurchaseForbidden);
        }
        if unit.status.is_terminal() {
            return Err(PurchaseError::NotActive);
        }
        if quantity != UNIT_INVENTORY {
            return Err(PurchaseError::InsufficientInventory);
        }

        let unit_price = unit.current_price;
        let total = unit_price * Decimal::from(quantity);

        // Free listings skip the balance steps entirely.
        if total > Decimal::ZERO {
            let profile = self
                .store
                .get_profile(buyer)
                .await?
                .ok_or(PurchaseError::ProfileNotFound)?;
            if profile.balance < total {
                return Err(PurchaseError::InsufficientBalance);
            }

            // Debit buyer: absolute set from the balance checked above.
            self.store.set_balance(buyer, profile.balance - total).await?;

            // Credit seller: store-side atomic increment. Many concurrent
            // sales may pay the same seller.
            self.store.increment_balance(unit.owner_user_id, total).await?;
        }

        let record = NewTransaction {
            ticket_id: unit.id,
            buyer_id: buyer,
            seller_id: unit.owner_user_id,
            unit_price,
            quantity,
            total_price: total,
            idempotency_key: key.clone(),
        };

        let tx = match self.store.insert_transaction(&record).await? {
            InsertOutcome::Inserted(tx) => tx,
            // A duplicate submission raced us past the lookup above; the
            // attempt already settled, so return its record.
            InsertOutcome::DuplicateKey => {
                return self
                    .store
                    .find_transaction_by_key(&key)
                    .await?
                    .ok_or(PurchaseError::Conflict);
            }
        };

        match self.store.finalize_unit(unit.id, tx.id).await? {
            FinalizeOutcome::Finalized => {}
            // Another attempt won the unit between our status check and
            // here; exactly one sold transition is the store's guarantee.
            FinalizeOutcome::AlreadyFinalized => return Err(PurchaseError::Conflict),
        }

        // Best-effort; never affects the settlement result.
        self.qr.spawn_replace(unit.id);

        Ok(tx)
    }
}
