use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    CatalogEntry, Event, NewTransaction, Profile, TicketStatus, TicketUnit, Transaction,
};
use crate::store::ledger::{FinalizeOutcome, InsertOutcome, LedgerStore, StoreError};

/// Postgres-backed ledger. One struct owns both the settlement operations
/// (the `LedgerStore` impl) and the catalog/listing queries the HTTP surface
/// reads — they share the schema, so they live together.
#[derive(Clone)]
pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Active catalog, one row per listing. Availability is the live count
    /// of active units; nothing is materialized.
    pub async fn catalog(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        let entries = sqlx::query_as::<_, CatalogEntry>(
            r#"
            SELECT u.ticket_id,
                   u.event_id,
                   e.name      AS event_name,
                   e.datetime  AS event_datetime,
                   e.image_url,
                   MIN(u.current_price) AS current_price,
                   COUNT(*)    AS quantity_available
            FROM ticket_units u
            JOIN events e ON e.id = u.event_id
            WHERE u.status = 'active'
            GROUP BY u.ticket_id, u.event_id, e.name, e.datetime, e.image_url
            ORDER BY e.datetime ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Insert `quantity` active units sharing a fresh grouping key.
    pub async fn create_listing(
        &self,
        owner: Uuid,
        event_id: Uuid,
        price: Decimal,
        quantity: i32,
    ) -> Result<Vec<TicketUnit>, StoreError> {
        let ticket_id = Uuid::new_v4();
        let units = sqlx::query_as::<_, TicketUnit>(
            r#"
            INSERT INTO ticket_units (ticket_id, event_id, owner_user_id, current_price)
            SELECT $1, $2, $3, $4 FROM generate_series(1, $5)
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(event_id)
        .bind(owner)
        .bind(price)
        .bind(quantity)
        .fetch_all(&self.pool)
        .await?;

        Ok(units)
    }

    /// Re-price an active unit the caller owns. Price is mutable until sold.
    pub async fn update_price(
        &self,
        unit_id: Uuid,
        owner: Uuid,
        new_price: Decimal,
    ) -> Result<Option<TicketUnit>, StoreError> {
        let unit = sqlx::query_as::<_, TicketUnit>(
            r#"
            UPDATE ticket_units
            SET current_price = $3, updated_at = now()
            WHERE id = $1 AND owner_user_id = $2 AND status = 'active'
            RETURNING *
            "#,
        )
        .bind(unit_id)
        .bind(owner)
        .bind(new_price)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unit)
    }

    /// Remove an active unit the caller owns. `removed` is terminal.
    pub async fn remove_unit(
        &self,
        unit_id: Uuid,
        owner: Uuid,
    ) -> Result<Option<TicketUnit>, StoreError> {
        let unit = sqlx::query_as::<_, TicketUnit>(
            r#"
            UPDATE ticket_units
            SET status = 'removed', updated_at = now()
            WHERE id = $1 AND owner_user_id = $2 AND status = 'active'
            RETURNING *
            "#,
        )
        .bind(unit_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unit)
    }

    pub async fn purchases_for(&self, buyer: Uuid) -> Result<Vec<Transaction>, StoreError> {
        let txs = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE buyer_id = $1 ORDER BY created_at DESC",
        )
        .bind(buyer)
        .fetch_all(&self.pool)
        .await?;

        Ok(txs)
    }

    pub async fn units_for_owner(&self, owner: Uuid) -> Result<Vec<TicketUnit>, StoreError> {
        let units = sqlx::query_as::<_, TicketUnit>(
            "SELECT * FROM ticket_units WHERE owner_user_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(units)
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let events =
            sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY datetime ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(events)
    }

    pub async fn create_event(
        &self,
        name: &str,
        datetime: chrono::DateTime<chrono::Utc>,
        venue: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<Event, StoreError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (name, datetime, venue, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(datetime)
        .bind(venue)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }
}

#[async_trait]
impl LedgerStore for PgLedger {
    async fn get_unit(&self, id: Uuid) -> Result<Option<TicketUnit>, StoreError> {
        let unit =
            sqlx::query_as::<_, TicketUnit>("SELECT * FROM ticket_units WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(unit)
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    async fn set_balance(&self, id: Uuid, new_balance: Decimal) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE profiles SET balance = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(new_balance)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound("profile"));
        }
        Ok(())
    }

    async fn increment_balance(&self, id: Uuid, delta: Decimal) -> Result<(), StoreError> {
        // Relative update on the store side; concurrent credits to the same
        // seller must not lose each other.
        let result = sqlx::query(
            "UPDATE profiles SET balance = balance + $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(delta)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound("profile"));
        }
        Ok(())
    }

    async fn insert_transaction(
        &self,
        new: &NewTransaction,
    ) -> Result<InsertOutcome, StoreError> {
        let inserted = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions
                (ticket_id, buyer_id, seller_id, unit_price, quantity, total_price, idempotency_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(new.ticket_id)
        .bind(new.buyer_id)
        .bind(new.seller_id)
        .bind(new.unit_price)
        .bind(new.quantity)
        .bind(new.total_price)
        .bind(&new.idempotency_key)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(tx) => Ok(InsertOutcome::Inserted(tx)),
            Err(e) => {
                // Unique violation on idempotency_key means a duplicate
                // submission raced us here.
                let duplicate = e
                    .as_database_error()
                    .map_or(false, |db| db.is_unique_violation());
                if duplicate {
                    Ok(InsertOutcome::DuplicateKey)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn find_transaction_by_key(
        &self,
        idempotency_key: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        let tx = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE idempotency_key = $1",
        )
        .bind(idempotency_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tx)
    }

    async fn finalize_unit(
        &self,
        unit_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<FinalizeOutcome, StoreError> {
        // Status flip and transaction linkage in one guarded statement:
        // only the first committer sees an active row.
        let result = sqlx::query(
            r#"
            UPDATE ticket_units
            SET status = $3, transaction_id = $2, updated_at = now()
            WHERE id = $1 AND status = 'active'
            "#,
        )
        .bind(unit_id)
        .bind(transaction_id)
        .bind(TicketStatus::Sold)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(FinalizeOutcome::AlreadyFinalized)
        } else {
            Ok(FinalizeOutcome::Finalized)
        }
    }
}
