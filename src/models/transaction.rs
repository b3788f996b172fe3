use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Immutable audit record of one settlement. Created exactly once per
/// successful attempt, never updated or deleted; the unique constraint on
/// `idempotency_key` is the system's exactly-once guarantee under retries.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    /// The unit sold.
    pub ticket_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub total_price: Decimal,
    pub idempotency_key: String,
    pub created_at: DateTime<Utc>,
}

/// Fields the settlement engine supplies; the store assigns id/timestamp.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub ticket_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub total_price: Decimal,
    pub idempotency_key: String,
}
