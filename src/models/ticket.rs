use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of a sellable unit. `Active` is the only state a purchase may
/// proceed from; the other three are terminal — a unit never resurrects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Active,
    Sold,
    Expired,
    Removed,
}

impl TicketStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TicketStatus::Active)
    }
}

/// One physical sellable unit. Units listed together share a `ticket_id`
/// grouping key; `owner_user_id` is the seller and never changes.
/// `transaction_id` is set exactly once, when the unit transitions to sold.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketUnit {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub event_id: Uuid,
    pub owner_user_id: Uuid,
    pub current_price: Decimal,
    pub status: TicketStatus,
    pub transaction_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One catalog row per listing, aggregated on read from live unit rows.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CatalogEntry {
    pub ticket_id: Uuid,
    pub event_id: Uuid,
    pub event_name: String,
    pub event_datetime: DateTime<Utc>,
    pub image_url: Option<String>,
    pub current_price: Decimal,
    pub quantity_available: i64,
}
