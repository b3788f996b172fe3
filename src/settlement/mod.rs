pub mod engine;
pub mod error;

pub use engine::SettlementEngine;
pub use error::PurchaseError;
