use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::qr::QrReplacer;
use crate::settlement::SettlementEngine;
use crate::store::PgLedger;

/// Process-wide handles, built once at startup and injected into handlers.
/// The settlement engine gets the ledger explicitly rather than reaching
/// for a global, which keeps it testable against other store impls.
#[derive(Clone)]
pub struct AppState {
    pub ledger: PgLedger,
    pub engine: Arc<SettlementEngine<PgLedger>>,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let ledger = PgLedger::new(pool);
        let qr = QrReplacer::from_env_value(config.qr_service_url.clone());
        let engine = Arc::new(SettlementEngine::new(Arc::new(ledger.clone()), qr));

        Self { ledger, engine }
    }
}
