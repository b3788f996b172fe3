use serde_json::json;
use uuid::Uuid;

/// Fire-and-forget client for the external QR replacement service.
///
/// Redemption-code rotation is security hygiene, not a condition of sale:
/// the call runs on its own task, and any failure is logged and dropped so
/// a third-party outage can never block or reverse a settlement.
#[derive(Clone)]
pub struct QrReplacer {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl QrReplacer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: Some(endpoint.into()),
        }
    }

    /// No endpoint configured: `spawn_replace` becomes a no-op. Used in
    /// tests and when `QR_SERVICE_URL` is unset.
    pub fn disabled() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: None,
        }
    }

    pub fn from_env_value(endpoint: Option<String>) -> Self {
        match endpoint {
            Some(url) if !url.trim().is_empty() => Self::new(url),
            _ => {
                tracing::info!("QR replacement disabled (QR_SERVICE_URL not set)");
                Self::disabled()
            }
        }
    }

    /// Ask the QR service to rotate the redemption code for a sold unit.
    /// Best-effort: the settlement result is already decided by the time
    /// this is spawned.
    pub fn spawn_replace(&self, unit_id: Uuid) {
        let Some(endpoint) = self.endpoint.clone() else {
            return;
        };
        let client = self.client.clone();

        tokio::spawn(async move {
            let result = client
                .post(&endpoint)
                .json(&json!({ "ticket_id": unit_id }))
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(%unit_id, "QR replacement requested");
                }
                Ok(response) => {
                    tracing::warn!(
                        %unit_id,
                        status = %response.status(),
                        "QR replacement request rejected"
                    );
                }
                Err(e) => {
                    tracing::warn!(%unit_id, error = %e, "QR replacement request failed");
                }
            }
        });
    }
}
