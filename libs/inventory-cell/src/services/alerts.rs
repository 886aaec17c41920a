// =====================================================================================
// LOW-STOCK NOTIFIERS
// =====================================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use shared_config::AppConfig;
use shared_models::entities::Medicine;

use crate::models::{LowStockEvent, NotifierError};

/// Receives an event whenever a medicine is at or under its minimum threshold.
#[async_trait]
pub trait LowStockNotifier: Send + Sync {
    async fn notify(&self, event: &LowStockEvent) -> Result<(), NotifierError>;
}

/// Always-on notifier that records the event in the service log.
#[derive(Debug, Default, Clone)]
pub struct LoggingLowStockNotifier;

#[async_trait]
impl LowStockNotifier for LoggingLowStockNotifier {
    async fn notify(&self, event: &LowStockEvent) -> Result<(), NotifierError> {
        warn!(
            medicine_id = %event.medicine_id,
            quantity = event.quantity,
            minimum_threshold = event.minimum_threshold,
            "Low stock: {}",
            event.name
        );
        Ok(())
    }
}

/// POSTs each event as JSON to a configured endpoint.
pub struct WebhookLowStockNotifier {
    client: Client,
    url: String,
}

impl WebhookLowStockNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotifierError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl LowStockNotifier for WebhookLowStockNotifier {
    async fn notify(&self, event: &LowStockEvent) -> Result<(), NotifierError> {
        debug!("Sending low-stock webhook for {} to {}", event.medicine_id, self.url);

        let response = self.client.post(&self.url).json(event).send().await?;

        if !response.status().is_success() {
            return Err(NotifierError::Status(response.status().as_u16()));
        }

        info!("Low-stock webhook delivered for {}", event.medicine_id);
        Ok(())
    }
}

/// Fans one event out to every configured notifier. A failing notifier does
/// not stop the others.
pub struct LowStockAlerts {
    notifiers: Vec<Arc<dyn LowStockNotifier>>,
}

impl LowStockAlerts {
    pub fn new(notifiers: Vec<Arc<dyn LowStockNotifier>>) -> Self {
        Self { notifiers }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let mut notifiers: Vec<Arc<dyn LowStockNotifier>> = vec![Arc::new(LoggingLowStockNotifier)];

        if let Some(url) = config.low_stock_webhook_url.as_deref() {
            let timeout = Duration::from_secs(config.low_stock_webhook_timeout_secs);
            match WebhookLowStockNotifier::new(url, timeout) {
                Ok(webhook) => notifiers.push(Arc::new(webhook)),
                Err(e) => error!("Low-stock webhook disabled: {}", e),
            }
        }

        Self::new(notifiers)
    }

    /// Emits an event for `medicine` if it is low on stock. Delivery errors
    /// are logged and swallowed.
    pub async fn check(&self, medicine: &Medicine) {
        if !medicine.is_low_stock() {
            return;
        }

        let event = LowStockEvent::from(medicine);
        for notifier in &self.notifiers {
            if let Err(e) = notifier.notify(&event).await {
                error!("Low-stock notification for {} failed: {}", medicine.id, e);
            }
        }
    }
}
