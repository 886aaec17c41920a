use std::env;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub clinic_name: String,
    pub currency: String,
    pub low_stock_webhook_url: Option<String>,
    pub low_stock_webhook_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            clinic_name: "Smart Clinic".to_string(),
            currency: "EUR".to_string(),
            low_stock_webhook_url: None,
            low_stock_webhook_timeout_secs: 5,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            host: var_or_default("CLINIC_HOST", &defaults.host),
            port: parse_or_default("CLINIC_PORT", defaults.port),
            clinic_name: var_or_default("CLINIC_NAME", &defaults.clinic_name),
            currency: var_or_default("CLINIC_CURRENCY", &defaults.currency),
            low_stock_webhook_url: env::var("LOW_STOCK_WEBHOOK_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            low_stock_webhook_timeout_secs: parse_or_default(
                "LOW_STOCK_WEBHOOK_TIMEOUT_SECS",
                defaults.low_stock_webhook_timeout_secs,
            ),
        };

        if !config.is_webhook_configured() {
            warn!("LOW_STOCK_WEBHOOK_URL not set - low stock alerts will only be logged");
        }

        config
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_webhook_configured(&self) -> bool {
        self.low_stock_webhook_url
            .as_deref()
            .map(|url| !url.is_empty())
            .unwrap_or(false)
    }
}

fn var_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using default {}", key, default);
        default.to_string()
    })
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => {
            warn!("{} not set, using default {}", key, default);
            default
        }
    }
}
