use std::env;
use tracing::warn;

pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com/v1";
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    pub payment_currency: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            jwt_secret: String::new(),
            jwt_expiry_hours: DEFAULT_JWT_EXPIRY_HOURS,
            stripe_secret_key: String::new(),
            stripe_api_base: DEFAULT_STRIPE_API_BASE.to_string(),
            payment_currency: "usd".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, falling back to the in-memory store");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("ACCESS_TOKEN")
                .unwrap_or_else(|_| {
                    warn!("ACCESS_TOKEN not set, token issuance will fail");
                    String::new()
                }),
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRY_HOURS),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY")
                .unwrap_or_else(|_| {
                    warn!("STRIPE_SECRET_KEY not set, payment intents are disabled");
                    String::new()
                }),
            stripe_api_base: env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| DEFAULT_STRIPE_API_BASE.to_string()),
            payment_currency: env::var("PAYMENT_CURRENCY")
                .unwrap_or_else(|_| "usd".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or_else(|| {
                    warn!("PORT not set or invalid, using default {}", DEFAULT_PORT);
                    DEFAULT_PORT
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        self.is_store_configured()
            && self.is_payments_configured()
            && !self.jwt_secret.is_empty()
    }

    pub fn is_store_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
    }

    pub fn is_payments_configured(&self) -> bool {
        !self.stripe_secret_key.is_empty() && !self.stripe_api_base.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_one_day_tokens_and_usd() {
        let config = AppConfig::default();

        assert_eq!(config.jwt_expiry_hours, 24);
        assert_eq!(config.payment_currency, "usd");
        assert_eq!(config.port, 5000);
        assert!(!config.is_store_configured());
        assert!(!config.is_configured());
    }

    #[test]
    fn store_needs_url_and_key() {
        let config = AppConfig {
            supabase_url: "http://localhost:54321".to_string(),
            ..AppConfig::default()
        };
        assert!(!config.is_store_configured());

        let config = AppConfig {
            supabase_service_key: "service-key".to_string(),
            ..config
        };
        assert!(config.is_store_configured());
    }
}
