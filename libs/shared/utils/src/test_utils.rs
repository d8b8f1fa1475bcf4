use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Map};
use sha2::Sha256;

use shared_config::AppConfig;
use shared_database::ClinicRepository;
use shared_models::clinic::{Booking, TreatmentOption};

use crate::state::AppState;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            ..AppConfig::default()
        }
    }

    pub fn to_state(&self, repository: Arc<dyn ClinicRepository>) -> Arc<AppState> {
        Arc::new(AppState::new(self.to_app_config(), repository))
    }

    /// A valid one-day token for `user` signed with this config's secret.
    pub fn token_for(&self, user: &TestUser) -> String {
        JwtTestUtils::create_test_token(user, &self.jwt_secret, Some(24))
    }
}

pub struct TestUser {
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            email: "test@example.com".to_string(),
            role: "user".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "user")
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }
}

/// Builds HS256 tokens by hand so tests can produce expired, forged and
/// malformed credentials.
pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        // Role is carried for realism only; authorization reads the stored record.
        let payload = json!({
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub fn treatment_option(name: &str, slots: &[&str]) -> TreatmentOption {
    TreatmentOption {
        id: None,
        name: name.to_string(),
        price: 99.0,
        slots: slots.iter().map(|slot| slot.to_string()).collect(),
    }
}

pub fn sample_treatment_options() -> Vec<TreatmentOption> {
    vec![
        treatment_option("Teeth Orthodontics", &["09:00", "10:00", "11:00"]),
        treatment_option("Cosmetic Dentistry", &["09:00", "10:00"]),
        treatment_option("Teeth Cleaning", &["08:00", "08:30", "09:00", "09:30"]),
    ]
}

pub fn booking_for(email: &str, treatment: &str, appointment_date: &str, slot: &str) -> Booking {
    Booking {
        id: None,
        treatment: treatment.to_string(),
        appointment_date: appointment_date.to_string(),
        slot: slot.to_string(),
        email: email.to_string(),
        price: Some(99.0),
        patient_name: Some("Test Patient".to_string()),
        phone: Some("555-0100".to_string()),
        extra: Map::new(),
    }
}
