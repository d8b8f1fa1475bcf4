use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_models::clinic::{
    Booking, Doctor, Payment, TreatmentAvailability, TreatmentName, TreatmentOption, UpdateAck,
    UserRecord,
};

use crate::error::RepositoryError;
use crate::repository::{BookingFilter, ClinicRepository, RepositoryResult};

const TREATMENT_OPTIONS: &str = "appointment_options";
const BOOKINGS: &str = "bookings";
const PAYMENTS: &str = "payments";
const USERS: &str = "users";
const DOCTORS: &str = "doctors";

/// Tables, the booking key constraint and the `treatment_availability`
/// function this client expects.
pub const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");

/// Unique key of the `bookings` table.
const BOOKING_KEY_COLUMNS: &str = "appointmentDate,email,treatment";

const RETURN_REPRESENTATION: &str = "return=representation";
const INSERT_IF_ABSENT: &str = "resolution=ignore-duplicates,return=representation";
const UPSERT: &str = "resolution=merge-duplicates,return=representation";

type Query<'a> = Vec<(&'a str, String)>;

fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

/// PostgREST client for the Supabase project holding the portal's tables.
///
/// Availability aggregation runs in the database through the
/// `treatment_availability(appointment_date text)` function from
/// [`SCHEMA_SQL`], which returns one row per treatment ordered by id, the
/// same order `treatment_options` reads, with booked slots of that date
/// removed.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self, prefer: Option<&'static str>) -> RepositoryResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let key = HeaderValue::from_str(&self.service_key)
            .map_err(|e| RepositoryError::Configuration(format!("invalid service key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.service_key))
            .map_err(|e| RepositoryError::Configuration(format!("invalid service key: {}", e)))?;

        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(prefer) = prefer {
            headers.insert("Prefer", HeaderValue::from_static(prefer));
        }

        Ok(headers)
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
        prefer: Option<&'static str>,
    ) -> RepositoryResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.get_headers(prefer)?)
            .query(query);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Store API error ({}): {}", status, error_text);
            return Err(RepositoryError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        Ok(response.json::<T>().await?)
    }

    async fn select<T>(&self, table: &str, query: Query<'_>) -> RepositoryResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, &format!("/rest/v1/{}", table), &query, None, None)
            .await
    }

    async fn insert<T>(
        &self,
        table: &str,
        row: &T,
        query: Query<'_>,
        prefer: &'static str,
    ) -> RepositoryResult<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut body = serde_json::to_value(row)?;
        // Ids are assigned by the table.
        if let Value::Object(fields) = &mut body {
            fields.remove("_id");
            fields.remove("id");
        }
        self.request(
            Method::POST,
            &format!("/rest/v1/{}", table),
            &query,
            Some(body),
            Some(prefer),
        )
        .await
    }

    async fn insert_one<T>(&self, table: &str, row: &T) -> RepositoryResult<T>
    where
        T: Serialize + DeserializeOwned,
    {
        self.insert(table, row, Vec::new(), RETURN_REPRESENTATION)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::Api {
                status: 200,
                message: format!("insert into {} returned no rows", table),
            })
    }
}

#[async_trait]
impl ClinicRepository for SupabaseClient {
    async fn treatment_options(&self) -> RepositoryResult<Vec<TreatmentOption>> {
        self.select(TREATMENT_OPTIONS, vec![("order", "id".to_string())])
            .await
    }

    async fn treatment_names(&self) -> RepositoryResult<Vec<TreatmentName>> {
        self.select(
            TREATMENT_OPTIONS,
            vec![("select", "id,name".to_string()), ("order", "id".to_string())],
        )
        .await
    }

    async fn bookings_on(&self, appointment_date: &str) -> RepositoryResult<Vec<Booking>> {
        self.select(BOOKINGS, vec![("appointmentDate", eq(appointment_date))])
            .await
    }

    async fn treatment_availability(
        &self,
        appointment_date: &str,
    ) -> RepositoryResult<Vec<TreatmentAvailability>> {
        debug!("Aggregating availability for {} in the store", appointment_date);
        self.request(
            Method::POST,
            "/rest/v1/rpc/treatment_availability",
            &[],
            Some(json!({ "appointment_date": appointment_date })),
            None,
        )
        .await
    }

    async fn find_bookings(&self, filter: &BookingFilter) -> RepositoryResult<Vec<Booking>> {
        let mut query = Query::new();
        if let Some(date) = &filter.appointment_date {
            query.push(("appointmentDate", eq(date)));
        }
        if let Some(email) = &filter.email {
            query.push(("email", eq(email)));
        }
        if let Some(treatment) = &filter.treatment {
            query.push(("treatment", eq(treatment)));
        }
        self.select(BOOKINGS, query).await
    }

    async fn booking_by_id(&self, id: &str) -> RepositoryResult<Option<Booking>> {
        let rows: Vec<Booking> = self.select(BOOKINGS, vec![("id", eq(id))]).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_booking(&self, booking: Booking) -> RepositoryResult<Option<Booking>> {
        // Rows skipped by `ignore-duplicates` are not returned.
        let rows = self
            .insert(
                BOOKINGS,
                &booking,
                vec![("on_conflict", BOOKING_KEY_COLUMNS.to_string())],
                INSERT_IF_ABSENT,
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_payment(&self, payment: Payment) -> RepositoryResult<Payment> {
        self.insert_one(PAYMENTS, &payment).await
    }

    async fn user_by_email(&self, email: &str) -> RepositoryResult<Option<UserRecord>> {
        let rows: Vec<UserRecord> = self.select(USERS, vec![("email", eq(email))]).await?;
        Ok(rows.into_iter().next())
    }

    async fn users(&self) -> RepositoryResult<Vec<UserRecord>> {
        self.select(USERS, Vec::new()).await
    }

    async fn insert_user(&self, user: UserRecord) -> RepositoryResult<UserRecord> {
        self.insert_one(USERS, &user).await
    }

    async fn promote_to_admin(&self, id: &str) -> RepositoryResult<UpdateAck> {
        let existing: Vec<UserRecord> = self.select(USERS, vec![("id", eq(id))]).await?;

        if let Some(user) = existing.first() {
            let modified = !Role::from_record(user.role.as_deref()).is_admin();
            let _: Vec<UserRecord> = self
                .request(
                    Method::PATCH,
                    &format!("/rest/v1/{}", USERS),
                    &[("id", eq(id))],
                    Some(json!({ "role": Role::ADMIN })),
                    Some(RETURN_REPRESENTATION),
                )
                .await?;
            return Ok(UpdateAck {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(modified),
                upserted_id: None,
            });
        }

        info!("Upserting admin record for unknown user id {}", id);
        let _: Vec<Value> = self
            .request(
                Method::POST,
                &format!("/rest/v1/{}", USERS),
                &[("on_conflict", "id".to_string())],
                Some(json!({ "id": id, "role": Role::ADMIN })),
                Some(UPSERT),
            )
            .await?;
        Ok(UpdateAck {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id.to_string()),
        })
    }

    async fn doctors(&self) -> RepositoryResult<Vec<Doctor>> {
        self.select(DOCTORS, Vec::new()).await
    }

    async fn insert_doctor(&self, doctor: Doctor) -> RepositoryResult<Doctor> {
        self.insert_one(DOCTORS, &doctor).await
    }

    async fn delete_doctor(&self, id: &str) -> RepositoryResult<u64> {
        let deleted: Vec<Value> = self
            .request(
                Method::DELETE,
                &format!("/rest/v1/{}", DOCTORS),
                &[("id", eq(id))],
                None,
                Some(RETURN_REPRESENTATION),
            )
            .await?;
        Ok(deleted.len() as u64)
    }
}
