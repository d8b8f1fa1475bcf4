use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::auth::Role;
use shared_models::clinic::{
    Booking, Doctor, Payment, TreatmentAvailability, TreatmentName, TreatmentOption, UpdateAck,
    UserRecord,
};

use crate::repository::{BookingFilter, ClinicRepository, RepositoryResult};

#[derive(Debug, Default)]
struct Collections {
    treatment_options: Vec<TreatmentOption>,
    bookings: Vec<Booking>,
    payments: Vec<Payment>,
    users: Vec<UserRecord>,
    doctors: Vec<Doctor>,
}

/// Process-local store used for development and tests.
///
/// Every write takes the single write lock, so the booking check and insert
/// happen as one step.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    collections: RwLock<Collections>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_treatment_options(options: Vec<TreatmentOption>) -> Self {
        let options = options
            .into_iter()
            .map(|mut option| {
                option.id.get_or_insert_with(new_id);
                option
            })
            .collect();

        Self {
            collections: RwLock::new(Collections {
                treatment_options: options,
                ..Collections::default()
            }),
        }
    }

    /// Inserts a user and returns its id. Convenience for seeding.
    pub async fn seed_user(&self, email: &str, role: Option<&str>) -> String {
        let id = new_id();
        self.collections.write().await.users.push(UserRecord {
            id: Some(id.clone()),
            name: None,
            email: Some(email.to_string()),
            role: role.map(str::to_string),
            extra: Default::default(),
        });
        id
    }

    pub async fn booking_count(&self) -> usize {
        self.collections.read().await.bookings.len()
    }

    pub async fn recorded_payments(&self) -> Vec<Payment> {
        self.collections.read().await.payments.clone()
    }
}

#[async_trait]
impl ClinicRepository for InMemoryRepository {
    async fn treatment_options(&self) -> RepositoryResult<Vec<TreatmentOption>> {
        Ok(self.collections.read().await.treatment_options.clone())
    }

    async fn treatment_names(&self) -> RepositoryResult<Vec<TreatmentName>> {
        let collections = self.collections.read().await;
        Ok(collections
            .treatment_options
            .iter()
            .map(|option| TreatmentName {
                id: option.id.clone(),
                name: option.name.clone(),
            })
            .collect())
    }

    async fn bookings_on(&self, appointment_date: &str) -> RepositoryResult<Vec<Booking>> {
        let filter = BookingFilter {
            appointment_date: Some(appointment_date.to_string()),
            ..BookingFilter::default()
        };
        self.find_bookings(&filter).await
    }

    async fn treatment_availability(
        &self,
        appointment_date: &str,
    ) -> RepositoryResult<Vec<TreatmentAvailability>> {
        let collections = self.collections.read().await;

        // Join bookings of the day onto treatments by name.
        let mut booked: HashMap<&str, HashSet<&str>> = HashMap::new();
        for booking in collections
            .bookings
            .iter()
            .filter(|booking| booking.appointment_date == appointment_date)
        {
            booked
                .entry(booking.treatment.as_str())
                .or_default()
                .insert(booking.slot.as_str());
        }

        Ok(collections
            .treatment_options
            .iter()
            .map(|option| {
                let taken = booked.get(option.name.as_str());
                let remaining = option
                    .slots
                    .iter()
                    .filter(|slot| taken.map_or(true, |taken| !taken.contains(slot.as_str())))
                    .cloned()
                    .collect();
                TreatmentAvailability::from_option(option, remaining)
            })
            .collect())
    }

    async fn find_bookings(&self, filter: &BookingFilter) -> RepositoryResult<Vec<Booking>> {
        debug!("Finding bookings matching {:?}", filter);
        let collections = self.collections.read().await;
        Ok(collections
            .bookings
            .iter()
            .filter(|booking| filter.matches(booking))
            .cloned()
            .collect())
    }

    async fn booking_by_id(&self, id: &str) -> RepositoryResult<Option<Booking>> {
        let collections = self.collections.read().await;
        Ok(collections
            .bookings
            .iter()
            .find(|booking| booking.id.as_deref() == Some(id))
            .cloned())
    }

    async fn insert_booking(&self, mut booking: Booking) -> RepositoryResult<Option<Booking>> {
        let mut collections = self.collections.write().await;

        let key = BookingFilter::conflicting_with(&booking);
        if collections.bookings.iter().any(|existing| key.matches(existing)) {
            debug!("Booking key already taken: {:?}", key);
            return Ok(None);
        }

        booking.id = Some(new_id());
        collections.bookings.push(booking.clone());
        Ok(Some(booking))
    }

    async fn insert_payment(&self, mut payment: Payment) -> RepositoryResult<Payment> {
        payment.id = Some(new_id());
        self.collections.write().await.payments.push(payment.clone());
        Ok(payment)
    }

    async fn user_by_email(&self, email: &str) -> RepositoryResult<Option<UserRecord>> {
        let collections = self.collections.read().await;
        Ok(collections
            .users
            .iter()
            .find(|user| user.email.as_deref() == Some(email))
            .cloned())
    }

    async fn users(&self) -> RepositoryResult<Vec<UserRecord>> {
        Ok(self.collections.read().await.users.clone())
    }

    async fn insert_user(&self, mut user: UserRecord) -> RepositoryResult<UserRecord> {
        user.id = Some(new_id());
        self.collections.write().await.users.push(user.clone());
        Ok(user)
    }

    async fn promote_to_admin(&self, id: &str) -> RepositoryResult<UpdateAck> {
        let mut collections = self.collections.write().await;

        if let Some(user) = collections
            .users
            .iter_mut()
            .find(|user| user.id.as_deref() == Some(id))
        {
            let modified = !Role::from_record(user.role.as_deref()).is_admin();
            user.role = Some(Role::ADMIN.to_string());
            return Ok(UpdateAck {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(modified),
                upserted_id: None,
            });
        }

        info!("Upserting admin record for unknown user id {}", id);
        collections.users.push(UserRecord {
            id: Some(id.to_string()),
            name: None,
            email: None,
            role: Some(Role::ADMIN.to_string()),
            extra: Default::default(),
        });
        Ok(UpdateAck {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id.to_string()),
        })
    }

    async fn doctors(&self) -> RepositoryResult<Vec<Doctor>> {
        Ok(self.collections.read().await.doctors.clone())
    }

    async fn insert_doctor(&self, mut doctor: Doctor) -> RepositoryResult<Doctor> {
        doctor.id = Some(new_id());
        self.collections.write().await.doctors.push(doctor.clone());
        Ok(doctor)
    }

    async fn delete_doctor(&self, id: &str) -> RepositoryResult<u64> {
        let mut collections = self.collections.write().await;
        let before = collections.doctors.len();
        collections
            .doctors
            .retain(|doctor| doctor.id.as_deref() != Some(id));
        Ok((before - collections.doctors.len()) as u64)
    }
}
