use async_trait::async_trait;

use shared_models::clinic::{
    Booking, Doctor, Payment, TreatmentAvailability, TreatmentName, TreatmentOption, UpdateAck,
    UserRecord,
};

use crate::error::RepositoryError;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Exact-match filter over bookings. `None` fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub appointment_date: Option<String>,
    pub email: Option<String>,
    pub treatment: Option<String>,
}

impl BookingFilter {
    pub fn for_email(email: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            ..Self::default()
        }
    }

    /// Filter selecting bookings that would conflict with `booking`.
    pub fn conflicting_with(booking: &Booking) -> Self {
        let (appointment_date, email, treatment) = booking.conflict_key();
        Self {
            appointment_date: Some(appointment_date.to_string()),
            email: Some(email.to_string()),
            treatment: Some(treatment.to_string()),
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        fn field_matches(expected: &Option<String>, actual: &str) -> bool {
            expected.as_deref().map_or(true, |value| value == actual)
        }

        field_matches(&self.appointment_date, &booking.appointment_date)
            && field_matches(&self.email, &booking.email)
            && field_matches(&self.treatment, &booking.treatment)
    }
}

/// Document store behind every cell. Implementations are shared across
/// requests as `Arc<dyn ClinicRepository>`.
#[async_trait]
pub trait ClinicRepository: Send + Sync {
    async fn treatment_options(&self) -> RepositoryResult<Vec<TreatmentOption>>;

    async fn treatment_names(&self) -> RepositoryResult<Vec<TreatmentName>>;

    async fn bookings_on(&self, appointment_date: &str) -> RepositoryResult<Vec<Booking>>;

    /// Per-treatment remaining slots for `appointment_date`, computed by the
    /// store itself. Must agree with subtracting `bookings_on` from
    /// `treatment_options` in memory.
    async fn treatment_availability(
        &self,
        appointment_date: &str,
    ) -> RepositoryResult<Vec<TreatmentAvailability>>;

    async fn find_bookings(&self, filter: &BookingFilter) -> RepositoryResult<Vec<Booking>>;

    async fn booking_by_id(&self, id: &str) -> RepositoryResult<Option<Booking>>;

    /// Inserts unless a booking with the same `(appointmentDate, email,
    /// treatment)` exists. Returns `None` when the key is already taken.
    async fn insert_booking(&self, booking: Booking) -> RepositoryResult<Option<Booking>>;

    async fn insert_payment(&self, payment: Payment) -> RepositoryResult<Payment>;

    async fn user_by_email(&self, email: &str) -> RepositoryResult<Option<UserRecord>>;

    async fn users(&self) -> RepositoryResult<Vec<UserRecord>>;

    async fn insert_user(&self, user: UserRecord) -> RepositoryResult<UserRecord>;

    /// Sets the admin role on the user with `id`, creating the record when
    /// none exists.
    async fn promote_to_admin(&self, id: &str) -> RepositoryResult<UpdateAck>;

    async fn doctors(&self) -> RepositoryResult<Vec<Doctor>>;

    async fn insert_doctor(&self, doctor: Doctor) -> RepositoryResult<Doctor>;

    async fn delete_doctor(&self, id: &str) -> RepositoryResult<u64>;

    async fn close(&self) {}
}
