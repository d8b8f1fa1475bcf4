use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use shared_database::{BookingFilter, ClinicRepository, RepositoryError};
use shared_models::clinic::Booking;
use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("You have already booked the treatment for {appointment_date}")]
    Conflict { appointment_date: String },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Conflict { .. } => AppError::BadRequest(err.to_string()),
            BookingError::Repository(e) => e.into(),
        }
    }
}

pub struct BookingService {
    repository: Arc<dyn ClinicRepository>,
}

impl BookingService {
    pub fn new(repository: Arc<dyn ClinicRepository>) -> Self {
        Self { repository }
    }

    /// Stores `booking` unless the patient already holds one for the same
    /// treatment on the same date.
    ///
    /// The lookup produces the conflict for the common case; the store's
    /// insert-if-absent settles requests racing past the lookup.
    pub async fn try_create_booking(&self, booking: Booking) -> Result<Booking, BookingError> {
        debug!(
            "Checking existing bookings of {} for {} on {}",
            booking.email, booking.treatment, booking.appointment_date
        );

        let existing = self
            .repository
            .find_bookings(&BookingFilter::conflicting_with(&booking))
            .await?;
        if !existing.is_empty() {
            warn!(
                "Rejected duplicate booking of {} for {} on {}",
                booking.email, booking.treatment, booking.appointment_date
            );
            return Err(BookingError::Conflict {
                appointment_date: booking.appointment_date,
            });
        }

        let appointment_date = booking.appointment_date.clone();
        match self.repository.insert_booking(booking).await? {
            Some(stored) => {
                info!(
                    "Booking {} created for {} on {}",
                    stored.id.as_deref().unwrap_or("-"),
                    stored.treatment,
                    stored.appointment_date
                );
                Ok(stored)
            }
            None => {
                warn!("Booking lost the insert race for {}", appointment_date);
                Err(BookingError::Conflict { appointment_date })
            }
        }
    }

    pub async fn bookings_for(&self, email: &str) -> Result<Vec<Booking>, BookingError> {
        Ok(self
            .repository
            .find_bookings(&BookingFilter::for_email(email))
            .await?)
    }

    pub async fn booking(&self, id: &str) -> Result<Option<Booking>, BookingError> {
        Ok(self.repository.booking_by_id(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_database::InMemoryRepository;
    use shared_utils::test_utils::booking_for;

    #[tokio::test]
    async fn first_booking_is_stored_with_id() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = BookingService::new(repo.clone());

        let stored = service
            .try_create_booking(booking_for("a@x.com", "Teeth Cleaning", "2026-10-17", "09:00"))
            .await
            .unwrap();

        let id = stored.id.clone().unwrap();
        let fetched = service.booking(&id).await.unwrap();
        assert_eq!(fetched, Some(stored));
    }

    #[tokio::test]
    async fn same_patient_treatment_and_date_conflicts_without_insert() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = BookingService::new(repo.clone());
        service
            .try_create_booking(booking_for("a@x.com", "Teeth Cleaning", "2026-10-17", "09:00"))
            .await
            .unwrap();

        let result = service
            .try_create_booking(booking_for("a@x.com", "Teeth Cleaning", "2026-10-17", "10:00"))
            .await;

        assert_matches!(
            result,
            Err(BookingError::Conflict { ref appointment_date }) if appointment_date == "2026-10-17"
        );
        assert_eq!(repo.booking_count().await, 1);
        assert_eq!(
            result.unwrap_err().to_string(),
            "You have already booked the treatment for 2026-10-17"
        );
    }

    #[tokio::test]
    async fn any_differing_field_is_accepted() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = BookingService::new(repo.clone());
        service
            .try_create_booking(booking_for("a@x.com", "Teeth Cleaning", "2026-10-17", "09:00"))
            .await
            .unwrap();

        for booking in [
            booking_for("b@x.com", "Teeth Cleaning", "2026-10-17", "09:00"),
            booking_for("a@x.com", "Cosmetic Dentistry", "2026-10-17", "09:00"),
            booking_for("a@x.com", "Teeth Cleaning", "2026-10-18", "09:00"),
        ] {
            assert!(service.try_create_booking(booking).await.is_ok());
        }
        assert_eq!(repo.booking_count().await, 4);
    }

    #[tokio::test]
    async fn bookings_for_returns_only_that_patient() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = BookingService::new(repo);
        for email in ["a@x.com", "b@x.com", "a@x.com"] {
            let date = format!("2026-10-{}", 17 + email.len() % 3);
            let _ = service
                .try_create_booking(booking_for(email, "Teeth Cleaning", &date, "09:00"))
                .await;
        }

        let bookings = service.bookings_for("b@x.com").await.unwrap();

        assert_eq!(bookings.len(), 1);
        assert!(bookings.iter().all(|b| b.email == "b@x.com"));
    }
}
