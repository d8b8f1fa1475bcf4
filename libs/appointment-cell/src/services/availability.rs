use std::sync::Arc;

use tracing::debug;

use shared_database::{ClinicRepository, RepositoryError};
use shared_models::clinic::{Booking, TreatmentAvailability, TreatmentOption};

/// Where the booked slots are subtracted from the templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityStrategy {
    /// Fetch templates and the day's bookings, subtract here.
    InMemory,
    /// Let the store join bookings onto templates and subtract.
    Aggregated,
}

/// Removes slots taken on `appointment_date` from every template.
///
/// Every treatment is returned, in input order, even when nothing is left.
/// Remaining slots keep template order.
pub fn subtract_booked_slots(
    options: &[TreatmentOption],
    bookings: &[Booking],
    appointment_date: &str,
) -> Vec<TreatmentAvailability> {
    options
        .iter()
        .map(|option| {
            let booked: Vec<&str> = bookings
                .iter()
                .filter(|b| b.appointment_date == appointment_date && b.treatment == option.name)
                .map(|b| b.slot.as_str())
                .collect();

            let remaining = option
                .slots
                .iter()
                .filter(|slot| !booked.contains(&slot.as_str()))
                .cloned()
                .collect();

            TreatmentAvailability::from_option(option, remaining)
        })
        .collect()
}

pub struct AvailabilityService {
    repository: Arc<dyn ClinicRepository>,
}

impl AvailabilityService {
    pub fn new(repository: Arc<dyn ClinicRepository>) -> Self {
        Self { repository }
    }

    pub async fn available_slots(
        &self,
        appointment_date: &str,
        strategy: AvailabilityStrategy,
    ) -> Result<Vec<TreatmentAvailability>, RepositoryError> {
        debug!("Computing availability for {:?} using {:?}", appointment_date, strategy);

        match strategy {
            AvailabilityStrategy::InMemory => {
                let options = self.repository.treatment_options().await?;
                let bookings = self.repository.bookings_on(appointment_date).await?;
                Ok(subtract_booked_slots(&options, &bookings, appointment_date))
            }
            AvailabilityStrategy::Aggregated => {
                self.repository.treatment_availability(appointment_date).await
            }
        }
    }
}
