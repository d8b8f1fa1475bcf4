pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use router::appointment_routes;
pub use services::{
    availability::{AvailabilityService, AvailabilityStrategy},
    booking::{BookingError, BookingService},
};
