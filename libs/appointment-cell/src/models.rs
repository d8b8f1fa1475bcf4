use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppointmentOptionsQuery {
    /// Caller-formatted calendar date, compared verbatim with bookings.
    /// Absent means no bookings match and every template is returned whole.
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PatientBookingsQuery {
    pub email: Option<String>,
}
