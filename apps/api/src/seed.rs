use shared_models::clinic::TreatmentOption;

const TREATMENTS: [&str; 6] = [
    "Teeth Orthodontics",
    "Cosmetic Dentistry",
    "Teeth Cleaning",
    "Cavity Protection",
    "Pediatric Dental",
    "Oral Surgery",
];

const DAILY_SLOTS: [&str; 10] = [
    "08.00 AM - 08.30 AM",
    "08.30 AM - 09.00 AM",
    "09.00 AM - 09.30 AM",
    "09.30 AM - 10.00 AM",
    "10.00 AM - 10.30 AM",
    "10.30 AM - 11.00 AM",
    "11.00 AM - 11.30 AM",
    "11.30 AM - 12.00 PM",
    "01.00 PM - 01.30 PM",
    "01.30 PM - 02.00 PM",
];

const DEFAULT_PRICE: f64 = 99.0;

/// Treatments loaded into the in-memory store when no database is configured.
pub fn default_treatment_options() -> Vec<TreatmentOption> {
    TREATMENTS
        .iter()
        .map(|name| TreatmentOption {
            id: None,
            name: name.to_string(),
            price: DEFAULT_PRICE,
            slots: DAILY_SLOTS.iter().map(|slot| slot.to_string()).collect(),
        })
        .collect()
}
