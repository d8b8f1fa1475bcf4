pub mod handlers;
pub mod router;

pub use router::doctor_routes;
