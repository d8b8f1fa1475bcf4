pub mod error;
pub mod memory;
pub mod repository;
pub mod supabase;

pub use error::RepositoryError;
pub use memory::InMemoryRepository;
pub use repository::{BookingFilter, ClinicRepository, RepositoryResult};
pub use supabase::{SupabaseClient, SCHEMA_SQL};
