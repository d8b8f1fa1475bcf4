pub mod extractor;
pub mod jwt;
pub mod roles;
pub mod state;
pub mod test_utils;

pub use state::AppState;
