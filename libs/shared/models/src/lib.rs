pub mod auth;
pub mod clinic;
pub mod error;

pub use auth::{AuthUser, JwtClaims, Role};
pub use clinic::*;
pub use error::AppError;
