use tracing::debug;

use shared_database::ClinicRepository;
use shared_models::auth::Role;
use shared_models::error::AppError;

/// Role of the user registered under `email`. An unknown email is an
/// ordinary user, never an error; only store failures propagate.
pub async fn resolve_role(
    repository: &dyn ClinicRepository,
    email: &str,
) -> Result<Role, AppError> {
    let user = repository.user_by_email(email).await?;
    let role = Role::from_record(user.as_ref().and_then(|u| u.role.as_deref()));

    debug!("Resolved role {} for {}", role, email);
    Ok(role)
}
