use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{debug, info};

use shared_models::clinic::{DeleteAck, Doctor, InsertAck};
use shared_models::error::AppError;
use shared_utils::AppState;

pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    let doctors = state.repository.doctors().await?;
    debug!("Roster holds {} doctors", doctors.len());
    Ok(Json(doctors))
}

pub async fn add_doctor(
    State(state): State<Arc<AppState>>,
    Json(doctor): Json<Doctor>,
) -> Result<Json<InsertAck>, AppError> {
    let stored = state.repository.insert_doctor(doctor).await?;
    info!("Doctor {} added to roster", stored.name);
    Ok(Json(InsertAck::inserted(stored.id)))
}

pub async fn remove_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<DeleteAck>, AppError> {
    let deleted_count = state.repository.delete_doctor(&doctor_id).await?;
    info!("Removed {} roster entries for doctor {}", deleted_count, doctor_id);
    Ok(Json(DeleteAck {
        acknowledged: true,
        deleted_count,
    }))
}
