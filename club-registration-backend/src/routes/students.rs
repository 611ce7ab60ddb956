use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::roster::Roster;
use crate::views::{clubs_for_student, ClubStatus};

pub async fn clubs(
    State(roster): State<Arc<Roster>>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<ClubStatus>>, AppError> {
    let snapshot = roster.snapshot().await?;
    clubs_for_student(&snapshot, &student_id)
        .map(Json)
        .ok_or(AppError::StudentNotFound(student_id))
}
