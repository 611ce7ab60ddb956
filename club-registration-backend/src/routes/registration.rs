use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use club_registration_optimizer::AutoAssignSummary;
use serde::Deserialize;

use crate::error::AppError;
use crate::registration::StudentView;
use crate::roster::Roster;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub student_id: String,
    pub club_id: String,
    /// National id or G-ID typed in again by the student.
    pub confirmed_identity: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelPayload {
    pub student_id: String,
    pub confirmed_identity: String,
}

pub async fn register(
    State(roster): State<Arc<Roster>>,
    payload: Result<Json<RegisterPayload>, JsonRejection>,
) -> Result<Json<StudentView>, AppError> {
    let Json(payload) = payload?;
    let student = roster
        .register(&payload.student_id, &payload.club_id, &payload.confirmed_identity)
        .await?;
    Ok(Json(student))
}

pub async fn cancel(
    State(roster): State<Arc<Roster>>,
    payload: Result<Json<CancelPayload>, JsonRejection>,
) -> Result<Json<StudentView>, AppError> {
    let Json(payload) = payload?;
    let student = roster
        .cancel(&payload.student_id, &payload.confirmed_identity)
        .await?;
    Ok(Json(student))
}

pub async fn auto_assign(
    State(roster): State<Arc<Roster>>,
) -> Result<Json<AutoAssignSummary>, AppError> {
    Ok(Json(roster.auto_assign().await?))
}
