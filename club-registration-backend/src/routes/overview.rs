use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::Json;

use crate::error::AppError;
use crate::roster::Roster;
use crate::routes::csv_response;
use crate::views::{
    club_seats, overview_csv, unregistered_csv, unregistered_students, AcademicOverview,
};

pub async fn overview(
    State(roster): State<Arc<Roster>>,
) -> Result<Json<AcademicOverview>, AppError> {
    let snapshot = roster.snapshot().await?;
    Ok(Json(crate::views::overview(&snapshot)))
}

pub async fn clubs_csv(State(roster): State<Arc<Roster>>) -> Result<Response, AppError> {
    let snapshot = roster.snapshot().await?;
    Ok(csv_response(
        "club-overview.csv",
        overview_csv(&club_seats(&snapshot)),
    ))
}

pub async fn unregistered(State(roster): State<Arc<Roster>>) -> Result<Response, AppError> {
    let snapshot = roster.snapshot().await?;
    Ok(csv_response(
        "unregistered-students.csv",
        unregistered_csv(&unregistered_students(&snapshot)),
    ))
}
