use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::roster::Roster;
use crate::routes::csv_response;
use crate::views::{club_roster, club_seats, roster_csv, ClubRoster, ClubSeats};

pub async fn list(State(roster): State<Arc<Roster>>) -> Result<Json<Vec<ClubSeats>>, AppError> {
    let snapshot = roster.snapshot().await?;
    Ok(Json(club_seats(&snapshot)))
}

pub async fn members(
    State(roster): State<Arc<Roster>>,
    Path(club_id): Path<String>,
) -> Result<Json<ClubRoster>, AppError> {
    let snapshot = roster.snapshot().await?;
    club_roster(&snapshot, &club_id)
        .map(Json)
        .ok_or(AppError::ClubNotFound(club_id))
}

pub async fn members_csv(
    State(roster): State<Arc<Roster>>,
    Path(club_id): Path<String>,
) -> Result<Response, AppError> {
    let snapshot = roster.snapshot().await?;
    let club_roster =
        club_roster(&snapshot, &club_id).ok_or_else(|| AppError::ClubNotFound(club_id.clone()))?;
    Ok(csv_response(&format!("roster-{club_id}.csv"), roster_csv(&club_roster)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityPayload {
    pub max_seats: i32,
}

pub async fn capacity(
    State(roster): State<Arc<Roster>>,
    Path(club_id): Path<String>,
    payload: Result<Json<CapacityPayload>, JsonRejection>,
) -> Result<Json<ClubSeats>, AppError> {
    let Json(payload) = payload?;
    let club = roster.set_capacity(&club_id, payload.max_seats).await?;

    let snapshot = roster.snapshot().await?;
    club_seats(&snapshot)
        .into_iter()
        .find(|seats| seats.club.id == club.id)
        .map(Json)
        .ok_or(AppError::ClubNotFound(club.id))
}
