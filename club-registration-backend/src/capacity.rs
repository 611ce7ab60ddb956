use club_registration_database::models::Club;
use club_registration_database::{DatabaseError, RosterStore};
use tracing::info;

#[derive(thiserror::Error, Debug)]
pub enum CapacityError {
    #[error("no club with id {0}")]
    ClubNotFound(String),
    #[error("a club needs at least one seat, got {0}")]
    InvalidCapacity(i32),
    #[error("club {club_id} already has {seats_taken} students, cannot shrink to {max_seats}")]
    CapacityBelowEnrollment {
        club_id: String,
        max_seats: i32,
        seats_taken: usize,
    },
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}

impl CapacityError {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ClubNotFound(_) => "club_not_found",
            Self::InvalidCapacity(_) => "invalid_capacity",
            Self::CapacityBelowEnrollment { .. } => "capacity_below_enrollment",
            Self::Database(_) => "database",
        }
    }
}

/// Changes how many seats a club has. Never goes below the students already in it.
#[tracing::instrument(skip(store))]
pub async fn set_capacity<S: RosterStore + ?Sized>(
    store: &mut S,
    club_id: &str,
    max_seats: i32,
) -> Result<Club, CapacityError> {
    if max_seats <= 0 {
        return Err(CapacityError::InvalidCapacity(max_seats));
    }
    let mut club = store
        .club(club_id)
        .await?
        .ok_or_else(|| CapacityError::ClubNotFound(club_id.to_owned()))?;

    let seats_taken = store.seats_taken(club_id).await?;
    if usize::try_from(max_seats).unwrap_or(0) < seats_taken {
        return Err(CapacityError::CapacityBelowEnrollment {
            club_id: club.id,
            max_seats,
            seats_taken,
        });
    }

    store.set_max_seats(club_id, max_seats).await?;
    info!(club = %club.id, from = club.max_seats, to = max_seats, "capacity changed");
    club.max_seats = max_seats;
    Ok(club)
}
