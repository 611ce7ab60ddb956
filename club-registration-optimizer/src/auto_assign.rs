use std::collections::{HashMap, HashSet};

use club_registration_database::models::{Club, Registration};
use club_registration_database::{DatabaseError, RosterStore};
use itertools::Itertools as _;
use rand::seq::SliceRandom as _;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::eligibility::{is_grade_allowed, parse_grade_level};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoAssignSummary {
    pub assigned_count: usize,
    /// Students for whose grade no club had a free seat. They stay unregistered.
    pub failed_count: usize,
}

/// Places every currently unregistered student into a random club that accepts their
/// grade and still has a free seat.
///
/// Seat counts are read once and then tracked locally, so the caller must hold the
/// store exclusively for the whole run (the `&mut` makes sure of that). A club that the
/// store reports full anyway, because another process shares the database, is dropped
/// from the candidates and the student gets another pick. There is no rollback: if the
/// store fails halfway, the assignments made so far stay.
#[tracing::instrument(skip_all)]
pub async fn auto_assign<S, R>(store: &mut S, rng: &mut R) -> Result<AutoAssignSummary, DatabaseError>
where
    S: RosterStore + ?Sized,
    R: Rng + Send + ?Sized,
{
    let students = store.students().await?;
    let clubs = store.clubs().await?;
    let registrations = store.registrations().await?;

    let registered: HashSet<&str> = registrations
        .iter()
        .map(|registration| registration.student_id.as_str())
        .collect();
    let mut seats_taken: HashMap<&str, usize> = registrations
        .iter()
        .map(|registration| registration.club_id.as_str())
        .counts();

    let mut summary = AutoAssignSummary::default();

    for student in students
        .iter()
        .filter(|student| !registered.contains(student.id.as_str()))
    {
        let grade = parse_grade_level(&student.class_name);
        let placed = loop {
            let candidates: Vec<&Club> = clubs
                .iter()
                .filter(|club| {
                    is_grade_allowed(grade, club)
                        && seats_taken.get(club.id.as_str()).copied().unwrap_or(0)
                            < club.capacity()
                })
                .collect();
            let Some(club) = candidates.choose(rng).copied() else {
                break None;
            };

            match store
                .insert_registration(&Registration {
                    student_id: student.id.clone(),
                    club_id: club.id.clone(),
                })
                .await
            {
                Ok(()) => {
                    *seats_taken.entry(club.id.as_str()).or_default() += 1;
                    break Some(club);
                }
                // filled by a writer outside this run since the counts were read
                Err(DatabaseError::ClubFull(_)) => {
                    seats_taken.insert(club.id.as_str(), club.capacity());
                }
                Err(error) => return Err(error),
            }
        };

        if let Some(club) = placed {
            summary.assigned_count += 1;
            debug!(student = %student.id, club = %club.id, "assigned");
        } else {
            debug!(student = %student.id, ?grade, "no club with a free seat");
            summary.failed_count += 1;
        }
    }

    info!(
        assigned = summary.assigned_count,
        failed = summary.failed_count,
        "auto assignment finished"
    );
    Ok(summary)
}
