use club_registration_database::models::{Registration, Student};
use club_registration_database::{DatabaseError, RosterStore};
use club_registration_optimizer::{is_grade_allowed, parse_grade_level};
use serde::Serialize;
use tracing::{info, warn};

/// What a student sees of themselves after registering or cancelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentView {
    #[serde(flatten)]
    pub student: Student,
    pub registered_club_id: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum RegistrationError {
    #[error("no student with id {0}")]
    StudentNotFound(String),
    #[error("the entered national id or G-ID does not match")]
    IdentityMismatch,
    #[error("already registered in club {0}, cancel that registration first")]
    AlreadyRegistered(String),
    #[error("no club with id {0}")]
    ClubNotFound(String),
    #[error("club {club_id} does not accept students of grade {grade}")]
    GradeNotAllowed { club_id: String, grade: u8 },
    #[error("club {0} is full")]
    ClubFull(String),
    #[error("no cancellations left")]
    QuotaExhausted,
    #[error("not registered in any club")]
    NotRegistered,
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}

impl RegistrationError {
    /// Stable machine readable name, the display text is for humans.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StudentNotFound(_) => "student_not_found",
            Self::IdentityMismatch => "identity_mismatch",
            Self::AlreadyRegistered(_) => "already_registered",
            Self::ClubNotFound(_) => "club_not_found",
            Self::GradeNotAllowed { .. } => "grade_not_allowed",
            Self::ClubFull(_) => "club_full",
            Self::QuotaExhausted => "quota_exhausted",
            Self::NotRegistered => "not_registered",
            Self::Database(_) => "database",
        }
    }
}

async fn confirmed_student<S: RosterStore + ?Sized>(
    store: &S,
    student_id: &str,
    confirmed_identity: &str,
) -> Result<Student, RegistrationError> {
    let student = store
        .student(student_id)
        .await?
        .ok_or_else(|| RegistrationError::StudentNotFound(student_id.to_owned()))?;
    if student.id != confirmed_identity {
        warn!(student = %student_id, "identity confirmation failed");
        return Err(RegistrationError::IdentityMismatch);
    }
    Ok(student)
}

/// Registers a student into a club.
///
/// The checks run in a fixed order and the first failing one is reported. Between the
/// seat count and the insert nobody else may touch the store, which the `&mut` borrow
/// guarantees.
#[tracing::instrument(skip(store, confirmed_identity))]
pub async fn register<S: RosterStore + ?Sized>(
    store: &mut S,
    student_id: &str,
    club_id: &str,
    confirmed_identity: &str,
) -> Result<StudentView, RegistrationError> {
    let student = confirmed_student(store, student_id, confirmed_identity).await?;

    if let Some(existing) = store.registration_of(student_id).await? {
        return Err(RegistrationError::AlreadyRegistered(existing.club_id));
    }

    let club = store
        .club(club_id)
        .await?
        .ok_or_else(|| RegistrationError::ClubNotFound(club_id.to_owned()))?;

    let grade = parse_grade_level(&student.class_name);
    if !is_grade_allowed(grade, &club) {
        return Err(RegistrationError::GradeNotAllowed {
            club_id: club.id,
            grade: grade.0,
        });
    }

    if store.seats_taken(&club.id).await? >= club.capacity() {
        return Err(RegistrationError::ClubFull(club.id));
    }

    let inserted = store
        .insert_registration(&Registration {
            student_id: student.id.clone(),
            club_id: club.id.clone(),
        })
        .await;
    // another process sharing the database got in between the checks and the insert
    match inserted {
        Ok(()) => {}
        Err(DatabaseError::DuplicateRegistration(_)) => {
            let existing = store.registration_of(student_id).await?;
            return Err(RegistrationError::AlreadyRegistered(
                existing.map(|existing| existing.club_id).unwrap_or_default(),
            ));
        }
        Err(DatabaseError::ClubFull(club_id)) => return Err(RegistrationError::ClubFull(club_id)),
        Err(DatabaseError::UnknownClub(club_id)) => {
            return Err(RegistrationError::ClubNotFound(club_id));
        }
        Err(DatabaseError::UnknownStudent(student_id)) => {
            return Err(RegistrationError::StudentNotFound(student_id));
        }
        Err(error) => return Err(error.into()),
    }
    info!(student = %student.id, club = %club.id, "registered");

    Ok(StudentView {
        student,
        registered_club_id: Some(club.id),
    })
}

/// Withdraws a student from their club, spending one of their cancellations.
#[tracing::instrument(skip(store, confirmed_identity))]
pub async fn cancel<S: RosterStore + ?Sized>(
    store: &mut S,
    student_id: &str,
    confirmed_identity: &str,
) -> Result<StudentView, RegistrationError> {
    let mut student = confirmed_student(store, student_id, confirmed_identity).await?;

    if student.cancellations_left <= 0 {
        return Err(RegistrationError::QuotaExhausted);
    }

    let cancellations_left = student.cancellations_left - 1;
    if !store.withdraw(student_id, cancellations_left).await? {
        return Err(RegistrationError::NotRegistered);
    }
    student.cancellations_left = cancellations_left;
    info!(student = %student.id, cancellations_left, "registration cancelled");

    Ok(StudentView {
        student,
        registered_club_id: None,
    })
}
