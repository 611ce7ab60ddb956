use async_trait::async_trait;

use crate::error::DatabaseError;
use crate::models::{Club, Registration, Student};

/// Everything the registration core needs from storage.
///
/// Every method is atomic on its own. A caller combining several calls (count seats,
/// then insert) must hold the store exclusively for that long.
#[async_trait]
pub trait RosterStore: Send + Sync {
    async fn students(&self) -> Result<Vec<Student>, DatabaseError>;

    async fn student(&self, id: &str) -> Result<Option<Student>, DatabaseError>;

    async fn clubs(&self) -> Result<Vec<Club>, DatabaseError>;

    async fn club(&self, id: &str) -> Result<Option<Club>, DatabaseError>;

    async fn registrations(&self) -> Result<Vec<Registration>, DatabaseError>;

    async fn registration_of(&self, student_id: &str)
        -> Result<Option<Registration>, DatabaseError>;

    async fn seats_taken(&self, club_id: &str) -> Result<usize, DatabaseError>;

    /// Checks the seat limit and inserts in one step.
    ///
    /// Fails with [`DatabaseError::ClubFull`] if the club has no free seat and with
    /// [`DatabaseError::DuplicateRegistration`] if the student already has a registration.
    async fn insert_registration(
        &mut self,
        registration: &Registration,
    ) -> Result<(), DatabaseError>;

    /// Returns whether there was a registration to delete.
    async fn delete_registration(&mut self, student_id: &str) -> Result<bool, DatabaseError>;

    async fn set_cancellations_left(
        &mut self,
        student_id: &str,
        cancellations_left: i32,
    ) -> Result<(), DatabaseError>;

    async fn set_max_seats(&mut self, club_id: &str, max_seats: i32) -> Result<(), DatabaseError>;

    async fn insert_student(&mut self, student: &Student) -> Result<(), DatabaseError>;

    async fn insert_club(&mut self, club: &Club) -> Result<(), DatabaseError>;

    /// Removes the registration and spends one cancellation.
    ///
    /// Stores that can do both in one transaction should override this.
    async fn withdraw(
        &mut self,
        student_id: &str,
        cancellations_left: i32,
    ) -> Result<bool, DatabaseError> {
        if !self.delete_registration(student_id).await? {
            return Ok(false);
        }
        self.set_cancellations_left(student_id, cancellations_left)
            .await?;
        Ok(true)
    }
}
