use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::error::DatabaseError;
use crate::models::{Club, Registration, Student};
use crate::schema::{clubs, registrations, students};
use crate::store::RosterStore;
use crate::Pool;

/// Roster in PostgreSQL, see `migrations/` for the tables.
#[derive(Clone)]
pub struct PgRosterStore {
    pool: Pool,
}

impl PgRosterStore {
    #[must_use]
    pub const fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RosterStore for PgRosterStore {
    async fn students(&self) -> Result<Vec<Student>, DatabaseError> {
        let mut connection = self.pool.get().await?;
        Ok(students::table
            .order(students::id)
            .select(Student::as_select())
            .load(&mut connection)
            .await?)
    }

    async fn student(&self, id: &str) -> Result<Option<Student>, DatabaseError> {
        let mut connection = self.pool.get().await?;
        Ok(students::table
            .find(id)
            .select(Student::as_select())
            .first(&mut connection)
            .await
            .optional()?)
    }

    async fn clubs(&self) -> Result<Vec<Club>, DatabaseError> {
        let mut connection = self.pool.get().await?;
        Ok(clubs::table
            .order(clubs::id)
            .select(Club::as_select())
            .load(&mut connection)
            .await?)
    }

    async fn club(&self, id: &str) -> Result<Option<Club>, DatabaseError> {
        let mut connection = self.pool.get().await?;
        Ok(clubs::table
            .find(id)
            .select(Club::as_select())
            .first(&mut connection)
            .await
            .optional()?)
    }

    async fn registrations(&self) -> Result<Vec<Registration>, DatabaseError> {
        let mut connection = self.pool.get().await?;
        Ok(registrations::table
            .order(registrations::student_id)
            .select(Registration::as_select())
            .load(&mut connection)
            .await?)
    }

    async fn registration_of(
        &self,
        student_id: &str,
    ) -> Result<Option<Registration>, DatabaseError> {
        let mut connection = self.pool.get().await?;
        Ok(registrations::table
            .find(student_id)
            .select(Registration::as_select())
            .first(&mut connection)
            .await
            .optional()?)
    }

    async fn seats_taken(&self, club_id: &str) -> Result<usize, DatabaseError> {
        let mut connection = self.pool.get().await?;
        let count: i64 = registrations::table
            .filter(registrations::club_id.eq(club_id))
            .count()
            .get_result(&mut connection)
            .await?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    async fn insert_registration(
        &mut self,
        registration: &Registration,
    ) -> Result<(), DatabaseError> {
        let mut connection = self.pool.get().await?;
        let connection: &mut AsyncPgConnection = &mut connection;
        connection
            .transaction::<_, DatabaseError, _>(|connection| {
                async move {
                    // concurrent inserts into the same club queue up on this row lock
                    let max_seats: Option<i32> = clubs::table
                        .find(registration.club_id.as_str())
                        .select(clubs::max_seats)
                        .for_update()
                        .first(connection)
                        .await
                        .optional()?;
                    let Some(max_seats) = max_seats else {
                        return Err(DatabaseError::UnknownClub(registration.club_id.clone()));
                    };

                    let seats_taken: i64 = registrations::table
                        .filter(registrations::club_id.eq(registration.club_id.as_str()))
                        .count()
                        .get_result(connection)
                        .await?;
                    if seats_taken >= i64::from(max_seats) {
                        return Err(DatabaseError::ClubFull(registration.club_id.clone()));
                    }

                    match diesel::insert_into(registrations::table)
                        .values(registration)
                        .execute(connection)
                        .await
                    {
                        Ok(_) => Ok(()),
                        Err(diesel::result::Error::DatabaseError(
                            DatabaseErrorKind::UniqueViolation,
                            _,
                        )) => Err(DatabaseError::DuplicateRegistration(
                            registration.student_id.clone(),
                        )),
                        // the club row is locked and present, so only the student can be missing
                        Err(diesel::result::Error::DatabaseError(
                            DatabaseErrorKind::ForeignKeyViolation,
                            info,
                        )) => {
                            debug!("foreign key violation {:?}", info.constraint_name());
                            Err(DatabaseError::UnknownStudent(
                                registration.student_id.clone(),
                            ))
                        }
                        Err(error) => Err(error.into()),
                    }
                }
                .scope_boxed()
            })
            .await
    }

    async fn delete_registration(&mut self, student_id: &str) -> Result<bool, DatabaseError> {
        let mut connection = self.pool.get().await?;
        let deleted = diesel::delete(registrations::table.find(student_id))
            .execute(&mut connection)
            .await?;
        Ok(deleted > 0)
    }

    async fn set_cancellations_left(
        &mut self,
        student_id: &str,
        cancellations_left: i32,
    ) -> Result<(), DatabaseError> {
        let mut connection = self.pool.get().await?;
        let updated = diesel::update(students::table.find(student_id))
            .set(students::cancellations_left.eq(cancellations_left))
            .execute(&mut connection)
            .await?;
        if updated == 0 {
            return Err(DatabaseError::UnknownStudent(student_id.to_owned()));
        }
        Ok(())
    }

    async fn set_max_seats(&mut self, club_id: &str, max_seats: i32) -> Result<(), DatabaseError> {
        let mut connection = self.pool.get().await?;
        let updated = diesel::update(clubs::table.find(club_id))
            .set(clubs::max_seats.eq(max_seats))
            .execute(&mut connection)
            .await?;
        if updated == 0 {
            return Err(DatabaseError::UnknownClub(club_id.to_owned()));
        }
        Ok(())
    }

    async fn insert_student(&mut self, student: &Student) -> Result<(), DatabaseError> {
        let mut connection = self.pool.get().await?;
        diesel::insert_into(students::table)
            .values(student)
            .on_conflict(students::id)
            .do_update()
            .set(student)
            .execute(&mut connection)
            .await?;
        Ok(())
    }

    async fn insert_club(&mut self, club: &Club) -> Result<(), DatabaseError> {
        let mut connection = self.pool.get().await?;
        diesel::insert_into(clubs::table)
            .values(club)
            .on_conflict(clubs::id)
            .do_update()
            .set(club)
            .execute(&mut connection)
            .await?;
        Ok(())
    }

    async fn withdraw(
        &mut self,
        student_id: &str,
        cancellations_left: i32,
    ) -> Result<bool, DatabaseError> {
        let mut connection = self.pool.get().await?;
        let connection: &mut AsyncPgConnection = &mut connection;
        connection
            .transaction::<_, DatabaseError, _>(|connection| {
                async move {
                    let deleted = diesel::delete(registrations::table.find(student_id))
                        .execute(connection)
                        .await?;
                    if deleted == 0 {
                        return Ok(false);
                    }
                    diesel::update(students::table.find(student_id))
                        .set(students::cancellations_left.eq(cancellations_left))
                        .execute(connection)
                        .await?;
                    Ok(true)
                }
                .scope_boxed()
            })
            .await
    }
}
