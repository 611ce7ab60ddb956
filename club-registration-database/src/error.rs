use diesel_async::pooled_connection::deadpool;
use thiserror::Error;

#[allow(clippy::module_name_repetitions)]
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("could not set up the connection pool: {0}")]
    PoolBuild(#[from] deadpool::BuildError),
    #[error("no database connection available: {0}")]
    Pool(#[from] deadpool::PoolError),
    #[error("query failed: {0}")]
    Database(#[from] diesel::result::Error),
    /// A student has at most one registration.
    #[error("student {0} already has a registration")]
    DuplicateRegistration(String),
    #[error("no student with id {0}")]
    UnknownStudent(String),
    #[error("no club with id {0}")]
    UnknownClub(String),
    #[error("club {0} has no free seat")]
    ClubFull(String),
}
