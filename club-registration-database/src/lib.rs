pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod store;

use diesel_async::pooled_connection::deadpool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;
pub use error::DatabaseError;
pub use memory::MemoryRosterStore;
pub use postgres::PgRosterStore;
pub use store::RosterStore;

pub type Pool = deadpool::Pool<AsyncPgConnection>;

/// Connections are opened lazily, so a wrong url only shows up on the first query.
pub fn get_database_connection(database_url: &str) -> Result<Pool, DatabaseError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    Ok(Pool::builder(manager).build()?)
}
