use club_registration_database::models::Club;
use club_registration_database::{DatabaseError, RosterStore};
use club_registration_optimizer::{auto_assign, AutoAssignSummary};
use rand::rngs::StdRng;
use rand::SeedableRng as _;
use tokio::sync::Mutex;

use crate::capacity::{set_capacity, CapacityError};
use crate::registration::{cancel, register, RegistrationError, StudentView};
use crate::views::RosterSnapshot;

struct Inner {
    store: Box<dyn RosterStore>,
    rng: StdRng,
}

/// The shared roster every request goes through.
///
/// All operations, reads included, take the same lock. A registration therefore sees no
/// concurrent insert between counting seats and inserting, and an auto-assignment run
/// has the store to itself until it is done.
pub struct Roster {
    inner: Mutex<Inner>,
}

impl Roster {
    pub fn new(store: impl RosterStore + 'static, rng: StdRng) -> Self {
        Self {
            inner: Mutex::new(Inner {
                store: Box::new(store),
                rng,
            }),
        }
    }

    pub async fn register(
        &self,
        student_id: &str,
        club_id: &str,
        confirmed_identity: &str,
    ) -> Result<StudentView, RegistrationError> {
        let mut inner = self.inner.lock().await;
        register(&mut *inner.store, student_id, club_id, confirmed_identity).await
    }

    pub async fn cancel(
        &self,
        student_id: &str,
        confirmed_identity: &str,
    ) -> Result<StudentView, RegistrationError> {
        let mut inner = self.inner.lock().await;
        cancel(&mut *inner.store, student_id, confirmed_identity).await
    }

    pub async fn auto_assign(&self) -> Result<AutoAssignSummary, DatabaseError> {
        let mut inner = self.inner.lock().await;
        let Inner { store, rng } = &mut *inner;
        auto_assign(&mut **store, rng).await
    }

    pub async fn set_capacity(&self, club_id: &str, max_seats: i32) -> Result<Club, CapacityError> {
        let mut inner = self.inner.lock().await;
        set_capacity(&mut *inner.store, club_id, max_seats).await
    }

    pub async fn snapshot(&self) -> Result<RosterSnapshot, DatabaseError> {
        let inner = self.inner.lock().await;
        RosterSnapshot::read(&*inner.store).await
    }
}

/// A fixed seed makes auto-assignment reproducible, without one the OS provides entropy.
#[must_use]
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}
