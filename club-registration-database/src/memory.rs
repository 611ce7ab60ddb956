use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::DatabaseError;
use crate::models::{Club, Registration, Student};
use crate::store::RosterStore;

/// Roster kept in ordered maps, iteration order is by id.
#[derive(Debug, Default, Clone)]
pub struct MemoryRosterStore {
    students: BTreeMap<String, Student>,
    clubs: BTreeMap<String, Club>,
    /// student id -> club id
    registrations: BTreeMap<String, String>,
}

impl MemoryRosterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RosterStore for MemoryRosterStore {
    async fn students(&self) -> Result<Vec<Student>, DatabaseError> {
        Ok(self.students.values().cloned().collect())
    }

    async fn student(&self, id: &str) -> Result<Option<Student>, DatabaseError> {
        Ok(self.students.get(id).cloned())
    }

    async fn clubs(&self) -> Result<Vec<Club>, DatabaseError> {
        Ok(self.clubs.values().cloned().collect())
    }

    async fn club(&self, id: &str) -> Result<Option<Club>, DatabaseError> {
        Ok(self.clubs.get(id).cloned())
    }

    async fn registrations(&self) -> Result<Vec<Registration>, DatabaseError> {
        Ok(self
            .registrations
            .iter()
            .map(|(student_id, club_id)| Registration {
                student_id: student_id.clone(),
                club_id: club_id.clone(),
            })
            .collect())
    }

    async fn registration_of(
        &self,
        student_id: &str,
    ) -> Result<Option<Registration>, DatabaseError> {
        Ok(self
            .registrations
            .get(student_id)
            .map(|club_id| Registration {
                student_id: student_id.to_owned(),
                club_id: club_id.clone(),
            }))
    }

    async fn seats_taken(&self, club_id: &str) -> Result<usize, DatabaseError> {
        Ok(self
            .registrations
            .values()
            .filter(|registered| registered.as_str() == club_id)
            .count())
    }

    async fn insert_registration(
        &mut self,
        registration: &Registration,
    ) -> Result<(), DatabaseError> {
        let Some(club) = self.clubs.get(&registration.club_id) else {
            return Err(DatabaseError::UnknownClub(registration.club_id.clone()));
        };
        let seats_taken = self
            .registrations
            .values()
            .filter(|registered| **registered == club.id)
            .count();
        if seats_taken >= club.capacity() {
            return Err(DatabaseError::ClubFull(club.id.clone()));
        }
        if !self.students.contains_key(&registration.student_id) {
            return Err(DatabaseError::UnknownStudent(
                registration.student_id.clone(),
            ));
        }
        match self.registrations.entry(registration.student_id.clone()) {
            Entry::Occupied(_) => Err(DatabaseError::DuplicateRegistration(
                registration.student_id.clone(),
            )),
            Entry::Vacant(vacant) => {
                vacant.insert(registration.club_id.clone());
                Ok(())
            }
        }
    }

    async fn delete_registration(&mut self, student_id: &str) -> Result<bool, DatabaseError> {
        Ok(self.registrations.remove(student_id).is_some())
    }

    async fn set_cancellations_left(
        &mut self,
        student_id: &str,
        cancellations_left: i32,
    ) -> Result<(), DatabaseError> {
        let student = self
            .students
            .get_mut(student_id)
            .ok_or_else(|| DatabaseError::UnknownStudent(student_id.to_owned()))?;
        student.cancellations_left = cancellations_left;
        Ok(())
    }

    async fn set_max_seats(&mut self, club_id: &str, max_seats: i32) -> Result<(), DatabaseError> {
        let club = self
            .clubs
            .get_mut(club_id)
            .ok_or_else(|| DatabaseError::UnknownClub(club_id.to_owned()))?;
        club.max_seats = max_seats;
        Ok(())
    }

    async fn insert_student(&mut self, student: &Student) -> Result<(), DatabaseError> {
        self.students.insert(student.id.clone(), student.clone());
        Ok(())
    }

    async fn insert_club(&mut self, club: &Club) -> Result<(), DatabaseError> {
        self.clubs.insert(club.id.clone(), club.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str) -> Student {
        Student {
            id: id.to_owned(),
            name: format!("student {id}"),
            student_number: id.to_owned(),
            class_name: "ม.1/1".to_owned(),
            advisor: "advisor".to_owned(),
            cancellations_left: 2,
        }
    }

    fn club(id: &str) -> Club {
        Club {
            id: id.to_owned(),
            name: format!("club {id}"),
            teacher_name: "teacher".to_owned(),
            description: String::new(),
            location: String::new(),
            category: "general".to_owned(),
            max_seats: 10,
            allowed_grades: vec![1],
        }
    }

    async fn store() -> Result<MemoryRosterStore, DatabaseError> {
        let mut store = MemoryRosterStore::new();
        store.insert_student(&student("s1")).await?;
        store.insert_student(&student("s2")).await?;
        store.insert_club(&club("c1")).await?;
        Ok(store)
    }

    #[tokio::test]
    async fn second_registration_of_a_student_is_refused() -> Result<(), DatabaseError> {
        let mut store = store().await?;
        let registration = Registration {
            student_id: "s1".to_owned(),
            club_id: "c1".to_owned(),
        };
        store.insert_registration(&registration).await?;
        assert!(matches!(
            store.insert_registration(&registration).await,
            Err(DatabaseError::DuplicateRegistration(id)) if id == "s1"
        ));
        assert_eq!(store.seats_taken("c1").await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn registration_needs_existing_student_and_club() -> Result<(), DatabaseError> {
        let mut store = store().await?;
        assert!(matches!(
            store
                .insert_registration(&Registration {
                    student_id: "nobody".to_owned(),
                    club_id: "c1".to_owned(),
                })
                .await,
            Err(DatabaseError::UnknownStudent(_))
        ));
        assert!(matches!(
            store
                .insert_registration(&Registration {
                    student_id: "s1".to_owned(),
                    club_id: "nowhere".to_owned(),
                })
                .await,
            Err(DatabaseError::UnknownClub(_))
        ));
        assert!(store.registrations().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn full_club_takes_nobody_else() -> Result<(), DatabaseError> {
        let mut store = store().await?;
        store
            .insert_club(&Club {
                max_seats: 1,
                ..club("tiny")
            })
            .await?;
        store
            .insert_registration(&Registration {
                student_id: "s1".to_owned(),
                club_id: "tiny".to_owned(),
            })
            .await?;
        assert!(matches!(
            store
                .insert_registration(&Registration {
                    student_id: "s2".to_owned(),
                    club_id: "tiny".to_owned(),
                })
                .await,
            Err(DatabaseError::ClubFull(id)) if id == "tiny"
        ));
        assert_eq!(store.seats_taken("tiny").await?, 1);
        assert_eq!(store.registration_of("s2").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn withdraw_removes_edge_and_updates_counter() -> Result<(), DatabaseError> {
        let mut store = store().await?;
        store
            .insert_registration(&Registration {
                student_id: "s2".to_owned(),
                club_id: "c1".to_owned(),
            })
            .await?;

        assert!(store.withdraw("s2", 1).await?);
        assert_eq!(store.registration_of("s2").await?, None);
        assert_eq!(
            store.student("s2").await?.map(|s| s.cancellations_left),
            Some(1)
        );

        // nothing left to withdraw, counter untouched
        assert!(!store.withdraw("s2", 0).await?);
        assert_eq!(
            store.student("s2").await?.map(|s| s.cancellations_left),
            Some(1)
        );
        Ok(())
    }
}
