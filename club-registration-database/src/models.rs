use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{clubs, registrations, students};

/// A student as stored. Whether the student is registered is not a column here, the
/// registrations table is the only place that knows.
#[derive(
    Queryable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq, Eq, Serialize, Deserialize,
)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// National id or G-ID. Also what the student has to type in again to confirm an action.
    pub id: String,
    pub name: String,
    pub student_number: String,
    /// For example `ม.4/1`, grade four, section one.
    pub class_name: String,
    pub advisor: String,
    pub cancellations_left: i32,
}

#[derive(
    Queryable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq, Eq, Serialize, Deserialize,
)]
#[diesel(table_name = clubs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: String,
    pub name: String,
    pub teacher_name: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub max_seats: i32,
    pub allowed_grades: Vec<i32>,
}

impl Club {
    /// `max_seats` as a count, a non-positive capacity holds nobody.
    #[must_use]
    pub fn capacity(&self) -> usize {
        usize::try_from(self.max_seats).unwrap_or(0)
    }
}

#[derive(
    Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[diesel(table_name = registrations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub student_id: String,
    pub club_id: String,
}
