//! Read-only projections of the roster for the dashboards.
//!
//! Everything here works on a [`RosterSnapshot`], so one view never mixes two states of
//! the store.

use std::collections::HashMap;
use std::fmt::Write as _;

use club_registration_database::models::{Club, Registration, Student};
use club_registration_database::{DatabaseError, RosterStore};
use club_registration_optimizer::{is_grade_allowed, parse_grade_level};
use itertools::Itertools as _;
use serde::Serialize;

#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    pub students: Vec<Student>,
    pub clubs: Vec<Club>,
    pub registrations: Vec<Registration>,
}

impl RosterSnapshot {
    pub async fn read<S: RosterStore + ?Sized>(store: &S) -> Result<Self, DatabaseError> {
        Ok(Self {
            students: store.students().await?,
            clubs: store.clubs().await?,
            registrations: store.registrations().await?,
        })
    }

    fn seats_taken(&self) -> HashMap<&str, usize> {
        self.registrations
            .iter()
            .map(|registration| registration.club_id.as_str())
            .counts()
    }

    fn club_of(&self, student_id: &str) -> Option<&str> {
        self.registrations
            .iter()
            .find(|registration| registration.student_id == student_id)
            .map(|registration| registration.club_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubSeats {
    #[serde(flatten)]
    pub club: Club,
    pub current_seats: usize,
    pub fill_percentage: f64,
}

impl ClubSeats {
    fn new(club: &Club, current_seats: usize) -> Self {
        Self {
            club: club.clone(),
            current_seats,
            fill_percentage: fill_percentage(current_seats, club.max_seats),
        }
    }
}

fn fill_percentage(current_seats: usize, max_seats: i32) -> f64 {
    if max_seats <= 0 {
        return 0.0;
    }
    let current_seats = f64::from(u32::try_from(current_seats).unwrap_or(u32::MAX));
    current_seats * 100.0 / f64::from(max_seats)
}

/// A club as one particular student sees it in the club list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubStatus {
    #[serde(flatten)]
    pub club: Club,
    pub current_seats: usize,
    pub is_registered: bool,
    pub is_full: bool,
    pub is_allowed_grade: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub id: String,
    pub student_number: String,
    pub name: String,
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubRoster {
    #[serde(flatten)]
    pub club: Club,
    pub students: Vec<RosterEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicOverview {
    pub clubs: Vec<ClubSeats>,
    pub unregistered: Vec<Student>,
}

#[must_use]
pub fn club_seats(snapshot: &RosterSnapshot) -> Vec<ClubSeats> {
    let seats_taken = snapshot.seats_taken();
    snapshot
        .clubs
        .iter()
        .map(|club| ClubSeats::new(club, seats_taken.get(club.id.as_str()).copied().unwrap_or(0)))
        .collect()
}

#[must_use]
pub fn unregistered_students(snapshot: &RosterSnapshot) -> Vec<Student> {
    snapshot
        .students
        .iter()
        .filter(|student| snapshot.club_of(&student.id).is_none())
        .cloned()
        .collect()
}

/// `None` if there is no such student.
#[must_use]
pub fn clubs_for_student(snapshot: &RosterSnapshot, student_id: &str) -> Option<Vec<ClubStatus>> {
    let student = snapshot
        .students
        .iter()
        .find(|student| student.id == student_id)?;
    let grade = parse_grade_level(&student.class_name);
    let registered_club = snapshot.club_of(student_id);
    let seats_taken = snapshot.seats_taken();

    Some(
        snapshot
            .clubs
            .iter()
            .map(|club| {
                let current_seats = seats_taken.get(club.id.as_str()).copied().unwrap_or(0);
                ClubStatus {
                    club: club.clone(),
                    current_seats,
                    is_registered: registered_club == Some(club.id.as_str()),
                    is_full: current_seats >= club.capacity(),
                    is_allowed_grade: is_grade_allowed(grade, club),
                }
            })
            .collect(),
    )
}

/// `None` if there is no such club.
#[must_use]
pub fn club_roster(snapshot: &RosterSnapshot, club_id: &str) -> Option<ClubRoster> {
    let club = snapshot.clubs.iter().find(|club| club.id == club_id)?;
    let students = snapshot
        .students
        .iter()
        .filter(|student| snapshot.club_of(&student.id) == Some(club_id))
        .map(|student| RosterEntry {
            id: student.id.clone(),
            student_number: student.student_number.clone(),
            name: student.name.clone(),
            class_name: student.class_name.clone(),
        })
        .collect();
    Some(ClubRoster {
        club: club.clone(),
        students,
    })
}

#[must_use]
pub fn overview(snapshot: &RosterSnapshot) -> AcademicOverview {
    AcademicOverview {
        clubs: club_seats(snapshot),
        unregistered: unregistered_students(snapshot),
    }
}

// spreadsheet programs only detect UTF-8 (and therefore Thai names) with a BOM
const BYTE_ORDER_MARK: char = '\u{feff}';

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

#[must_use]
pub fn overview_csv(clubs: &[ClubSeats]) -> String {
    let mut csv = String::new();
    csv.push(BYTE_ORDER_MARK);
    csv.push_str("ชื่อชุมนุม,ครูผู้สอน,สถานที่เรียน,จำนวนที่ลงทะเบียน,จำนวนที่รับ\r\n");
    for seats in clubs {
        // writing into a String cannot fail
        let _ = write!(
            csv,
            "{},{},{},{},{}\r\n",
            csv_field(&seats.club.name),
            csv_field(&seats.club.teacher_name),
            csv_field(&seats.club.location),
            seats.current_seats,
            seats.club.max_seats,
        );
    }
    csv
}

#[must_use]
pub fn unregistered_csv(students: &[Student]) -> String {
    let mut csv = String::new();
    csv.push(BYTE_ORDER_MARK);
    csv.push_str("เลขประจำตัว,ชื่อ-สกุล,ชั้น,ครูที่ปรึกษา\r\n");
    for student in students {
        let _ = write!(
            csv,
            "{},{},{},{}\r\n",
            csv_field(&student.student_number),
            csv_field(&student.name),
            csv_field(&student.class_name),
            csv_field(&student.advisor),
        );
    }
    csv
}

#[must_use]
pub fn roster_csv(roster: &ClubRoster) -> String {
    let mut csv = String::new();
    csv.push(BYTE_ORDER_MARK);
    csv.push_str("เลขประจำตัว,ชื่อ-สกุล,ชั้น\r\n");
    for entry in &roster.students {
        let _ = write!(
            csv,
            "{},{},{}\r\n",
            csv_field(&entry.student_number),
            csv_field(&entry.name),
            csv_field(&entry.class_name),
        );
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> RosterSnapshot {
        let student = |id: &str, class_name: &str| Student {
            id: id.to_owned(),
            name: format!("name {id}"),
            student_number: format!("66{id}"),
            class_name: class_name.to_owned(),
            advisor: "ครูวิไล".to_owned(),
            cancellations_left: 2,
        };
        let club = |id: &str, max_seats: i32, allowed_grades: Vec<i32>| Club {
            id: id.to_owned(),
            name: format!("club {id}"),
            teacher_name: "teacher".to_owned(),
            description: String::new(),
            location: "อาคาร 3, ห้อง 1".to_owned(),
            category: "general".to_owned(),
            max_seats,
            allowed_grades,
        };
        let registration = |student_id: &str, club_id: &str| Registration {
            student_id: student_id.to_owned(),
            club_id: club_id.to_owned(),
        };
        RosterSnapshot {
            students: vec![
                student("1", "ม.1/1"),
                student("2", "ม.1/2"),
                student("3", "ม.4/1"),
            ],
            clubs: vec![club("junior", 2, vec![1, 2, 3]), club("senior", 4, vec![4, 5, 6])],
            registrations: vec![registration("1", "junior"), registration("3", "senior")],
        }
    }

    #[test]
    fn seats_and_percentages() {
        let seats = club_seats(&snapshot());
        assert_eq!(seats.len(), 2);
        assert_eq!(seats[0].current_seats, 1);
        assert!((seats[0].fill_percentage - 50.0).abs() < f64::EPSILON);
        assert!((seats[1].fill_percentage - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unregistered_are_those_without_edge() {
        let unregistered = unregistered_students(&snapshot());
        assert_eq!(
            unregistered.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            vec!["2"]
        );
    }

    #[test]
    fn student_club_list_marks_status() {
        let snapshot = snapshot();
        let clubs = clubs_for_student(&snapshot, "1").unwrap();
        let junior = clubs.iter().find(|c| c.club.id == "junior").unwrap();
        assert!(junior.is_registered);
        assert!(junior.is_allowed_grade);
        assert!(!junior.is_full);
        let senior = clubs.iter().find(|c| c.club.id == "senior").unwrap();
        assert!(!senior.is_registered);
        assert!(!senior.is_allowed_grade);

        assert!(clubs_for_student(&snapshot, "missing").is_none());
    }

    #[test]
    fn roster_lists_members_only() {
        let roster = club_roster(&snapshot(), "junior").unwrap();
        assert_eq!(roster.students.len(), 1);
        assert_eq!(roster.students[0].student_number, "661");
        assert!(club_roster(&snapshot(), "missing").is_none());
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        let csv = overview_csv(&club_seats(&snapshot()));
        assert!(csv.starts_with('\u{feff}'));
        assert!(csv.contains("club junior,teacher,\"อาคาร 3, ห้อง 1\",1,2\r\n"));
        assert_eq!(csv.lines().count(), 3);

        let csv = unregistered_csv(&unregistered_students(&snapshot()));
        assert!(csv.ends_with("662,name 2,ม.1/2,ครูวิไล\r\n"));

        let roster = club_roster(&snapshot(), "senior").unwrap();
        assert_eq!(
            roster_csv(&roster),
            "\u{feff}เลขประจำตัว,ชื่อ-สกุล,ชั้น\r\n663,name 3,ม.4/1\r\n"
        );
    }

    #[test]
    fn serializes_camel_case_and_flattens_the_club() {
        let value = serde_json::to_value(&club_seats(&snapshot())[0]).unwrap();
        assert_eq!(value["id"], "junior");
        assert_eq!(value["maxSeats"], 2);
        assert_eq!(value["currentSeats"], 1);
        assert_eq!(value["allowedGrades"], serde_json::json!([1, 2, 3]));
    }
}
