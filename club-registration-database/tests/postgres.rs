//! Needs a migrated PostgreSQL database:
//! `DATABASE_URL=postgres://postgres@localhost/clubs cargo test -p club-registration-database -- --ignored`
//!
//! Every test only touches rows whose ids start with its own prefix.

use club_registration_database::models::{Club, Registration, Student};
use club_registration_database::schema::{clubs, registrations, students};
use club_registration_database::{
    get_database_connection, DatabaseError, PgRosterStore, RosterStore as _,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

fn student(prefix: &str, name: &str) -> Student {
    Student {
        id: format!("{prefix}{name}"),
        name: format!("นักเรียน {name}"),
        student_number: format!("{prefix}{name}"),
        class_name: "ม.2/1".to_owned(),
        advisor: "ครูประจำชั้น".to_owned(),
        cancellations_left: 2,
    }
}

fn club(prefix: &str, name: &str, max_seats: i32) -> Club {
    Club {
        id: format!("{prefix}{name}"),
        name: format!("ชุมนุม {name}"),
        teacher_name: "ครูที่ปรึกษา".to_owned(),
        description: String::new(),
        location: "อาคาร 2".to_owned(),
        category: "ทั่วไป".to_owned(),
        max_seats,
        allowed_grades: vec![1, 2, 3],
    }
}

fn registration(student: &Student, club: &Club) -> Registration {
    Registration {
        student_id: student.id.clone(),
        club_id: club.id.clone(),
    }
}

async fn clean_store(prefix: &str) -> Result<PgRosterStore, DatabaseError> {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must name a migrated database");
    let pool = get_database_connection(&database_url)?;

    let pattern = format!("{prefix}%");
    let mut connection = pool.get().await?;
    diesel::delete(registrations::table.filter(registrations::student_id.like(pattern.as_str())))
        .execute(&mut connection)
        .await?;
    diesel::delete(registrations::table.filter(registrations::club_id.like(pattern.as_str())))
        .execute(&mut connection)
        .await?;
    diesel::delete(students::table.filter(students::id.like(pattern.as_str())))
        .execute(&mut connection)
        .await?;
    diesel::delete(clubs::table.filter(clubs::id.like(pattern.as_str())))
        .execute(&mut connection)
        .await?;
    drop(connection);

    Ok(PgRosterStore::new(pool))
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn insert_checks_seats_and_references() -> Result<(), DatabaseError> {
    let prefix = "PGT-insert-";
    let mut store = clean_store(prefix).await?;
    let small = club(prefix, "small", 2);
    let large = club(prefix, "large", 10);
    let [a, b, c] = ["a", "b", "c"].map(|name| student(prefix, name));
    store.insert_club(&small).await?;
    store.insert_club(&large).await?;
    for student in [&a, &b, &c] {
        store.insert_student(student).await?;
    }

    store.insert_registration(&registration(&a, &small)).await?;
    store.insert_registration(&registration(&b, &small)).await?;
    assert!(matches!(
        store.insert_registration(&registration(&c, &small)).await,
        Err(DatabaseError::ClubFull(id)) if id == small.id
    ));
    assert!(matches!(
        store.insert_registration(&registration(&a, &large)).await,
        Err(DatabaseError::DuplicateRegistration(id)) if id == a.id
    ));
    assert!(matches!(
        store
            .insert_registration(&registration(&c, &club(prefix, "missing", 1)))
            .await,
        Err(DatabaseError::UnknownClub(_))
    ));
    assert!(matches!(
        store
            .insert_registration(&registration(&student(prefix, "ghost"), &large))
            .await,
        Err(DatabaseError::UnknownStudent(_))
    ));

    assert_eq!(store.seats_taken(&small.id).await?, 2);
    assert_eq!(store.seats_taken(&large.id).await?, 0);
    assert_eq!(store.registration_of(&c.id).await?, None);
    Ok(())
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn withdraw_deletes_and_spends_together() -> Result<(), DatabaseError> {
    let prefix = "PGT-withdraw-";
    let mut store = clean_store(prefix).await?;
    let chess = club(prefix, "chess", 5);
    let a = student(prefix, "a");
    store.insert_club(&chess).await?;
    store.insert_student(&a).await?;
    store.insert_registration(&registration(&a, &chess)).await?;

    assert!(store.withdraw(&a.id, 1).await?);
    assert_eq!(store.registration_of(&a.id).await?, None);
    assert_eq!(
        store.student(&a.id).await?.map(|s| s.cancellations_left),
        Some(1)
    );

    assert!(!store.withdraw(&a.id, 0).await?);
    assert_eq!(
        store.student(&a.id).await?.map(|s| s.cancellations_left),
        Some(1)
    );
    Ok(())
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn two_writers_cannot_share_the_last_seat() -> Result<(), DatabaseError> {
    let prefix = "PGT-race-";
    let mut store = clean_store(prefix).await?;
    let robotics = club(prefix, "robotics", 1);
    let a = student(prefix, "a");
    let b = student(prefix, "b");
    store.insert_club(&robotics).await?;
    store.insert_student(&a).await?;
    store.insert_student(&b).await?;

    // separate handles, as if two server processes shared the database
    let mut first = store.clone();
    let mut second = store.clone();
    let first_registration = registration(&a, &robotics);
    let second_registration = registration(&b, &robotics);
    let (first, second) = tokio::join!(
        first.insert_registration(&first_registration),
        second.insert_registration(&second_registration),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|outcome| matches!(outcome, Err(DatabaseError::ClubFull(_)))));
    assert_eq!(store.seats_taken(&robotics.id).await?, 1);
    Ok(())
}
