// a small school to play with when no database is configured

use club_registration_database::models::{Club, Registration, Student};
use club_registration_database::{DatabaseError, RosterStore};
use tracing::info;

const ACADEMIC: &str = "วิชาการ";
const SPORTS: &str = "กีฬา";
const ARTS: &str = "ศิลปะและดนตรี";
const SOCIAL: &str = "บำเพ็ญประโยชน์/สังคม";
const TECHNOLOGY: &str = "เทคโนโลยี";
const GENERAL: &str = "ทั่วไป";

const ALL_GRADES: &[i32] = &[1, 2, 3, 4, 5, 6];
const LOWER_SECONDARY: &[i32] = &[1, 2, 3];
const UPPER_SECONDARY: &[i32] = &[4, 5, 6];

/// id, name, teacher, description, location, category, seats, grades
type ClubRow = (&'static str, &'static str, &'static str, &'static str, &'static str, &'static str, i32, &'static [i32]);

const CLUBS: &[ClubRow] = &[
    ("C001", "ชุมนุม AI และนวัตกรรม", "ครูวิชาการ สอนดี", "เรียนรู้เกี่ยวกับการสร้าง AI และการเขียนโปรแกรมเบื้องต้น", "อาคาร 3 ห้องคอมพิวเตอร์ 1", TECHNOLOGY, 25, ALL_GRADES),
    ("C002", "ชุมนุมศิลปะสร้างสรรค์", "ครูศิลปะ วาดสวย", "ฝึกฝนทักษะการวาดภาพและสร้างสรรค์ผลงานศิลปะหลากหลายรูปแบบ", "อาคารศิลปะ ห้อง 201", ARTS, 25, LOWER_SECONDARY),
    ("C003", "ชุมนุมกีฬาฟุตซอล", "ครูพละ แข็งแรง", "พัฒนาทักษะการเล่นกีฬาฟุตซอลและทำงานเป็นทีม", "สนามฟุตซอล", SPORTS, 25, ALL_GRADES),
    ("C004", "ชุมนุมดนตรีสากล", "ครูเมโลดี้", "เรียนรู้การเล่นเครื่องดนตรีสากลและร่วมวงดนตรี", "ห้องดนตรีสากล", ARTS, 25, UPPER_SECONDARY),
    ("C005", "ชุมนุมภาษาไทย", "ครูภาษาไทย รักชาติ", "เรียนรู้หลักภาษาไทยและการแต่งคำประพันธ์", "อาคาร 4 ห้อง 401", ACADEMIC, 30, ALL_GRADES),
    ("C006", "ชุมนุมอาสาพัฒนาชุมชน", "ครูจิตอาสา ใจดี", "ร่วมกันทำกิจกรรมบำเพ็ญประโยชน์ พัฒนาโรงเรียนและชุมชนรอบข้าง", "อาคารกิจกรรม", SOCIAL, 40, ALL_GRADES),
    ("C007", "ชุมนุมอาหารและเครื่องดื่ม", "ครูรสริน หวานเจี๊ยบ", "ฝึกการทำอาหารว่าง ขนมไทย และเครื่องดื่มประเภทต่างๆ", "อาคารคหกรรม ห้อง 1", GENERAL, 20, ALL_GRADES),
    ("C008", "ชุมนุมงานประดิษฐ์ DIY", "ครูสร้างสรรค์ งานฝีมือ", "ประดิษฐ์ของใช้ของตกแต่งจากวัสดุเหลือใช้และวัสดุธรรมชาติ", "ห้องงานบ้าน", GENERAL, 20, LOWER_SECONDARY),
    ("C009", "ชมรม E-Sports", "ครูเกมเมอร์ ไซเบอร์", "ฝึกฝนทักษะการเล่นเกมอย่างมีระบบ วางแผนทีม และการเป็นนักกีฬา E-Sports", "ห้องคอมพิวเตอร์ 2", TECHNOLOGY, 30, ALL_GRADES),
    ("C010", "ชุมนุมหุ่นยนต์ (Robotics)", "ครูโรบอท ยอดอัจฉริยะ", "เรียนรู้การประกอบและเขียนโปรแกรมควบคุมหุ่นยนต์เบื้องต้น", "ห้องปฏิบัติการวิทยาศาสตร์ 1", TECHNOLOGY, 20, LOWER_SECONDARY),
    ("C011", "วิทยาศาสตร์หรรษา", "ครูวิทย์ คิดสนุก", "ทดลองวิทยาศาสตร์สนุกๆ ที่ไม่มีในบทเรียน", "ห้องปฏิบัติการวิทยาศาสตร์ 2", ACADEMIC, 25, LOWER_SECONDARY),
    ("C012", "คณิตศาสตร์แฟนซี", "ครูคณิต คิดเร็ว", "เกมคณิตศาสตร์ ซูโดกุ และการแก้ปัญหาเชาวน์", "ห้อง 305", ACADEMIC, 30, ALL_GRADES),
    ("C013", "English Debate Club", "Teacher John Doe", "ฝึกทักษะการโต้วาทีและพูดสุนทรพจน์เป็นภาษาอังกฤษ", "Sound Lab", ACADEMIC, 20, UPPER_SECONDARY),
    ("C014", "บาสเกตบอล", "ครูชู้ต แม่นยำ", "ฝึกพื้นฐานการเล่นบาสเกตบอลและการเล่นทีม", "สนามบาสเกตบอล", SPORTS, 40, ALL_GRADES),
    ("C015", "วอลเลย์บอล", "ครูตบ หนักหน่วง", "ฝึกทักษะวอลเลย์บอล เสิร์ฟ รับ ตบ", "โรงยิม", SPORTS, 30, ALL_GRADES),
    ("C016", "แบดมินตัน", "ครูแบด ว่องไว", "ออกกำลังกายด้วยกีฬาแบดมินตัน (ต้องเตรียมไม้มาเอง)", "หอประชุม", SPORTS, 40, ALL_GRADES),
    ("C017", "เทเบิลเทนนิส (ปิงปอง)", "ครูปิงปอง สปิน", "ฝึกทักษะการตีปิงปอง", "ใต้ถุนอาคาร 4", SPORTS, 20, ALL_GRADES),
    ("C018", "นาฏศิลป์ไทย", "ครูรำไทย อ่อนช้อย", "อนุรักษ์ศิลปวัฒนธรรมไทย ฝึกรำไทยชุดต่างๆ", "ห้องนาฏศิลป์", ARTS, 25, ALL_GRADES),
    ("C019", "ชุมนุมถ่ายภาพ", "ครูชัตเตอร์ โฟกัส", "เทคนิคการถ่ายภาพด้วยกล้องดิจิทัลและมือถือ", "ห้องโสตทัศนศึกษา", ARTS, 20, UPPER_SECONDARY),
    ("C020", "หนังสั้นและการแสดง", "ครูผู้กำกับ ตัดต่อ", "เรียนรู้กระบวนการทำหนังสั้น ตั้งแต่เขียนบทจนถึงตัดต่อ", "ห้องคอมพิวเตอร์กราฟิก", ARTS, 20, &[3, 4, 5, 6]),
    ("C021", "Board Game Club", "ครูวางแผน กลยุทธ์", "ฝึกทักษะการคิดวิเคราะห์ผ่านการเล่นบอร์ดเกม", "ห้องสมุดโซนกิจกรรม", GENERAL, 30, ALL_GRADES),
    ("C022", "เกษตรพอเพียง", "ครูดิน ปลูกผัก", "เรียนรู้การปลูกผักสวนครัวและการทำปุ๋ยหมัก", "แปลงเกษตรหลังโรงเรียน", SOCIAL, 30, ALL_GRADES),
    ("C023", "รักการอ่าน", "ครูหนอนหนังสือ", "ส่งเสริมนิสัยรักการอ่าน และกิจกรรมรีวิวหนังสือ", "ห้องสมุด", GENERAL, 40, ALL_GRADES),
];

/// identity, name, student number, class, advisor, club
type StudentRow = (&'static str, &'static str, &'static str, &'static str, &'static str, Option<&'static str>);

const STUDENTS: &[StudentRow] = &[
    ("1111111111111", "นายสมชาย รักเรียน", "65001", "ม.4/1", "ครูสมศรี", Some("C001")),
    ("2222222222222", "นางสาวสมหญิง ใฝ่รู้", "65002", "ม.4/2", "ครูสมศักดิ์", Some("C001")),
    ("3333333333333", "เด็กชายมานะ เพียรศึกษา", "66001", "ม.1/3", "ครูวิชัย", Some("C005")),
    ("4444444444444", "เด็กหญิงปิติ ยินดี", "66002", "ม.1/1", "ครูพรทิพย์", Some("C005")),
    ("5555555555555", "ด.ช.รักไทย ใจกล้า", "66003", "ม.2/1", "ครูสมชาย", Some("C005")),
    ("6666666666666", "ด.ญ.วรรณคดี มีสุข", "66004", "ม.2/2", "ครูสมหญิง", Some("C005")),
    ("7777777777777", "นายกวี ศรีปราชญ์", "65003", "ม.5/1", "ครูสุนทร", Some("C005")),
    ("8888888888888", "น.ส.กาพย์กลอน อ่อนหวาน", "65004", "ม.5/2", "ครูภู่", Some("C005")),
    ("UNREG001", "ด.ช.หนึ่ง นามสมมติ", "66101", "ม.1/2", "ครูสมร", None),
    ("UNREG002", "ด.ญ.สอง ส่องแสง", "66102", "ม.1/4", "ครูสมร", None),
    ("UNREG003", "นายสาม สามัคคี", "65103", "ม.4/3", "ครูไพศาล", None),
    ("UNREG004", "น.ส.สี่ สีสัน", "65104", "ม.4/4", "ครูไพศาล", None),
    ("UNREG005", "ด.ช.ห้า หากล้า", "66205", "ม.2/3", "ครูอำนาจ", None),
    ("UNREG006", "ด.ญ.หก หรรษา", "66206", "ม.3/1", "ครูอำนาจ", None),
    ("UNREG007", "นายเจ็ด เจตนา", "64007", "ม.6/1", "ครูวิไล", None),
    ("UNREG008", "น.ส.แปด แปลกใหม่", "64008", "ม.6/2", "ครูวิไล", None),
    ("UNREG009", "ด.ช.เก้า ก้าวหน้า", "66309", "ม.3/2", "ครูมาลี", None),
    ("UNREG010", "ด.ญ.สิบ สุขใจ", "66310", "ม.2/5", "ครูมาลี", None),
];

/// The futsal club starts out completely booked.
const FULL_CLUB: &str = "C003";

#[must_use]
pub fn clubs() -> Vec<Club> {
    CLUBS
        .iter()
        .map(
            |&(id, name, teacher_name, description, location, category, max_seats, allowed_grades)| Club {
                id: id.to_owned(),
                name: name.to_owned(),
                teacher_name: teacher_name.to_owned(),
                description: description.to_owned(),
                location: location.to_owned(),
                category: category.to_owned(),
                max_seats,
                allowed_grades: allowed_grades.to_vec(),
            },
        )
        .collect()
}

/// Students with the club they start in, including enough fillers to book out
/// [`FULL_CLUB`].
#[must_use]
pub fn students(cancellation_quota: i32) -> Vec<(Student, Option<String>)> {
    let named = STUDENTS.iter().map(
        |&(id, name, student_number, class_name, advisor, club)| {
            (
                Student {
                    id: id.to_owned(),
                    name: name.to_owned(),
                    student_number: student_number.to_owned(),
                    class_name: class_name.to_owned(),
                    advisor: advisor.to_owned(),
                    cancellations_left: cancellation_quota,
                },
                club.map(str::to_owned),
            )
        },
    );
    let seats = CLUBS
        .iter()
        .find(|club| club.0 == FULL_CLUB)
        .map_or(0, |club| club.6);
    let fillers = (0..seats).map(|index| {
        (
            Student {
                id: format!("S_FULL_{index}"),
                name: format!("นักเรียนฟุตซอล {}", index + 1),
                student_number: format!("{}", 67000 + index),
                class_name: format!("ม.{}/1", index % 6 + 1),
                advisor: "ครูพละ แข็งแรง".to_owned(),
                cancellations_left: cancellation_quota,
            },
            Some(FULL_CLUB.to_owned()),
        )
    });
    named.chain(fillers).collect()
}

pub async fn seed<S: RosterStore + ?Sized>(
    store: &mut S,
    cancellation_quota: i32,
) -> Result<(), DatabaseError> {
    let clubs = clubs();
    for club in &clubs {
        store.insert_club(club).await?;
    }
    let students = students(cancellation_quota);
    for (student, club_id) in &students {
        store.insert_student(student).await?;
        if let Some(club_id) = club_id {
            store
                .insert_registration(&Registration {
                    student_id: student.id.clone(),
                    club_id: club_id.clone(),
                })
                .await?;
        }
    }
    info!(clubs = clubs.len(), students = students.len(), "seeded demo school");
    Ok(())
}

#[cfg(test)]
mod tests {
    use club_registration_database::MemoryRosterStore;

    use super::*;

    #[tokio::test]
    async fn seeded_school_respects_its_own_rules() -> Result<(), DatabaseError> {
        let mut store = MemoryRosterStore::new();
        seed(&mut store, 2).await?;

        assert_eq!(store.clubs().await?.len(), 23);
        assert_eq!(store.seats_taken(FULL_CLUB).await?, 25);
        assert_eq!(store.seats_taken("C005").await?, 6);
        assert_eq!(store.registrations().await?.len(), 8 + 25);

        for club in store.clubs().await? {
            assert!(store.seats_taken(&club.id).await? <= club.capacity());
        }
        Ok(())
    }
}
