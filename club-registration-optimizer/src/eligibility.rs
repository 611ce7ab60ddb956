use club_registration_database::models::{Club, Student};

/// School year tier, `1..=6`. Zero stands for a class label we could not read.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct GradeLevel(pub u8);

impl GradeLevel {
    pub const UNKNOWN: Self = Self(0);
    pub const HIGHEST: u8 = 6;

    #[must_use]
    pub const fn is_known(self) -> bool {
        self.0 >= 1 && self.0 <= Self::HIGHEST
    }
}

const CLASS_PREFIX: &str = "ม.";
const SECTION_SEPARATOR: char = '/';

/// Reads the grade out of a class label like `ม.4/1` (the prefix is optional, `4/1` works too).
///
/// Anything else yields [`GradeLevel::UNKNOWN`].
#[must_use]
pub fn parse_grade_level(class_name: &str) -> GradeLevel {
    let class_name = class_name.trim();
    let class_name = class_name.strip_prefix(CLASS_PREFIX).unwrap_or(class_name);
    let Some((grade, section)) = class_name.split_once(SECTION_SEPARATOR) else {
        return GradeLevel::UNKNOWN;
    };
    if section.is_empty() || grade.is_empty() || !grade.bytes().all(|b| b.is_ascii_digit()) {
        return GradeLevel::UNKNOWN;
    }
    match grade.parse::<u8>() {
        Ok(grade) if GradeLevel(grade).is_known() => GradeLevel(grade),
        _ => GradeLevel::UNKNOWN,
    }
}

#[must_use]
pub fn is_grade_allowed(grade: GradeLevel, club: &Club) -> bool {
    grade.is_known() && club.allowed_grades.contains(&i32::from(grade.0))
}

#[must_use]
pub fn is_eligible(student: &Student, club: &Club) -> bool {
    is_grade_allowed(parse_grade_level(&student.class_name), club)
}
