use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 班级
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct Classroom {
    pub id: i64,
    pub name: String,
    pub section: Option<String>,
    pub academic_year: String,
    pub class_teacher_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 科目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
}

// 班级开设的科目及任课教师
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct ClassroomSubject {
    pub id: i64,
    pub classroom_id: i64,
    pub subject: Subject,
    pub teacher_id: Option<i64>,
    pub teacher_name: Option<String>,
}

// 入班状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "academic.ts")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Withdrawn,
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentStatus::Active => write!(f, "active"),
            EnrollmentStatus::Completed => write!(f, "completed"),
            EnrollmentStatus::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EnrollmentStatus::Active),
            "completed" => Ok(EnrollmentStatus::Completed),
            "withdrawn" => Ok(EnrollmentStatus::Withdrawn),
            _ => Err(format!("Invalid enrollment status: {s}")),
        }
    }
}

// 入班记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub classroom_id: i64,
    pub status: EnrollmentStatus,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}
