use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

static SUBJECT_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("Invalid subject code regex"));

// 班级列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct ClassroomListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub academic_year: Option<String>,
    pub search: Option<String>,
}

// 班级列表查询参数（存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassroomListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub academic_year: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct CreateClassroomRequest {
    pub name: String,
    pub section: Option<String>,
    pub academic_year: String,
    pub class_teacher_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct UpdateClassroomRequest {
    pub name: Option<String>,
    pub section: Option<String>,
    pub academic_year: Option<String>,
    pub class_teacher_id: Option<i64>,
}

fn validate_academic_year(year: &str) -> Result<(), &'static str> {
    if year.trim().len() < 4 {
        return Err("Academic year must be at least 4 characters");
    }
    Ok(())
}

impl CreateClassroomRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("Classroom name is required");
        }
        validate_academic_year(&self.academic_year)
    }
}

impl UpdateClassroomRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err("Classroom name is required");
        }
        match &self.academic_year {
            Some(year) => validate_academic_year(year),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct CreateSubjectRequest {
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
}

fn validate_subject_code(code: &str) -> Result<(), &'static str> {
    if !SUBJECT_CODE_RE.is_match(code) {
        return Err("Subject code must be alphanumeric");
    }
    Ok(())
}

impl CreateSubjectRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("Subject name is required");
        }
        match &self.code {
            Some(code) => validate_subject_code(code),
            None => Ok(()),
        }
    }
}

impl UpdateSubjectRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err("Subject name is required");
        }
        match &self.code {
            Some(code) => validate_subject_code(code),
            None => Ok(()),
        }
    }
}

/// 给班级分配科目（按 classroom + subject 覆盖）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct AssignSubjectRequest {
    pub classroom_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
}

/// 学生入班
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct EnrollStudentRequest {
    pub student_id: Option<i64>,
    pub classroom_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct EnrollmentListParams {
    pub student_id: Option<i64>,
    pub classroom_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classroom_academic_year_length() {
        let mut req = CreateClassroomRequest {
            name: "Form 1".to_string(),
            section: Some("East".to_string()),
            academic_year: "24".to_string(),
            class_teacher_id: None,
        };
        assert!(req.validate().is_err());
        req.academic_year = "2024".to_string();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_subject_code_alphanumeric() {
        let mut req = CreateSubjectRequest {
            name: "Mathematics".to_string(),
            code: Some("MAT-101".to_string()),
            description: None,
        };
        assert_eq!(req.validate(), Err("Subject code must be alphanumeric"));
        req.code = Some("MAT101".to_string());
        assert!(req.validate().is_ok());
        req.code = None;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_rejects_blank_name() {
        let req = UpdateSubjectRequest {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
