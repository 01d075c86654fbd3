use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct CreateExamTypeRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct GradeScaleRequest {
    #[serde(alias = "grade_name")]
    pub name: String,
    pub score_from: f64,
    pub score_to: f64,
    #[serde(default)]
    pub comment: String,
}

impl GradeScaleRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Grade name is required");
        }
        if name.chars().count() > 5 {
            return Err("Grade name must be at most 5 characters");
        }
        if !self.score_from.is_finite() || !self.score_to.is_finite() {
            return Err("Scores must be finite numbers");
        }
        if self.score_to < self.score_from {
            return Err("score_to must be greater than or equal to score_from");
        }
        Ok(())
    }
}

// 部分更新等级
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct PatchGradeScaleRequest {
    #[serde(alias = "grade_name")]
    pub name: Option<String>,
    pub score_from: Option<f64>,
    pub score_to: Option<f64>,
    pub comment: Option<String>,
}

impl PatchGradeScaleRequest {
    /// 叠加到已有等级上，结果仍需整体校验
    pub fn apply_to(self, current: &super::entities::GradeScale) -> GradeScaleRequest {
        GradeScaleRequest {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            score_from: self.score_from.unwrap_or(current.score_from),
            score_to: self.score_to.unwrap_or(current.score_to),
            comment: self.comment.unwrap_or_else(|| current.comment.clone()),
        }
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct ResolveGradeQuery {
    pub score: f64,
}

// 新建或整体替换成绩记录；记录日期由服务端在新建时填写
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct ExamRecordRequest {
    pub classroom_id: i64,
    pub section: Option<String>,
    pub subject_id: i64,
    pub student_id: i64,
    pub exam_type_id: i64,
    pub score: f64,
    pub comment: Option<String>,
    /// 指定后不再自动解析等级
    pub grade_id: Option<i64>,
}

// 部分更新成绩记录
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct PatchExamRecordRequest {
    pub classroom_id: Option<i64>,
    pub section: Option<String>,
    pub subject_id: Option<i64>,
    pub student_id: Option<i64>,
    pub exam_type_id: Option<i64>,
    pub score: Option<f64>,
    pub comment: Option<String>,
    pub grade_id: Option<i64>,
}

impl PatchExamRecordRequest {
    /// 在已有记录上叠加修改，得到完整的写入请求
    pub fn apply_to(self, current: &super::entities::ExamRecord) -> ExamRecordRequest {
        ExamRecordRequest {
            classroom_id: self.classroom_id.unwrap_or(current.classroom_id),
            section: self.section.or_else(|| current.section.clone()),
            subject_id: self.subject_id.unwrap_or(current.subject_id),
            student_id: self.student_id.unwrap_or(current.student_id),
            exam_type_id: self.exam_type_id.unwrap_or(current.exam_type_id),
            score: self.score.unwrap_or(current.score),
            comment: self.comment.or_else(|| current.comment.clone()),
            grade_id: self.grade_id,
        }
    }
}

pub fn validate_score(score: f64) -> Result<(), &'static str> {
    if !score.is_finite() || score < 0.0 {
        return Err("Score must be a non-negative number");
    }
    Ok(())
}

// 成绩列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct ExamRecordListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub classroom_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub exam_type_id: Option<i64>,
}

// 成绩列表查询参数（存储层）
#[derive(Debug, Clone, Default)]
pub struct ExamRecordListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub classroom_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub student_id: Option<i64>,
    pub exam_type_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_name_alias() {
        let req: GradeScaleRequest = serde_json::from_str(
            r#"{"grade_name":"A","score_from":90,"score_to":100,"comment":"Excellent"}"#,
        )
        .unwrap();
        assert_eq!(req.name, "A");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_grade_range_validation() {
        let mut req = GradeScaleRequest {
            name: "B".to_string(),
            score_from: 89.0,
            score_to: 80.0,
            comment: String::new(),
        };
        assert!(req.validate().is_err());
        req.score_to = 89.0;
        assert!(req.validate().is_ok());
        req.name = "TOOLONG".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_grade_patch_changes_only_comment() {
        let current = super::super::entities::GradeScale {
            id: 1,
            name: "A".to_string(),
            score_from: 90.0,
            score_to: 100.0,
            comment: "Excellent".to_string(),
        };
        let merged: PatchGradeScaleRequest =
            serde_json::from_str(r#"{"comment":"Outstanding"}"#).unwrap();
        let merged = merged.apply_to(&current);
        assert_eq!(merged.name, "A");
        assert_eq!(merged.score_from, 90.0);
        assert_eq!(merged.score_to, 100.0);
        assert_eq!(merged.comment, "Outstanding");
        assert!(merged.validate().is_ok());

        // 只改下限也要满足区间约束
        let invalid = PatchGradeScaleRequest {
            score_from: Some(101.0),
            ..Default::default()
        }
        .apply_to(&current);
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_patch_keeps_unset_fields() {
        let now = chrono::Utc::now();
        let current = super::super::entities::ExamRecord {
            id: 1,
            classroom_id: 2,
            section: Some("East".to_string()),
            subject_id: 3,
            student_id: 4,
            exam_type_id: 5,
            score: 70.0,
            comment: None,
            date_recorded: chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            grade_id: Some(9),
            created_at: now,
            updated_at: now,
        };
        let merged = PatchExamRecordRequest {
            score: Some(88.0),
            ..Default::default()
        }
        .apply_to(&current);

        assert_eq!(merged.score, 88.0);
        assert_eq!(merged.subject_id, 3);
        assert_eq!(merged.section.as_deref(), Some("East"));
        // 分数变了，等级重新解析
        assert!(merged.grade_id.is_none());
    }

    #[test]
    fn test_negative_score_rejected() {
        assert!(validate_score(-1.0).is_err());
        assert!(validate_score(f64::NAN).is_err());
        assert!(validate_score(0.0).is_ok());
    }
}
