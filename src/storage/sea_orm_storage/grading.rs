use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{exam_records, exam_types, grade_scales, subjects};
use crate::errors::{Result, SchoolError};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    grading::{
        entities::{ExamType, GradeScale},
        requests::{ExamRecordListQuery, ExamRecordRequest, GradeScaleRequest, validate_score},
        resolver::resolve_grade,
        responses::{ExamRecordListResponse, ExamRecordView},
    },
    users::entities::UserRole,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

async fn load_grade_scales_in(txn: &DatabaseTransaction) -> Result<Vec<GradeScale>> {
    let scales = GradeScales::find()
        .order_by_desc(grade_scales::Column::ScoreFrom)
        .all(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("查询等级表失败: {e}")))?;

    Ok(scales.into_iter().map(|m| m.into_grade_scale()).collect())
}

/// 成绩记录的写入方式；记录日期只在新建时确定，之后只读
enum RecordWrite {
    Insert { recorded_on: chrono::NaiveDate },
    Update { id: i64 },
}

impl RecordWrite {
    fn existing_id(&self) -> Option<i64> {
        match self {
            RecordWrite::Insert { .. } => None,
            RecordWrite::Update { id } => Some(*id),
        }
    }
}

/// 校验并写入成绩记录
async fn write_exam_record_in(
    txn: &DatabaseTransaction,
    write: RecordWrite,
    req: ExamRecordRequest,
) -> Result<i64> {
    validate_score(req.score).map_err(SchoolError::validation)?;

    let student = Users::find_by_id(req.student_id)
        .one(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("查询学生失败: {e}")))?;
    if !student.is_some_and(|s| s.role == UserRole::STUDENT) {
        return Err(SchoolError::not_found("Student not found"));
    }

    let subject = Subjects::find_by_id(req.subject_id)
        .one(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("查询科目失败: {e}")))?;
    if subject.is_none() {
        return Err(SchoolError::not_found("Subject not found"));
    }

    let classroom = Classrooms::find_by_id(req.classroom_id)
        .one(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("查询班级失败: {e}")))?;
    if classroom.is_none() {
        return Err(SchoolError::not_found("Classroom not found"));
    }

    let exam_type = ExamTypes::find_by_id(req.exam_type_id)
        .one(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("查询考试类型失败: {e}")))?;
    if exam_type.is_none() {
        return Err(SchoolError::not_found("Exam type not found"));
    }

    // (学生, 科目, 考试类型, 班级) 只能有一条记录
    let mut duplicate = ExamRecords::find()
        .filter(exam_records::Column::StudentId.eq(req.student_id))
        .filter(exam_records::Column::SubjectId.eq(req.subject_id))
        .filter(exam_records::Column::ExamTypeId.eq(req.exam_type_id))
        .filter(exam_records::Column::ClassroomId.eq(req.classroom_id));
    if let Some(id) = write.existing_id() {
        duplicate = duplicate.filter(exam_records::Column::Id.ne(id));
    }
    let duplicate = duplicate
        .one(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("查询成绩记录失败: {e}")))?;
    if duplicate.is_some() {
        return Err(SchoolError::validation(
            "An exam record for this student, subject, exam type and classroom already exists",
        ));
    }

    let grade_id = match req.grade_id {
        Some(grade_id) => {
            let grade = GradeScales::find_by_id(grade_id)
                .one(txn)
                .await
                .map_err(|e| SchoolError::database_operation(format!("查询等级失败: {e}")))?;
            if grade.is_none() {
                return Err(SchoolError::not_found("Grade not found"));
            }
            Some(grade_id)
        }
        None => {
            let scales = load_grade_scales_in(txn).await?;
            resolve_grade(&scales, req.score).map(|g| g.id)
        }
    };

    let now = chrono::Utc::now().timestamp();
    let mut model = ExamRecordActiveModel {
        classroom_id: Set(req.classroom_id),
        section: Set(req.section),
        subject_id: Set(req.subject_id),
        student_id: Set(req.student_id),
        exam_type_id: Set(req.exam_type_id),
        score: Set(req.score),
        comment: Set(req.comment),
        grade_id: Set(grade_id),
        updated_at: Set(now),
        ..Default::default()
    };

    let saved = match write {
        RecordWrite::Update { id } => {
            model.id = Set(id);
            model
                .update(txn)
                .await
                .map_err(|e| SchoolError::database_operation(format!("更新成绩记录失败: {e}")))?
        }
        RecordWrite::Insert { recorded_on } => {
            model.date_recorded = Set(recorded_on);
            model.created_at = Set(now);
            model
                .insert(txn)
                .await
                .map_err(|e| SchoolError::database_operation(format!("创建成绩记录失败: {e}")))?
        }
    };

    Ok(saved.id)
}

impl SeaOrmStorage {
    // 考试类型

    pub async fn list_exam_types_impl(&self) -> Result<Vec<ExamType>> {
        let items = ExamTypes::find()
            .order_by_asc(exam_types::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询考试类型失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_exam_type()).collect())
    }

    pub async fn create_exam_type_impl(&self, name: &str) -> Result<ExamType> {
        let existing = ExamTypes::find()
            .filter(exam_types::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询考试类型失败: {e}")))?;
        if existing.is_some() {
            return Err(SchoolError::conflict(format!(
                "Exam type '{name}' already exists"
            )));
        }

        let result = ExamTypeActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolError::database_operation(format!("创建考试类型失败: {e}")))?;

        Ok(result.into_exam_type())
    }

    pub async fn delete_exam_type_impl(&self, id: i64) -> Result<bool> {
        let result = ExamTypes::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除考试类型失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    // 等级表

    pub async fn list_grade_scales_impl(&self) -> Result<Vec<GradeScale>> {
        let scales = GradeScales::find()
            .order_by_desc(grade_scales::Column::ScoreFrom)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询等级表失败: {e}")))?;

        Ok(scales.into_iter().map(|m| m.into_grade_scale()).collect())
    }

    pub async fn create_grade_scale_impl(&self, req: GradeScaleRequest) -> Result<GradeScale> {
        let result = GradeScaleActiveModel {
            name: Set(req.name.trim().to_string()),
            score_from: Set(req.score_from),
            score_to: Set(req.score_to),
            comment: Set(req.comment),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolError::database_operation(format!("创建等级失败: {e}")))?;

        Ok(result.into_grade_scale())
    }

    pub async fn get_grade_scale_by_id_impl(&self, id: i64) -> Result<Option<GradeScale>> {
        let result = GradeScales::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询等级失败: {e}")))?;

        Ok(result.map(|m| m.into_grade_scale()))
    }

    pub async fn update_grade_scale_impl(
        &self,
        id: i64,
        req: GradeScaleRequest,
    ) -> Result<Option<GradeScale>> {
        if self.get_grade_scale_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let updated = GradeScaleActiveModel {
            id: Set(id),
            name: Set(req.name.trim().to_string()),
            score_from: Set(req.score_from),
            score_to: Set(req.score_to),
            comment: Set(req.comment),
        }
        .update(&self.db)
        .await
        .map_err(|e| SchoolError::database_operation(format!("更新等级失败: {e}")))?;

        Ok(Some(updated.into_grade_scale()))
    }

    pub async fn delete_grade_scale_impl(&self, id: i64) -> Result<bool> {
        let result = GradeScales::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除等级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn resolve_grade_impl(&self, score: f64) -> Result<Option<GradeScale>> {
        let scales = self.list_grade_scales_impl().await?;
        Ok(resolve_grade(&scales, score).cloned())
    }

    // 成绩记录

    /// 补全姓名、科目、考试类型和等级
    async fn build_exam_views(
        &self,
        records: Vec<crate::entity::exam_records::Model>,
    ) -> Result<Vec<ExamRecordView>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids = records.iter().map(|r| r.student_id).collect();
        let names = self.load_user_names(student_ids).await?;

        let subject_names: HashMap<i64, String> = Subjects::find()
            .filter(subjects::Column::Id.is_in(records.iter().map(|r| r.subject_id)))
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询科目失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let exam_type_names: HashMap<i64, String> = ExamTypes::find()
            .filter(exam_types::Column::Id.is_in(records.iter().map(|r| r.exam_type_id)))
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询考试类型失败: {e}")))?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();

        let scales = self.list_grade_scales_impl().await?;

        Ok(records
            .into_iter()
            .map(|model| {
                let record = model.into_exam_record();
                // 未保存等级时按当前等级表解析
                let grade = match record.grade_id {
                    Some(id) => scales.iter().find(|g| g.id == id),
                    None => resolve_grade(&scales, record.score),
                };
                ExamRecordView {
                    student_name: names.get(&record.student_id).cloned().unwrap_or_default(),
                    subject_name: subject_names
                        .get(&record.subject_id)
                        .cloned()
                        .unwrap_or_default(),
                    exam_type_name: exam_type_names
                        .get(&record.exam_type_id)
                        .cloned()
                        .unwrap_or_default(),
                    grade_name: grade.map(|g| g.name.clone()),
                    grade_comment: grade.map(|g| g.comment.clone()),
                    record,
                }
            })
            .collect())
    }

    pub async fn create_exam_record_impl(
        &self,
        req: ExamRecordRequest,
        today: chrono::NaiveDate,
    ) -> Result<ExamRecordView> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        let id =
            write_exam_record_in(&txn, RecordWrite::Insert { recorded_on: today }, req).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_exam_record_impl(id)
            .await?
            .ok_or_else(|| SchoolError::not_found("Exam record not found"))
    }

    pub async fn get_exam_record_impl(&self, id: i64) -> Result<Option<ExamRecordView>> {
        let Some(model) = ExamRecords::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询成绩记录失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.build_exam_views(vec![model]).await?.pop())
    }

    pub async fn list_exam_records_with_pagination_impl(
        &self,
        query: ExamRecordListQuery,
    ) -> Result<ExamRecordListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = ExamRecords::find();
        if let Some(classroom_id) = query.classroom_id {
            select = select.filter(exam_records::Column::ClassroomId.eq(classroom_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(exam_records::Column::SubjectId.eq(subject_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(exam_records::Column::StudentId.eq(student_id));
        }
        if let Some(exam_type_id) = query.exam_type_id {
            select = select.filter(exam_records::Column::ExamTypeId.eq(exam_type_id));
        }

        let paginator = select
            .order_by_desc(exam_records::Column::DateRecorded)
            .order_by_desc(exam_records::Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询成绩总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询成绩页数失败: {e}")))?;
        let records = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(ExamRecordListResponse {
            items: self.build_exam_views(records).await?,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_exam_record_impl(
        &self,
        id: i64,
        req: ExamRecordRequest,
    ) -> Result<Option<ExamRecordView>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        let exists = ExamRecords::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询成绩记录失败: {e}")))?
            .is_some();
        if !exists {
            return Ok(None);
        }

        write_exam_record_in(&txn, RecordWrite::Update { id }, req).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_exam_record_impl(id).await
    }

    pub async fn delete_exam_record_impl(&self, id: i64) -> Result<bool> {
        let result = ExamRecords::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除成绩记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::academic::requests::{CreateClassroomRequest, CreateSubjectRequest};
    use crate::models::users::requests::CreateUserRequest;

    struct Fixture {
        storage: SeaOrmStorage,
        classroom_id: i64,
        subject_id: i64,
        student_id: i64,
        exam_type_id: i64,
    }

    fn scale(name: &str, from: f64, to: f64) -> GradeScaleRequest {
        GradeScaleRequest {
            name: name.to_string(),
            score_from: from,
            score_to: to,
            comment: String::new(),
        }
    }

    async fn fixture() -> Fixture {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let classroom_id = storage
            .create_classroom_impl(CreateClassroomRequest {
                name: "Form 4".to_string(),
                section: None,
                academic_year: "2024".to_string(),
                class_teacher_id: None,
            })
            .await
            .unwrap()
            .id;
        let subject_id = storage
            .create_subject_impl(CreateSubjectRequest {
                name: "Mathematics".to_string(),
                code: Some("MAT".to_string()),
                description: None,
            })
            .await
            .unwrap()
            .id;
        let student_id = storage
            .create_user_impl(CreateUserRequest {
                email: "rehema@school.test".to_string(),
                first_name: "Rehema".to_string(),
                last_name: "Juma".to_string(),
                password: "hash".to_string(),
                role: UserRole::Student,
            })
            .await
            .unwrap()
            .id;
        let exam_type_id = storage.create_exam_type_impl("Midterm").await.unwrap().id;

        for (name, from, to) in [("A", 90.0, 100.0), ("B", 80.0, 89.99), ("C", 70.0, 79.99)] {
            storage
                .create_grade_scale_impl(scale(name, from, to))
                .await
                .unwrap();
        }

        Fixture {
            storage,
            classroom_id,
            subject_id,
            student_id,
            exam_type_id,
        }
    }

    impl Fixture {
        fn record(&self, score: f64) -> ExamRecordRequest {
            ExamRecordRequest {
                classroom_id: self.classroom_id,
                section: None,
                subject_id: self.subject_id,
                student_id: self.student_id,
                exam_type_id: self.exam_type_id,
                score,
                comment: None,
                grade_id: None,
            }
        }
    }

    fn today() -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[tokio::test]
    async fn test_record_resolves_grade() {
        let f = fixture().await;

        let view = f
            .storage
            .create_exam_record_impl(f.record(85.0), today())
            .await
            .unwrap();
        assert_eq!(view.grade_name.as_deref(), Some("B"));
        assert_eq!(view.student_name, "Rehema Juma");
        assert_eq!(view.exam_type_name, "Midterm");
        assert_eq!(view.record.date_recorded, today());

        let resolved = f.storage.resolve_grade_impl(101.0).await.unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_record_rejected() {
        let f = fixture().await;

        f.storage
            .create_exam_record_impl(f.record(72.0), today())
            .await
            .unwrap();
        let err = f
            .storage
            .create_exam_record_impl(f.record(95.0), today())
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_regrades_and_keeps_uniqueness() {
        let f = fixture().await;

        let created = f
            .storage
            .create_exam_record_impl(f.record(72.0), today())
            .await
            .unwrap();
        assert_eq!(created.grade_name.as_deref(), Some("C"));

        // 更新自身不算重复
        let updated = f
            .storage
            .update_exam_record_impl(created.record.id, f.record(93.0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.grade_name.as_deref(), Some("A"));
        assert_eq!(updated.record.score, 93.0);

        let missing = f
            .storage
            .update_exam_record_impl(9999, f.record(50.0))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_recorded_date() {
        let f = fixture().await;

        let created = f
            .storage
            .create_exam_record_impl(f.record(64.0), today())
            .await
            .unwrap();
        assert_eq!(created.record.date_recorded, today());

        let replaced = f
            .storage
            .update_exam_record_impl(created.record.id, f.record(73.0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.record.date_recorded, today());
        assert_eq!(replaced.record.score, 73.0);
    }

    #[tokio::test]
    async fn test_negative_score_rejected() {
        let f = fixture().await;

        let err = f
            .storage
            .create_exam_record_impl(f.record(-1.0), today())
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_references_not_found() {
        let f = fixture().await;

        let mut req = f.record(60.0);
        req.exam_type_id = 9999;
        let err = f
            .storage
            .create_exam_record_impl(req, today())
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::NotFound(_)));

        let mut req = f.record(60.0);
        req.grade_id = Some(9999);
        let err = f
            .storage
            .create_exam_record_impl(req, today())
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_gap_between_scales_leaves_grade_empty() {
        let f = fixture().await;

        let view = f
            .storage
            .create_exam_record_impl(f.record(89.995), today())
            .await
            .unwrap();
        assert!(view.record.grade_id.is_none());
        assert!(view.grade_name.is_none());
    }
}
