use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{
    classroom_subjects, classrooms, enrollments, profiles, student_subjects, subjects, users,
};
use crate::errors::{Result, SchoolError};
use crate::models::{
    PaginationInfo,
    academic::{
        entities::{Classroom, ClassroomSubject, Enrollment, EnrollmentStatus, Subject},
        requests::{
            ClassroomListQuery, CreateClassroomRequest, CreateSubjectRequest,
            EnrollmentListParams, UpdateClassroomRequest, UpdateSubjectRequest,
        },
        responses::{ClassroomListResponse, StudentSubjectsResponse},
    },
    common::normalize_page,
    users::entities::{User, UserRole},
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 入班：校验、写入入班记录、更新资料中的班级并同步科目
pub(super) async fn enroll_student_in(
    txn: &DatabaseTransaction,
    student_id: i64,
    classroom_id: i64,
) -> Result<(Enrollment, i64)> {
    let classroom = Classrooms::find_by_id(classroom_id)
        .one(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("查询班级失败: {e}")))?;
    if classroom.is_none() {
        return Err(SchoolError::not_found("Classroom not found"));
    }

    let student = Users::find_by_id(student_id)
        .one(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("查询学生失败: {e}")))?;
    match student {
        Some(user) if user.role == UserRole::STUDENT => {}
        _ => return Err(SchoolError::not_found("Student not found")),
    }

    let profile = Profiles::find()
        .filter(profiles::Column::UserId.eq(student_id))
        .one(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("查询学生资料失败: {e}")))?;
    if profile.and_then(|p| p.classroom_id).is_some() {
        return Err(SchoolError::validation(
            "Student is already assigned to a classroom",
        ));
    }

    let existing = Enrollments::find()
        .filter(enrollments::Column::StudentId.eq(student_id))
        .filter(enrollments::Column::ClassroomId.eq(classroom_id))
        .one(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("查询入班记录失败: {e}")))?;
    if existing.is_some() {
        return Err(SchoolError::validation(
            "Student is already enrolled in this classroom",
        ));
    }

    let now = chrono::Utc::now().timestamp();
    let enrollment = EnrollmentActiveModel {
        student_id: Set(student_id),
        classroom_id: Set(classroom_id),
        status: Set(EnrollmentStatus::Active.to_string()),
        enrolled_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await
    .map_err(|e| SchoolError::database_operation(format!("创建入班记录失败: {e}")))?;

    super::profiles::set_profile_classroom_in(txn, student_id, classroom_id).await?;

    // 班级已开设的科目逐个 get-or-create
    let assigned = ClassroomSubjects::find()
        .filter(classroom_subjects::Column::ClassroomId.eq(classroom_id))
        .all(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("查询班级科目失败: {e}")))?;

    let mut synced = 0;
    for assignment in assigned {
        let found = StudentSubjects::find()
            .filter(student_subjects::Column::StudentId.eq(student_id))
            .filter(student_subjects::Column::SubjectId.eq(assignment.subject_id))
            .one(txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询学生科目失败: {e}")))?;

        if found.is_none() {
            StudentSubjectActiveModel {
                student_id: Set(student_id),
                subject_id: Set(assignment.subject_id),
                classroom_id: Set(Some(classroom_id)),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("创建学生科目失败: {e}")))?;
        }
        synced += 1;
    }

    Ok((enrollment.into_enrollment(), synced))
}

impl SeaOrmStorage {
    /// 批量查询用户姓名
    pub(super) async fn load_user_names(&self, ids: Vec<i64>) -> Result<HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = Users::find()
            .filter(users::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(users.into_iter().map(|u| (u.id, u.full_name())).collect())
    }

    // 班级

    pub async fn create_classroom_impl(&self, req: CreateClassroomRequest) -> Result<Classroom> {
        let now = chrono::Utc::now().timestamp();

        let model = ClassroomActiveModel {
            name: Set(req.name.trim().to_string()),
            section: Set(req.section),
            academic_year: Set(req.academic_year.trim().to_string()),
            class_teacher_id: Set(req.class_teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_classroom())
    }

    pub async fn get_classroom_by_id_impl(&self, id: i64) -> Result<Option<Classroom>> {
        let result = Classrooms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_classroom()))
    }

    pub async fn list_classrooms_with_pagination_impl(
        &self,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Classrooms::find();

        if let Some(ref year) = query.academic_year {
            select = select.filter(classrooms::Column::AcademicYear.eq(year.trim()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = like_contains(search.trim());
            select = select.filter(
                Condition::any()
                    .add(classrooms::Column::Name.like(pattern.clone()))
                    .add(classrooms::Column::Section.like(pattern.clone())),
            );
        }

        let paginator = select
            .order_by_desc(classrooms::Column::AcademicYear)
            .order_by_asc(classrooms::Column::Name)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(ClassroomListResponse {
            items: items.into_iter().map(|m| m.into_classroom()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_classroom_impl(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
    ) -> Result<Option<Classroom>> {
        let Some(current) = Classrooms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ClassroomActiveModel = current.into();
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(section) = update.section {
            model.section = Set(Some(section));
        }
        if let Some(year) = update.academic_year {
            model.academic_year = Set(year.trim().to_string());
        }
        if let Some(teacher_id) = update.class_teacher_id {
            model.class_teacher_id = Set(Some(teacher_id));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新班级失败: {e}")))?;

        Ok(Some(updated.into_classroom()))
    }

    pub async fn delete_classroom_impl(&self, id: i64) -> Result<bool> {
        let result = Classrooms::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_classroom_students_impl(&self, classroom_id: i64) -> Result<Vec<User>> {
        let student_ids: Vec<i64> = Profiles::find()
            .filter(profiles::Column::ClassroomId.eq(classroom_id))
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级学生失败: {e}")))?
            .into_iter()
            .map(|p| p.user_id)
            .collect();

        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let students = Users::find()
            .filter(users::Column::Id.is_in(student_ids))
            .filter(users::Column::Role.eq(UserRole::STUDENT))
            .order_by_asc(users::Column::FirstName)
            .order_by_asc(users::Column::LastName)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_user()).collect())
    }

    // 科目

    /// 科目代码唯一，exclude_id 用于更新时排除自身
    async fn ensure_subject_code_free(&self, code: &str, exclude_id: Option<i64>) -> Result<()> {
        let mut select = Subjects::find().filter(subjects::Column::Code.eq(code));
        if let Some(id) = exclude_id {
            select = select.filter(subjects::Column::Id.ne(id));
        }

        let taken = select
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询科目失败: {e}")))?;

        if taken.is_some() {
            return Err(SchoolError::conflict(format!(
                "Subject code '{code}' already exists"
            )));
        }
        Ok(())
    }

    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        if let Some(ref code) = req.code {
            self.ensure_subject_code_free(code, None).await?;
        }

        let model = SubjectActiveModel {
            name: Set(req.name.trim().to_string()),
            code: Set(req.code),
            description: Set(req.description),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("创建科目失败: {e}")))?;

        Ok(result.into_subject())
    }

    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn list_subjects_impl(&self) -> Result<Vec<Subject>> {
        let items = Subjects::find()
            .order_by_asc(subjects::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询科目列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_subject()).collect())
    }

    pub async fn update_subject_impl(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        let Some(current) = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询科目失败: {e}")))?
        else {
            return Ok(None);
        };

        if let Some(ref code) = update.code {
            self.ensure_subject_code_free(code, Some(id)).await?;
        }

        let mut model: SubjectActiveModel = current.into();
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(code) = update.code {
            model.code = Set(Some(code));
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新科目失败: {e}")))?;

        Ok(Some(updated.into_subject()))
    }

    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除科目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    // 班级科目分配

    pub async fn assign_classroom_subject_impl(
        &self,
        classroom_id: i64,
        subject_id: i64,
        teacher_id: Option<i64>,
    ) -> Result<(ClassroomSubject, bool)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        let classroom = Classrooms::find_by_id(classroom_id)
            .one(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级失败: {e}")))?;
        if classroom.is_none() {
            return Err(SchoolError::not_found("Classroom not found"));
        }

        let subject = Subjects::find_by_id(subject_id)
            .one(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询科目失败: {e}")))?;
        if subject.is_none() {
            return Err(SchoolError::not_found("Subject not found"));
        }

        if let Some(teacher_id) = teacher_id {
            let teacher = Users::find_by_id(teacher_id)
                .one(&txn)
                .await
                .map_err(|e| SchoolError::database_operation(format!("查询教师失败: {e}")))?;
            let is_teaching = teacher
                .and_then(|t| t.role.parse::<UserRole>().ok())
                .is_some_and(|role| role.is_teaching());
            if !is_teaching {
                return Err(SchoolError::not_found("Teacher not found"));
            }
        }

        let existing = ClassroomSubjects::find()
            .filter(classroom_subjects::Column::ClassroomId.eq(classroom_id))
            .filter(classroom_subjects::Column::SubjectId.eq(subject_id))
            .one(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级科目失败: {e}")))?;

        let (saved, created) = match existing {
            Some(current) => {
                let mut model: ClassroomSubjectActiveModel = current.into();
                model.teacher_id = Set(teacher_id);
                let updated = model.update(&txn).await.map_err(|e| {
                    SchoolError::database_operation(format!("更新班级科目失败: {e}"))
                })?;
                (updated, false)
            }
            None => {
                let inserted = ClassroomSubjectActiveModel {
                    classroom_id: Set(classroom_id),
                    subject_id: Set(subject_id),
                    teacher_id: Set(teacher_id),
                    created_at: Set(chrono::Utc::now().timestamp()),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| SchoolError::database_operation(format!("分配科目失败: {e}")))?;
                (inserted, true)
            }
        };

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        let details = self.list_classroom_subjects_impl(classroom_id).await?;
        let assignment = details
            .into_iter()
            .find(|d| d.id == saved.id)
            .ok_or_else(|| SchoolError::not_found("Classroom subject not found"))?;

        Ok((assignment, created))
    }

    pub async fn list_classroom_subjects_impl(
        &self,
        classroom_id: i64,
    ) -> Result<Vec<ClassroomSubject>> {
        let rows = ClassroomSubjects::find()
            .filter(classroom_subjects::Column::ClassroomId.eq(classroom_id))
            .order_by_asc(classroom_subjects::Column::Id)
            .find_also_related(Subjects)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级科目失败: {e}")))?;

        let teacher_ids = rows.iter().filter_map(|(cs, _)| cs.teacher_id).collect();
        let names = self.load_user_names(teacher_ids).await?;

        Ok(rows
            .into_iter()
            .filter_map(|(cs, subject)| {
                subject.map(|subject| ClassroomSubject {
                    id: cs.id,
                    classroom_id: cs.classroom_id,
                    subject: subject.into_subject(),
                    teacher_id: cs.teacher_id,
                    teacher_name: cs.teacher_id.and_then(|id| names.get(&id).cloned()),
                })
            })
            .collect())
    }

    // 入班

    pub async fn enroll_student_impl(
        &self,
        student_id: i64,
        classroom_id: i64,
    ) -> Result<(Enrollment, i64)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        let outcome = enroll_student_in(&txn, student_id, classroom_id).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(outcome)
    }

    pub async fn list_enrollments_impl(
        &self,
        filter: EnrollmentListParams,
    ) -> Result<Vec<Enrollment>> {
        let mut select = Enrollments::find();
        if let Some(student_id) = filter.student_id {
            select = select.filter(enrollments::Column::StudentId.eq(student_id));
        }
        if let Some(classroom_id) = filter.classroom_id {
            select = select.filter(enrollments::Column::ClassroomId.eq(classroom_id));
        }

        let items = select
            .order_by_desc(enrollments::Column::EnrolledAt)
            .order_by_desc(enrollments::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询入班记录失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_enrollment()).collect())
    }

    /// 学生的科目；没有单独记录时退回到所在班级的科目
    pub async fn list_student_subjects_impl(
        &self,
        student_id: i64,
    ) -> Result<StudentSubjectsResponse> {
        let classroom_id = self
            .get_profile_impl(student_id)
            .await?
            .and_then(|p| p.classroom_id);

        let own: Vec<Subject> = StudentSubjects::find()
            .filter(student_subjects::Column::StudentId.eq(student_id))
            .find_also_related(Subjects)
            .order_by_asc(subjects::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询学生科目失败: {e}")))?
            .into_iter()
            .filter_map(|(_, subject)| subject.map(|s| s.into_subject()))
            .collect();

        if !own.is_empty() {
            return Ok(StudentSubjectsResponse {
                student_id,
                classroom_id,
                from_classroom: false,
                subjects: own,
            });
        }

        let subjects = match classroom_id {
            Some(classroom_id) => self
                .list_classroom_subjects_impl(classroom_id)
                .await?
                .into_iter()
                .map(|cs| cs.subject)
                .collect(),
            None => Vec::new(),
        };

        Ok(StudentSubjectsResponse {
            student_id,
            classroom_id,
            from_classroom: classroom_id.is_some(),
            subjects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::requests::ProfileChanges;
    use crate::models::users::requests::CreateUserRequest;

    fn new_user(email: &str, role: UserRole) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password: "hash".to_string(),
            role,
        }
    }

    async fn classroom_with_subjects(storage: &SeaOrmStorage, names: &[&str]) -> i64 {
        let classroom = storage
            .create_classroom_impl(CreateClassroomRequest {
                name: "Form 2".to_string(),
                section: Some("East".to_string()),
                academic_year: "2024".to_string(),
                class_teacher_id: None,
            })
            .await
            .unwrap();

        for name in names {
            let subject = storage
                .create_subject_impl(CreateSubjectRequest {
                    name: name.to_string(),
                    code: None,
                    description: None,
                })
                .await
                .unwrap();
            storage
                .assign_classroom_subject_impl(classroom.id, subject.id, None)
                .await
                .unwrap();
        }

        classroom.id
    }

    #[tokio::test]
    async fn test_enroll_syncs_classroom_subjects() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let classroom_id = classroom_with_subjects(&storage, &["Maths", "Physics", "Biology"]).await;
        let student = storage
            .create_user_impl(new_user("kofi@school.test", UserRole::Student))
            .await
            .unwrap();

        let (enrollment, synced) = storage
            .enroll_student_impl(student.id, classroom_id)
            .await
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::Active);
        assert_eq!(synced, 3);

        let subjects = storage.list_student_subjects_impl(student.id).await.unwrap();
        assert!(!subjects.from_classroom);
        assert_eq!(subjects.subjects.len(), 3);
        assert_eq!(subjects.classroom_id, Some(classroom_id));

        let students = storage
            .list_classroom_students_impl(classroom_id)
            .await
            .unwrap();
        assert_eq!(students.len(), 1);
    }

    #[tokio::test]
    async fn test_second_enrollment_rejected() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let first = classroom_with_subjects(&storage, &["Maths"]).await;
        let second = classroom_with_subjects(&storage, &["History"]).await;
        let student = storage
            .create_user_impl(new_user("lina@school.test", UserRole::Student))
            .await
            .unwrap();

        storage.enroll_student_impl(student.id, first).await.unwrap();

        let again = storage.enroll_student_impl(student.id, first).await;
        assert!(matches!(again, Err(SchoolError::Validation(_))));
        let elsewhere = storage.enroll_student_impl(student.id, second).await;
        assert!(matches!(elsewhere, Err(SchoolError::Validation(_))));

        let enrollments = storage
            .list_enrollments_impl(EnrollmentListParams {
                student_id: Some(student.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(enrollments.len(), 1);
    }

    #[tokio::test]
    async fn test_only_students_can_enroll() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let classroom_id = classroom_with_subjects(&storage, &[]).await;
        let teacher = storage
            .create_user_impl(new_user("moses@school.test", UserRole::Teacher))
            .await
            .unwrap();

        let result = storage.enroll_student_impl(teacher.id, classroom_id).await;
        assert!(matches!(result, Err(SchoolError::NotFound(_))));
        let missing = storage.enroll_student_impl(teacher.id, 9999).await;
        assert!(matches!(missing, Err(SchoolError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_assignment_overwrites_teacher() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let classroom_id = classroom_with_subjects(&storage, &[]).await;
        let subject = storage
            .create_subject_impl(CreateSubjectRequest {
                name: "Chemistry".to_string(),
                code: Some("CHEM".to_string()),
                description: None,
            })
            .await
            .unwrap();
        let teacher = storage
            .create_user_impl(new_user("nia@school.test", UserRole::Teacher))
            .await
            .unwrap();

        let (first, created) = storage
            .assign_classroom_subject_impl(classroom_id, subject.id, None)
            .await
            .unwrap();
        assert!(created);
        assert!(first.teacher_id.is_none());

        let (second, created) = storage
            .assign_classroom_subject_impl(classroom_id, subject.id, Some(teacher.id))
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.teacher_name.as_deref(), Some("Test User"));

        let student = storage
            .create_user_impl(new_user("omar@school.test", UserRole::Student))
            .await
            .unwrap();
        let not_teacher = storage
            .assign_classroom_subject_impl(classroom_id, subject.id, Some(student.id))
            .await;
        assert!(matches!(not_teacher, Err(SchoolError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_subject_code_conflicts() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let req = CreateSubjectRequest {
            name: "Geography".to_string(),
            code: Some("GEO".to_string()),
            description: None,
        };
        storage.create_subject_impl(req.clone()).await.unwrap();
        let err = storage.create_subject_impl(req).await.unwrap_err();
        assert!(matches!(err, SchoolError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_failed_registration_rolls_back() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();

        let result = storage
            .register_student_impl(
                new_user("pat@school.test", UserRole::Student),
                ProfileChanges::default(),
                Some(4242),
            )
            .await;
        assert!(matches!(result, Err(SchoolError::NotFound(_))));
        assert!(
            storage
                .get_user_by_email_impl("pat@school.test")
                .await
                .unwrap()
                .is_none()
        );

        let classroom_id = classroom_with_subjects(&storage, &["English", "Kiswahili"]).await;
        let (user, profile, synced) = storage
            .register_student_impl(
                new_user("pat@school.test", UserRole::Student),
                ProfileChanges {
                    guardian_phone: Some("0722000000".to_string()),
                    ..Default::default()
                },
                Some(classroom_id),
            )
            .await
            .unwrap();
        assert_eq!(profile.user_id, user.id);
        assert_eq!(profile.classroom_id, Some(classroom_id));
        assert_eq!(synced, 2);
    }
}
