use crate::models::{
    academic::{
        entities::{Classroom, ClassroomSubject, Enrollment, Subject},
        requests::{
            ClassroomListQuery, CreateClassroomRequest, CreateSubjectRequest,
            EnrollmentListParams, UpdateClassroomRequest, UpdateSubjectRequest,
        },
        responses::{ClassroomListResponse, StudentSubjectsResponse},
    },
    announcements::{
        requests::{AnnouncementListQuery, CreateAnnouncementRequest, UpdateAnnouncementRequest},
        responses::{AnnouncementListResponse, AnnouncementView},
    },
    attendance::{
        requests::{AttendanceListQuery, CreateAttendanceRequest, UpdateAttendanceRequest},
        responses::{AttendanceListResponse, AttendanceView},
    },
    files::entities::File,
    grading::{
        entities::{ExamType, GradeScale},
        requests::{ExamRecordListQuery, ExamRecordRequest, GradeScaleRequest},
        responses::{ExamRecordListResponse, ExamRecordView},
    },
    library::{
        entities::{Book, BookCategory, LibraryResource},
        requests::{
            BookListQuery, CreateBookCategoryRequest, CreateBookRequest,
            CreateLibraryResourceRequest, LibraryResourceListParams, NewLoan, UpdateBookRequest,
        },
        responses::{BookListResponse, LoanDetails},
    },
    profiles::{entities::ProfileRecord, requests::ProfileChanges},
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::{RoleCount, UserListResponse},
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 按角色列出全部用户
    async fn list_users_by_role(&self, role: UserRole) -> Result<Vec<User>>;
    // 各角色人数
    async fn count_users_by_role(&self) -> Result<Vec<RoleCount>>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 注册学生：用户、资料以及可选的入班在同一事务中完成
    async fn register_student(
        &self,
        user: CreateUserRequest,
        profile: ProfileChanges,
        classroom_id: Option<i64>,
    ) -> Result<(User, ProfileRecord, i64)>;

    /// 用户资料
    async fn get_profile(&self, user_id: i64) -> Result<Option<ProfileRecord>>;
    // 不存在则创建
    async fn upsert_profile(&self, user_id: i64, changes: ProfileChanges) -> Result<ProfileRecord>;

    /// 班级与科目
    async fn create_classroom(&self, req: CreateClassroomRequest) -> Result<Classroom>;
    async fn get_classroom_by_id(&self, id: i64) -> Result<Option<Classroom>>;
    async fn list_classrooms_with_pagination(
        &self,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse>;
    async fn update_classroom(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
    ) -> Result<Option<Classroom>>;
    async fn delete_classroom(&self, id: i64) -> Result<bool>;
    // 班级内的学生（按资料中的 classroom_id）
    async fn list_classroom_students(&self, classroom_id: i64) -> Result<Vec<User>>;

    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn list_subjects(&self) -> Result<Vec<Subject>>;
    async fn update_subject(&self, id: i64, update: UpdateSubjectRequest)
    -> Result<Option<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;

    // 按 (classroom, subject) 覆盖写入，返回值中的 bool 表示是否新建
    async fn assign_classroom_subject(
        &self,
        classroom_id: i64,
        subject_id: i64,
        teacher_id: Option<i64>,
    ) -> Result<(ClassroomSubject, bool)>;
    async fn list_classroom_subjects(&self, classroom_id: i64) -> Result<Vec<ClassroomSubject>>;

    // 入班并同步科目，返回同步的科目数
    async fn enroll_student(&self, student_id: i64, classroom_id: i64)
    -> Result<(Enrollment, i64)>;
    async fn list_enrollments(&self, filter: EnrollmentListParams) -> Result<Vec<Enrollment>>;
    async fn list_student_subjects(&self, student_id: i64) -> Result<StudentSubjectsResponse>;

    /// 成绩
    async fn list_exam_types(&self) -> Result<Vec<ExamType>>;
    async fn create_exam_type(&self, name: &str) -> Result<ExamType>;
    async fn delete_exam_type(&self, id: i64) -> Result<bool>;

    async fn list_grade_scales(&self) -> Result<Vec<GradeScale>>;
    async fn create_grade_scale(&self, req: GradeScaleRequest) -> Result<GradeScale>;
    async fn get_grade_scale_by_id(&self, id: i64) -> Result<Option<GradeScale>>;
    async fn update_grade_scale(
        &self,
        id: i64,
        req: GradeScaleRequest,
    ) -> Result<Option<GradeScale>>;
    async fn delete_grade_scale(&self, id: i64) -> Result<bool>;
    async fn resolve_grade(&self, score: f64) -> Result<Option<GradeScale>>;

    async fn create_exam_record(
        &self,
        req: ExamRecordRequest,
        today: chrono::NaiveDate,
    ) -> Result<ExamRecordView>;
    async fn get_exam_record(&self, id: i64) -> Result<Option<ExamRecordView>>;
    async fn list_exam_records_with_pagination(
        &self,
        query: ExamRecordListQuery,
    ) -> Result<ExamRecordListResponse>;
    async fn update_exam_record(
        &self,
        id: i64,
        req: ExamRecordRequest,
    ) -> Result<Option<ExamRecordView>>;
    async fn delete_exam_record(&self, id: i64) -> Result<bool>;

    /// 考勤
    async fn create_attendance(
        &self,
        req: CreateAttendanceRequest,
        recorded_by: i64,
        today: chrono::NaiveDate,
    ) -> Result<AttendanceView>;
    async fn get_attendance(&self, id: i64) -> Result<Option<AttendanceView>>;
    async fn list_attendance_with_pagination(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse>;
    async fn update_attendance(
        &self,
        id: i64,
        update: UpdateAttendanceRequest,
    ) -> Result<Option<AttendanceView>>;
    async fn delete_attendance(&self, id: i64) -> Result<bool>;

    /// 图书馆
    async fn list_book_categories(&self) -> Result<Vec<BookCategory>>;
    async fn create_book_category(&self, req: CreateBookCategoryRequest) -> Result<BookCategory>;

    async fn create_book(&self, req: CreateBookRequest) -> Result<Book>;
    async fn get_book_by_id(&self, id: i64) -> Result<Option<Book>>;
    async fn list_books_with_pagination(&self, query: BookListQuery) -> Result<BookListResponse>;
    async fn update_book(&self, id: i64, update: UpdateBookRequest) -> Result<Option<Book>>;
    async fn delete_book(&self, id: i64) -> Result<bool>;

    // 借书：库存用比较交换扣减
    async fn borrow_book(&self, loan: NewLoan) -> Result<LoanDetails>;
    // 还书：记录实际归还日并归还库存
    async fn return_book(&self, borrow_id: i64, today: chrono::NaiveDate) -> Result<LoanDetails>;
    async fn get_loan(&self, borrow_id: i64) -> Result<Option<LoanDetails>>;
    async fn list_loans_by_student(&self, student_id: i64) -> Result<Vec<LoanDetails>>;
    async fn list_outstanding_loans(&self) -> Result<Vec<LoanDetails>>;
    async fn list_overdue_loans(&self, today: chrono::NaiveDate) -> Result<Vec<LoanDetails>>;

    async fn create_library_resource(
        &self,
        req: CreateLibraryResourceRequest,
        uploaded_by: i64,
    ) -> Result<LibraryResource>;
    async fn get_library_resource(&self, id: i64) -> Result<Option<LibraryResource>>;
    async fn list_library_resources(
        &self,
        filter: LibraryResourceListParams,
    ) -> Result<Vec<LibraryResource>>;
    async fn delete_library_resource(&self, id: i64) -> Result<bool>;

    /// 公告
    async fn create_announcement(
        &self,
        req: CreateAnnouncementRequest,
        posted_by: i64,
    ) -> Result<AnnouncementView>;
    async fn get_announcement(&self, id: i64) -> Result<Option<AnnouncementView>>;
    async fn list_announcements_with_pagination(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<AnnouncementListResponse>;
    async fn update_announcement(
        &self,
        id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<AnnouncementView>>;
    async fn delete_announcement(&self, id: i64) -> Result<bool>;

    /// 文件管理方法
    // 登记上传的文件
    async fn upload_file(
        &self,
        download_token: &str,
        original_name: &str,
        stored_name: &str,
        file_size: i64,
        file_type: &str,
        user_id: i64,
    ) -> Result<File>;
    // 通过唯一 token 获取文件信息
    async fn get_file_by_token(&self, token: &str) -> Result<Option<File>>;
}

/// 按配置创建存储后端并执行迁移
pub async fn create_storage() -> Result<std::sync::Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(std::sync::Arc::new(storage))
}
