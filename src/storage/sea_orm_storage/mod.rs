//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod academic;
mod announcements;
mod attendance;
mod files;
mod grading;
mod library;
mod profiles;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按配置连接数据库并执行迁移
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::with_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 在已有连接上执行迁移
    pub async fn with_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// 单连接的内存数据库，测试用
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| SchoolError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| SchoolError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Self::with_connection(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool)).await
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SchoolError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}


// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn list_users_by_role(&self, role: UserRole) -> Result<Vec<User>> {
        self.list_users_by_role_impl(role).await
    }

    async fn count_users_by_role(&self) -> Result<Vec<RoleCount>> {
        self.count_users_by_role_impl().await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn register_student(
        &self,
        user: CreateUserRequest,
        profile: ProfileChanges,
        classroom_id: Option<i64>,
    ) -> Result<(User, ProfileRecord, i64)> {
        self.register_student_impl(user, profile, classroom_id)
            .await
    }

    // 资料模块
    async fn get_profile(&self, user_id: i64) -> Result<Option<ProfileRecord>> {
        self.get_profile_impl(user_id).await
    }

    async fn upsert_profile(&self, user_id: i64, changes: ProfileChanges) -> Result<ProfileRecord> {
        self.upsert_profile_impl(user_id, changes).await
    }

    // 班级与科目
    async fn create_classroom(&self, req: CreateClassroomRequest) -> Result<Classroom> {
        self.create_classroom_impl(req).await
    }

    async fn get_classroom_by_id(&self, id: i64) -> Result<Option<Classroom>> {
        self.get_classroom_by_id_impl(id).await
    }

    async fn list_classrooms_with_pagination(
        &self,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse> {
        self.list_classrooms_with_pagination_impl(query).await
    }

    async fn update_classroom(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
    ) -> Result<Option<Classroom>> {
        self.update_classroom_impl(id, update).await
    }

    async fn delete_classroom(&self, id: i64) -> Result<bool> {
        self.delete_classroom_impl(id).await
    }

    async fn list_classroom_students(&self, classroom_id: i64) -> Result<Vec<User>> {
        self.list_classroom_students_impl(classroom_id).await
    }

    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(req).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.list_subjects_impl().await
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    async fn assign_classroom_subject(
        &self,
        classroom_id: i64,
        subject_id: i64,
        teacher_id: Option<i64>,
    ) -> Result<(ClassroomSubject, bool)> {
        self.assign_classroom_subject_impl(classroom_id, subject_id, teacher_id)
            .await
    }

    async fn list_classroom_subjects(&self, classroom_id: i64) -> Result<Vec<ClassroomSubject>> {
        self.list_classroom_subjects_impl(classroom_id).await
    }

    async fn enroll_student(
        &self,
        student_id: i64,
        classroom_id: i64,
    ) -> Result<(Enrollment, i64)> {
        self.enroll_student_impl(student_id, classroom_id).await
    }

    async fn list_enrollments(&self, filter: EnrollmentListParams) -> Result<Vec<Enrollment>> {
        self.list_enrollments_impl(filter).await
    }

    async fn list_student_subjects(&self, student_id: i64) -> Result<StudentSubjectsResponse> {
        self.list_student_subjects_impl(student_id).await
    }

    // 成绩模块
    async fn list_exam_types(&self) -> Result<Vec<ExamType>> {
        self.list_exam_types_impl().await
    }

    async fn create_exam_type(&self, name: &str) -> Result<ExamType> {
        self.create_exam_type_impl(name).await
    }

    async fn delete_exam_type(&self, id: i64) -> Result<bool> {
        self.delete_exam_type_impl(id).await
    }

    async fn list_grade_scales(&self) -> Result<Vec<GradeScale>> {
        self.list_grade_scales_impl().await
    }

    async fn create_grade_scale(&self, req: GradeScaleRequest) -> Result<GradeScale> {
        self.create_grade_scale_impl(req).await
    }

    async fn get_grade_scale_by_id(&self, id: i64) -> Result<Option<GradeScale>> {
        self.get_grade_scale_by_id_impl(id).await
    }

    async fn update_grade_scale(
        &self,
        id: i64,
        req: GradeScaleRequest,
    ) -> Result<Option<GradeScale>> {
        self.update_grade_scale_impl(id, req).await
    }

    async fn delete_grade_scale(&self, id: i64) -> Result<bool> {
        self.delete_grade_scale_impl(id).await
    }

    async fn resolve_grade(&self, score: f64) -> Result<Option<GradeScale>> {
        self.resolve_grade_impl(score).await
    }

    async fn create_exam_record(
        &self,
        req: ExamRecordRequest,
        today: NaiveDate,
    ) -> Result<ExamRecordView> {
        self.create_exam_record_impl(req, today).await
    }

    async fn get_exam_record(&self, id: i64) -> Result<Option<ExamRecordView>> {
        self.get_exam_record_impl(id).await
    }

    async fn list_exam_records_with_pagination(
        &self,
        query: ExamRecordListQuery,
    ) -> Result<ExamRecordListResponse> {
        self.list_exam_records_with_pagination_impl(query).await
    }

    async fn update_exam_record(
        &self,
        id: i64,
        req: ExamRecordRequest,
    ) -> Result<Option<ExamRecordView>> {
        self.update_exam_record_impl(id, req).await
    }

    async fn delete_exam_record(&self, id: i64) -> Result<bool> {
        self.delete_exam_record_impl(id).await
    }

    // 考勤模块
    async fn create_attendance(
        &self,
        req: CreateAttendanceRequest,
        recorded_by: i64,
        today: NaiveDate,
    ) -> Result<AttendanceView> {
        self.create_attendance_impl(req, recorded_by, today).await
    }

    async fn get_attendance(&self, id: i64) -> Result<Option<AttendanceView>> {
        self.get_attendance_impl(id).await
    }

    async fn list_attendance_with_pagination(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse> {
        self.list_attendance_with_pagination_impl(query).await
    }

    async fn update_attendance(
        &self,
        id: i64,
        update: UpdateAttendanceRequest,
    ) -> Result<Option<AttendanceView>> {
        self.update_attendance_impl(id, update).await
    }

    async fn delete_attendance(&self, id: i64) -> Result<bool> {
        self.delete_attendance_impl(id).await
    }

    // 图书馆模块
    async fn list_book_categories(&self) -> Result<Vec<BookCategory>> {
        self.list_book_categories_impl().await
    }

    async fn create_book_category(&self, req: CreateBookCategoryRequest) -> Result<BookCategory> {
        self.create_book_category_impl(req).await
    }

    async fn create_book(&self, req: CreateBookRequest) -> Result<Book> {
        self.create_book_impl(req).await
    }

    async fn get_book_by_id(&self, id: i64) -> Result<Option<Book>> {
        self.get_book_by_id_impl(id).await
    }

    async fn list_books_with_pagination(&self, query: BookListQuery) -> Result<BookListResponse> {
        self.list_books_with_pagination_impl(query).await
    }

    async fn update_book(&self, id: i64, update: UpdateBookRequest) -> Result<Option<Book>> {
        self.update_book_impl(id, update).await
    }

    async fn delete_book(&self, id: i64) -> Result<bool> {
        self.delete_book_impl(id).await
    }

    async fn borrow_book(&self, loan: NewLoan) -> Result<LoanDetails> {
        self.borrow_book_impl(loan).await
    }

    async fn return_book(&self, borrow_id: i64, today: NaiveDate) -> Result<LoanDetails> {
        self.return_book_impl(borrow_id, today).await
    }

    async fn get_loan(&self, borrow_id: i64) -> Result<Option<LoanDetails>> {
        self.get_loan_impl(borrow_id).await
    }

    async fn list_loans_by_student(&self, student_id: i64) -> Result<Vec<LoanDetails>> {
        self.list_loans_by_student_impl(student_id).await
    }

    async fn list_outstanding_loans(&self) -> Result<Vec<LoanDetails>> {
        self.list_outstanding_loans_impl().await
    }

    async fn list_overdue_loans(&self, today: NaiveDate) -> Result<Vec<LoanDetails>> {
        self.list_overdue_loans_impl(today).await
    }

    async fn create_library_resource(
        &self,
        req: CreateLibraryResourceRequest,
        uploaded_by: i64,
    ) -> Result<LibraryResource> {
        self.create_library_resource_impl(req, uploaded_by).await
    }

    async fn get_library_resource(&self, id: i64) -> Result<Option<LibraryResource>> {
        self.get_library_resource_impl(id).await
    }

    async fn list_library_resources(
        &self,
        filter: LibraryResourceListParams,
    ) -> Result<Vec<LibraryResource>> {
        self.list_library_resources_impl(filter).await
    }

    async fn delete_library_resource(&self, id: i64) -> Result<bool> {
        self.delete_library_resource_impl(id).await
    }

    // 公告模块
    async fn create_announcement(
        &self,
        req: CreateAnnouncementRequest,
        posted_by: i64,
    ) -> Result<AnnouncementView> {
        self.create_announcement_impl(req, posted_by).await
    }

    async fn get_announcement(&self, id: i64) -> Result<Option<AnnouncementView>> {
        self.get_announcement_impl(id).await
    }

    async fn list_announcements_with_pagination(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<AnnouncementListResponse> {
        self.list_announcements_with_pagination_impl(query).await
    }

    async fn update_announcement(
        &self,
        id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<AnnouncementView>> {
        self.update_announcement_impl(id, update).await
    }

    async fn delete_announcement(&self, id: i64) -> Result<bool> {
        self.delete_announcement_impl(id).await
    }

    // 文件模块
    async fn upload_file(
        &self,
        download_token: &str,
        original_name: &str,
        stored_name: &str,
        file_size: i64,
        file_type: &str,
        user_id: i64,
    ) -> Result<File> {
        self.upload_file_impl(
            download_token,
            original_name,
            stored_name,
            file_size,
            file_type,
            user_id,
        )
        .await
    }

    async fn get_file_by_token(&self, token: &str) -> Result<Option<File>> {
        self.get_file_by_token_impl(token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_inference() {
        assert_eq!(
            SeaOrmStorage::build_database_url("school.db").unwrap(),
            "sqlite://school.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/school").unwrap(),
            "postgres://u:p@localhost/school"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nowhere").is_err());
    }
}
