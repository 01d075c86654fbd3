/// 业务错误码
///
/// 0 表示成功；1xxx 通用错误；之后每个业务域占一个千位段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    RateLimitExceeded = 1029,

    // 认证
    AuthFailed = 1100,
    RegisterFailed = 1101,
    AccountBlocked = 1102,
    EmailAlreadyExists = 1103,

    // 用户 / 资料
    UserNotFound = 2000,
    UserCreationFailed = 2001,
    UserUpdateFailed = 2002,
    UserDeleteFailed = 2003,
    CanNotDeleteCurrentUser = 2004,
    InvalidRole = 2005,
    RoleNotAssigned = 2006,
    ProfileUpdateFailed = 2008,
    StudentNotFound = 2009,

    // 文件
    FileNotFound = 3000,
    FileUploadFailed = 3001,
    FileTypeNotAllowed = 3002,
    FileSizeExceeded = 3003,
    MultifileUploadNotAllowed = 3004,

    // 教务
    ClassroomNotFound = 4000,
    SubjectNotFound = 4001,
    TeacherNotFound = 4002,
    AlreadyEnrolled = 4003,
    EnrollmentFailed = 4004,
    SubjectCodeExists = 4005,

    // 成绩
    ExamTypeNotFound = 5000,
    ExamTypeExists = 5001,
    GradeScaleNotFound = 5002,
    ExamRecordNotFound = 5003,
    ExamRecordDuplicate = 5004,

    // 考勤
    AttendanceNotFound = 6000,
    AttendanceDuplicate = 6001,

    // 图书馆
    BookNotFound = 7000,
    BookUnavailable = 7001,
    BookAlreadyBorrowed = 7002,
    BookAlreadyReturned = 7003,
    BorrowRecordNotFound = 7004,
    BookCategoryExists = 7005,
    LibraryResourceNotFound = 7006,
    StockConflict = 7007,

    // 公告
    AnnouncementNotFound = 8000,
    AnnouncementHasNoFile = 8001,
}
