//! 预导入模块，方便使用

pub use super::announcements::{
    ActiveModel as AnnouncementActiveModel, Entity as Announcements, Model as AnnouncementModel,
};
pub use super::attendances::{
    ActiveModel as AttendanceActiveModel, Entity as Attendances, Model as AttendanceModel,
};
pub use super::book_categories::{
    ActiveModel as BookCategoryActiveModel, Entity as BookCategories, Model as BookCategoryModel,
};
pub use super::books::{ActiveModel as BookActiveModel, Entity as Books, Model as BookModel};
pub use super::borrowed_books::{
    ActiveModel as BorrowedBookActiveModel, Entity as BorrowedBooks, Model as BorrowedBookModel,
};
pub use super::classroom_subjects::{
    ActiveModel as ClassroomSubjectActiveModel, Entity as ClassroomSubjects,
    Model as ClassroomSubjectModel,
};
pub use super::classrooms::{
    ActiveModel as ClassroomActiveModel, Entity as Classrooms, Model as ClassroomModel,
};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::exam_records::{
    ActiveModel as ExamRecordActiveModel, Entity as ExamRecords, Model as ExamRecordModel,
};
pub use super::exam_types::{
    ActiveModel as ExamTypeActiveModel, Entity as ExamTypes, Model as ExamTypeModel,
};
pub use super::files::{ActiveModel as FileActiveModel, Entity as Files, Model as FileModel};
pub use super::grade_scales::{
    ActiveModel as GradeScaleActiveModel, Entity as GradeScales, Model as GradeScaleModel,
};
pub use super::library_resources::{
    ActiveModel as LibraryResourceActiveModel, Entity as LibraryResources,
    Model as LibraryResourceModel,
};
pub use super::profiles::{
    ActiveModel as ProfileActiveModel, Entity as Profiles, Model as ProfileModel,
};
pub use super::student_subjects::{
    ActiveModel as StudentSubjectActiveModel, Entity as StudentSubjects,
    Model as StudentSubjectModel,
};
pub use super::subjects::{ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
