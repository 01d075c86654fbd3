//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod announcements;
pub mod attendances;
pub mod book_categories;
pub mod books;
pub mod borrowed_books;
pub mod classroom_subjects;
pub mod classrooms;
pub mod enrollments;
pub mod exam_records;
pub mod exam_types;
pub mod files;
pub mod grade_scales;
pub mod library_resources;
pub mod profiles;
pub mod student_subjects;
pub mod subjects;
pub mod users;
