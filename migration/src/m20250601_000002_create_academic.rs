use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 班级表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Classrooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classrooms::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Classrooms::Name).string().not_null())
                    .col(ColumnDef::new(Classrooms::Section).string().null())
                    .col(ColumnDef::new(Classrooms::AcademicYear).string().not_null())
                    .col(ColumnDef::new(Classrooms::ClassTeacherId).big_integer().null())
                    .col(ColumnDef::new(Classrooms::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Classrooms::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classrooms::Table, Classrooms::ClassTeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 科目表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Code).string().null().unique_key())
                    .col(ColumnDef::new(Subjects::Description).text().null())
                    .col(ColumnDef::new(Subjects::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // ==================== 用户资料表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Profiles::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Profiles::Address).text().null())
                    .col(ColumnDef::new(Profiles::PhoneNumber).string().null())
                    .col(ColumnDef::new(Profiles::Gender).string().null())
                    .col(ColumnDef::new(Profiles::Department).string().null())
                    .col(ColumnDef::new(Profiles::Position).string().null())
                    .col(ColumnDef::new(Profiles::RelationToStudent).string().null())
                    .col(ColumnDef::new(Profiles::GuardianPhone).string().null())
                    .col(ColumnDef::new(Profiles::ClassroomId).big_integer().null())
                    .col(ColumnDef::new(Profiles::AvatarToken).string().null())
                    .col(ColumnDef::new(Profiles::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Profiles::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Profiles::Table, Profiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Profiles::Table, Profiles::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 班级科目表 ====================
        manager
            .create_table(
                Table::create()
                    .table(ClassroomSubjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassroomSubjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClassroomSubjects::ClassroomId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassroomSubjects::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassroomSubjects::TeacherId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClassroomSubjects::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassroomSubjects::Table, ClassroomSubjects::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassroomSubjects::Table, ClassroomSubjects::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassroomSubjects::Table, ClassroomSubjects::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 入班记录表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::StudentId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Enrollments::ClassroomId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Enrollments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Enrollments::EnrolledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 学生科目表 ====================
        manager
            .create_table(
                Table::create()
                    .table(StudentSubjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentSubjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentSubjects::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentSubjects::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentSubjects::ClassroomId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(StudentSubjects::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentSubjects::Table, StudentSubjects::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentSubjects::Table, StudentSubjects::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentSubjects::Table, StudentSubjects::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 考试类型表 ====================
        manager
            .create_table(
                Table::create()
                    .table(ExamTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExamTypes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExamTypes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 等级区间表 ====================
        manager
            .create_table(
                Table::create()
                    .table(GradeScales::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradeScales::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GradeScales::Name).string().not_null())
                    .col(ColumnDef::new(GradeScales::ScoreFrom).double().not_null())
                    .col(ColumnDef::new(GradeScales::ScoreTo).double().not_null())
                    .col(
                        ColumnDef::new(GradeScales::Comment)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 成绩记录表 ====================
        manager
            .create_table(
                Table::create()
                    .table(ExamRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExamRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExamRecords::ClassroomId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamRecords::Section).string().null())
                    .col(ColumnDef::new(ExamRecords::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(ExamRecords::StudentId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ExamRecords::ExamTypeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamRecords::Score).double().not_null())
                    .col(ColumnDef::new(ExamRecords::Comment).text().null())
                    .col(ColumnDef::new(ExamRecords::DateRecorded).date().not_null())
                    .col(ColumnDef::new(ExamRecords::GradeId).big_integer().null())
                    .col(ColumnDef::new(ExamRecords::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(ExamRecords::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamRecords::Table, ExamRecords::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamRecords::Table, ExamRecords::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamRecords::Table, ExamRecords::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamRecords::Table, ExamRecords::ExamTypeId)
                            .to(ExamTypes::Table, ExamTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamRecords::Table, ExamRecords::GradeId)
                            .to(GradeScales::Table, GradeScales::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 考勤表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Attendances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendances::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendances::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Attendances::ClassroomId).big_integer().null())
                    .col(ColumnDef::new(Attendances::Date).date().not_null())
                    .col(ColumnDef::new(Attendances::Status).string().not_null())
                    .col(ColumnDef::new(Attendances::Remarks).text().null())
                    .col(ColumnDef::new(Attendances::RecordedBy).big_integer().null())
                    .col(ColumnDef::new(Attendances::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendances::Table, Attendances::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendances::Table, Attendances::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendances::Table, Attendances::RecordedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 唯一索引 ====================
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_classroom_subjects_classroom_subject")
                    .table(ClassroomSubjects::Table)
                    .col(ClassroomSubjects::ClassroomId)
                    .col(ClassroomSubjects::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_enrollments_student_classroom")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::ClassroomId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_student_subjects_student_subject")
                    .table(StudentSubjects::Table)
                    .col(StudentSubjects::StudentId)
                    .col(StudentSubjects::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_exam_records_natural_key")
                    .table(ExamRecords::Table)
                    .col(ExamRecords::StudentId)
                    .col(ExamRecords::SubjectId)
                    .col(ExamRecords::ExamTypeId)
                    .col(ExamRecords::ClassroomId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_attendances_user_date")
                    .table(Attendances::Table)
                    .col(Attendances::UserId)
                    .col(Attendances::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ==================== 查询索引 ====================
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_profiles_classroom_id")
                    .table(Profiles::Table)
                    .col(Profiles::ClassroomId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_exam_records_date_recorded")
                    .table(ExamRecords::Table)
                    .col(ExamRecords::DateRecorded)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendances_date")
                    .table(Attendances::Table)
                    .col(Attendances::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Attendances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GradeScales::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentSubjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassroomSubjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classrooms::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Classrooms {
    #[sea_orm(iden = "classrooms")]
    Table,
    Id,
    Name,
    Section,
    AcademicYear,
    ClassTeacherId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
    Name,
    Code,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Profiles {
    #[sea_orm(iden = "profiles")]
    Table,
    Id,
    UserId,
    Address,
    PhoneNumber,
    Gender,
    Department,
    Position,
    RelationToStudent,
    GuardianPhone,
    ClassroomId,
    AvatarToken,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClassroomSubjects {
    #[sea_orm(iden = "classroom_subjects")]
    Table,
    Id,
    ClassroomId,
    SubjectId,
    TeacherId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Enrollments {
    #[sea_orm(iden = "enrollments")]
    Table,
    Id,
    StudentId,
    ClassroomId,
    Status,
    EnrolledAt,
}

#[derive(DeriveIden)]
enum StudentSubjects {
    #[sea_orm(iden = "student_subjects")]
    Table,
    Id,
    StudentId,
    SubjectId,
    ClassroomId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ExamTypes {
    #[sea_orm(iden = "exam_types")]
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum GradeScales {
    #[sea_orm(iden = "grade_scales")]
    Table,
    Id,
    Name,
    ScoreFrom,
    ScoreTo,
    Comment,
}

#[derive(DeriveIden)]
enum ExamRecords {
    #[sea_orm(iden = "exam_records")]
    Table,
    Id,
    ClassroomId,
    Section,
    SubjectId,
    StudentId,
    ExamTypeId,
    Score,
    Comment,
    DateRecorded,
    GradeId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Attendances {
    #[sea_orm(iden = "attendances")]
    Table,
    Id,
    UserId,
    ClassroomId,
    Date,
    Status,
    Remarks,
    RecordedBy,
    CreatedAt,
}
