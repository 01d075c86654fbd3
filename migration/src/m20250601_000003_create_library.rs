use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 图书分类表 ====================
        manager
            .create_table(
                Table::create()
                    .table(BookCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookCategories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BookCategories::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(BookCategories::Description).text().null())
                    .to_owned(),
            )
            .await?;

        // ==================== 图书表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Books::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Books::Title).string().not_null())
                    .col(ColumnDef::new(Books::Author).string().not_null())
                    .col(ColumnDef::new(Books::Isbn).string().null())
                    .col(ColumnDef::new(Books::CategoryId).big_integer().null())
                    .col(ColumnDef::new(Books::Price).double().not_null().default(0.0))
                    .col(ColumnDef::new(Books::TotalCopies).integer().not_null())
                    .col(ColumnDef::new(Books::AvailableCopies).integer().not_null())
                    .col(ColumnDef::new(Books::Description).text().null())
                    .col(ColumnDef::new(Books::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Books::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Books::Table, Books::CategoryId)
                            .to(BookCategories::Table, BookCategories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 借阅记录表 ====================
        manager
            .create_table(
                Table::create()
                    .table(BorrowedBooks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BorrowedBooks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BorrowedBooks::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BorrowedBooks::BookId).big_integer().not_null())
                    .col(ColumnDef::new(BorrowedBooks::IssueDate).date().not_null())
                    .col(ColumnDef::new(BorrowedBooks::ReturnDate).date().not_null())
                    .col(ColumnDef::new(BorrowedBooks::ActualReturnDate).date().null())
                    .col(
                        ColumnDef::new(BorrowedBooks::Returned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BorrowedBooks::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BorrowedBooks::Table, BorrowedBooks::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BorrowedBooks::Table, BorrowedBooks::BookId)
                            .to(Books::Table, Books::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 图书馆资源表（往年试卷） ====================
        manager
            .create_table(
                Table::create()
                    .table(LibraryResources::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LibraryResources::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LibraryResources::Title).string().not_null())
                    .col(ColumnDef::new(LibraryResources::Subject).string().not_null())
                    .col(ColumnDef::new(LibraryResources::Year).integer().not_null())
                    .col(
                        ColumnDef::new(LibraryResources::FileToken)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LibraryResources::UploadedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LibraryResources::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LibraryResources::Table, LibraryResources::FileToken)
                            .to(Files::Table, Files::DownloadToken)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LibraryResources::Table, LibraryResources::UploadedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 公告表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Announcements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Announcements::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Announcements::Title).string().not_null())
                    .col(ColumnDef::new(Announcements::Content).text().not_null())
                    .col(ColumnDef::new(Announcements::Category).string().not_null())
                    .col(ColumnDef::new(Announcements::PostedBy).big_integer().not_null())
                    .col(ColumnDef::new(Announcements::FileToken).string().null())
                    .col(ColumnDef::new(Announcements::PostedAt).big_integer().not_null())
                    .col(ColumnDef::new(Announcements::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Announcements::Table, Announcements::PostedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Announcements::Table, Announcements::FileToken)
                            .to(Files::Table, Files::DownloadToken)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 索引 ====================
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_books_category_id")
                    .table(Books::Table)
                    .col(Books::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_borrowed_books_student_book")
                    .table(BorrowedBooks::Table)
                    .col(BorrowedBooks::StudentId)
                    .col(BorrowedBooks::BookId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_borrowed_books_returned")
                    .table(BorrowedBooks::Table)
                    .col(BorrowedBooks::Returned)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_announcements_posted_at")
                    .table(Announcements::Table)
                    .col(Announcements::PostedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Announcements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LibraryResources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BorrowedBooks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Books::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BookCategories::Table).to_owned())
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
enum Files {
    #[sea_orm(iden = "files")]
    Table,
    DownloadToken,
}

#[derive(DeriveIden)]
enum BookCategories {
    #[sea_orm(iden = "book_categories")]
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Books {
    #[sea_orm(iden = "books")]
    Table,
    Id,
    Title,
    Author,
    Isbn,
    CategoryId,
    Price,
    TotalCopies,
    AvailableCopies,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BorrowedBooks {
    #[sea_orm(iden = "borrowed_books")]
    Table,
    Id,
    StudentId,
    BookId,
    IssueDate,
    ReturnDate,
    ActualReturnDate,
    Returned,
    CreatedAt,
}

#[derive(DeriveIden)]
enum LibraryResources {
    #[sea_orm(iden = "library_resources")]
    Table,
    Id,
    Title,
    Subject,
    Year,
    FileToken,
    UploadedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Announcements {
    #[sea_orm(iden = "announcements")]
    Table,
    Id,
    Title,
    Content,
    Category,
    PostedBy,
    FileToken,
    PostedAt,
    UpdatedAt,
}
