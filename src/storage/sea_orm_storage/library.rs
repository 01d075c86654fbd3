use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{book_categories, books, borrowed_books, library_resources};
use crate::errors::{Result, SchoolError};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    library::{
        entities::{Book, BookCategory, LibraryResource},
        requests::{
            BookListQuery, CreateBookCategoryRequest, CreateBookRequest,
            CreateLibraryResourceRequest, LibraryResourceListParams, NewLoan, UpdateBookRequest,
        },
        responses::{BookListResponse, LoanDetails},
    },
    users::entities::UserRole,
};
use crate::utils::like_contains;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 以当前值为条件修改可借数量，返回是否成功
async fn swap_available_copies(
    txn: &DatabaseTransaction,
    book_id: i64,
    expected: i32,
    next: i32,
) -> Result<bool> {
    let result = Books::update_many()
        .col_expr(books::Column::AvailableCopies, Expr::value(next))
        .col_expr(
            books::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().timestamp()),
        )
        .filter(books::Column::Id.eq(book_id))
        .filter(books::Column::AvailableCopies.eq(expected))
        .exec(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("更新图书库存失败: {e}")))?;

    Ok(result.rows_affected == 1)
}

async fn ensure_category_exists(txn: &DatabaseTransaction, category_id: i64) -> Result<()> {
    let category = BookCategories::find_by_id(category_id)
        .one(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("查询图书分类失败: {e}")))?;
    if category.is_none() {
        return Err(SchoolError::not_found("Book category not found"));
    }
    Ok(())
}

impl SeaOrmStorage {
    // 分类

    pub async fn list_book_categories_impl(&self) -> Result<Vec<BookCategory>> {
        let items = BookCategories::find()
            .order_by_asc(book_categories::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询图书分类失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_category()).collect())
    }

    pub async fn create_book_category_impl(
        &self,
        req: CreateBookCategoryRequest,
    ) -> Result<BookCategory> {
        let name = req.name.trim().to_string();

        let existing = BookCategories::find()
            .filter(book_categories::Column::Name.eq(name.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询图书分类失败: {e}")))?;
        if existing.is_some() {
            return Err(SchoolError::conflict(format!(
                "Book category '{name}' already exists"
            )));
        }

        let result = BookCategoryActiveModel {
            name: Set(name),
            description: Set(req.description),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolError::database_operation(format!("创建图书分类失败: {e}")))?;

        Ok(result.into_category())
    }

    // 图书

    pub async fn create_book_impl(&self, req: CreateBookRequest) -> Result<Book> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        if let Some(category_id) = req.category_id {
            ensure_category_exists(&txn, category_id).await?;
        }

        let now = chrono::Utc::now().timestamp();
        let result = BookActiveModel {
            title: Set(req.title.trim().to_string()),
            author: Set(req.author.trim().to_string()),
            isbn: Set(req.isbn),
            category_id: Set(req.category_id),
            price: Set(req.price),
            total_copies: Set(req.total_copies),
            available_copies: Set(req.total_copies),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("创建图书失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_book())
    }

    pub async fn get_book_by_id_impl(&self, id: i64) -> Result<Option<Book>> {
        let result = Books::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询图书失败: {e}")))?;

        Ok(result.map(|m| m.into_book()))
    }

    pub async fn list_books_with_pagination_impl(
        &self,
        query: BookListQuery,
    ) -> Result<BookListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Books::find();
        if let Some(category_id) = query.category_id {
            select = select.filter(books::Column::CategoryId.eq(category_id));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = like_contains(search.trim());
            select = select.filter(
                Condition::any()
                    .add(books::Column::Title.like(pattern.clone()))
                    .add(books::Column::Author.like(pattern.clone()))
                    .add(books::Column::Isbn.like(pattern.clone())),
            );
        }

        let paginator = select
            .order_by_asc(books::Column::Title)
            .order_by_asc(books::Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询图书总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询图书页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询图书列表失败: {e}")))?;

        Ok(BookListResponse {
            items: items.into_iter().map(|m| m.into_book()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新图书；总量变化时可借数量同步增减，不允许减到负数
    pub async fn update_book_impl(
        &self,
        id: i64,
        update: UpdateBookRequest,
    ) -> Result<Option<Book>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(current) = Books::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询图书失败: {e}")))?
        else {
            return Ok(None);
        };

        if let Some(category_id) = update.category_id {
            ensure_category_exists(&txn, category_id).await?;
        }

        let (total, available) = (current.total_copies, current.available_copies);
        let mut model: BookActiveModel = current.into();

        if let Some(new_total) = update.total_copies {
            let new_available = available + (new_total - total);
            if new_available < 0 {
                return Err(SchoolError::validation(format!(
                    "total_copies cannot be lower than the {} copies currently on loan",
                    total - available
                )));
            }
            model.total_copies = Set(new_total);
            model.available_copies = Set(new_available);
        }
        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(author) = update.author {
            model.author = Set(author.trim().to_string());
        }
        if let Some(isbn) = update.isbn {
            model.isbn = Set(Some(isbn));
        }
        if let Some(category_id) = update.category_id {
            model.category_id = Set(Some(category_id));
        }
        if let Some(price) = update.price {
            model.price = Set(price);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新图书失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_book()))
    }

    pub async fn delete_book_impl(&self, id: i64) -> Result<bool> {
        let result = Books::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除图书失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    // 借阅

    async fn build_loan_details(
        &self,
        loans: Vec<crate::entity::borrowed_books::Model>,
    ) -> Result<Vec<LoanDetails>> {
        if loans.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids = loans.iter().map(|l| l.student_id).collect();
        let names = self.load_user_names(student_ids).await?;

        let titles: HashMap<i64, String> = Books::find()
            .filter(books::Column::Id.is_in(loans.iter().map(|l| l.book_id)))
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询图书失败: {e}")))?
            .into_iter()
            .map(|b| (b.id, b.title))
            .collect();

        Ok(loans
            .into_iter()
            .map(|m| {
                let loan = m.into_borrowed_book();
                LoanDetails {
                    book_title: titles.get(&loan.book_id).cloned().unwrap_or_default(),
                    student_name: names.get(&loan.student_id).cloned().unwrap_or_default(),
                    loan,
                }
            })
            .collect())
    }

    /// 借书
    ///
    /// 同一学生同一本书只能有一条未归还记录；库存通过比较交换扣减，
    /// 期间库存被其他请求修改时整个事务回滚。
    pub async fn borrow_book_impl(&self, loan: NewLoan) -> Result<LoanDetails> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        let student = Users::find_by_id(loan.student_id)
            .one(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询学生失败: {e}")))?;
        if !student.is_some_and(|s| s.role == UserRole::STUDENT) {
            return Err(SchoolError::not_found("Student profile not found"));
        }

        let Some(book) = Books::find_by_id(loan.book_id)
            .one(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询图书失败: {e}")))?
        else {
            return Err(SchoolError::not_found("Book not found"));
        };

        let outstanding = BorrowedBooks::find()
            .filter(borrowed_books::Column::StudentId.eq(loan.student_id))
            .filter(borrowed_books::Column::BookId.eq(loan.book_id))
            .filter(borrowed_books::Column::Returned.eq(false))
            .one(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询借阅记录失败: {e}")))?;
        if outstanding.is_some() {
            return Err(SchoolError::conflict(
                "This student has already borrowed this book and not returned it yet",
            ));
        }

        if book.available_copies <= 0 {
            return Err(SchoolError::validation("No copies of this book are available"));
        }

        if !swap_available_copies(&txn, book.id, book.available_copies, book.available_copies - 1)
            .await?
        {
            return Err(SchoolError::stale_data(
                "The book's stock changed while borrowing, please retry",
            ));
        }

        let inserted = BorrowedBookActiveModel {
            student_id: Set(loan.student_id),
            book_id: Set(loan.book_id),
            issue_date: Set(loan.issue_date),
            return_date: Set(loan.return_date),
            actual_return_date: Set(None),
            returned: Set(false),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("创建借阅记录失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        self.build_loan_details(vec![inserted])
            .await?
            .pop()
            .ok_or_else(|| SchoolError::not_found("Borrow record not found"))
    }

    /// 还书，库存加一但不超过总量
    pub async fn return_book_impl(
        &self,
        borrow_id: i64,
        today: chrono::NaiveDate,
    ) -> Result<LoanDetails> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(loan) = BorrowedBooks::find_by_id(borrow_id)
            .one(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询借阅记录失败: {e}")))?
        else {
            return Err(SchoolError::not_found("Borrow record not found"));
        };

        if loan.returned {
            return Err(SchoolError::invalid_state("This book has already been returned"));
        }

        let marked = BorrowedBooks::update_many()
            .col_expr(borrowed_books::Column::Returned, Expr::value(true))
            .col_expr(borrowed_books::Column::ActualReturnDate, Expr::value(today))
            .filter(borrowed_books::Column::Id.eq(borrow_id))
            .filter(borrowed_books::Column::Returned.eq(false))
            .exec(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新借阅记录失败: {e}")))?;
        if marked.rows_affected != 1 {
            return Err(SchoolError::invalid_state("This book has already been returned"));
        }

        let Some(book) = Books::find_by_id(loan.book_id)
            .one(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询图书失败: {e}")))?
        else {
            return Err(SchoolError::not_found("Book not found"));
        };

        let next = (book.available_copies + 1).min(book.total_copies);
        if next != book.available_copies
            && !swap_available_copies(&txn, book.id, book.available_copies, next).await?
        {
            return Err(SchoolError::stale_data(
                "The book's stock changed while returning, please retry",
            ));
        }

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_loan_impl(borrow_id)
            .await?
            .ok_or_else(|| SchoolError::not_found("Borrow record not found"))
    }

    pub async fn get_loan_impl(&self, borrow_id: i64) -> Result<Option<LoanDetails>> {
        let Some(model) = BorrowedBooks::find_by_id(borrow_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询借阅记录失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.build_loan_details(vec![model]).await?.pop())
    }

    pub async fn list_loans_by_student_impl(&self, student_id: i64) -> Result<Vec<LoanDetails>> {
        let loans = BorrowedBooks::find()
            .filter(borrowed_books::Column::StudentId.eq(student_id))
            .order_by_desc(borrowed_books::Column::IssueDate)
            .order_by_desc(borrowed_books::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询借阅记录失败: {e}")))?;

        self.build_loan_details(loans).await
    }

    pub async fn list_outstanding_loans_impl(&self) -> Result<Vec<LoanDetails>> {
        let loans = BorrowedBooks::find()
            .filter(borrowed_books::Column::Returned.eq(false))
            .order_by_desc(borrowed_books::Column::IssueDate)
            .order_by_desc(borrowed_books::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询借阅记录失败: {e}")))?;

        self.build_loan_details(loans).await
    }

    pub async fn list_overdue_loans_impl(
        &self,
        today: chrono::NaiveDate,
    ) -> Result<Vec<LoanDetails>> {
        let loans = BorrowedBooks::find()
            .filter(borrowed_books::Column::Returned.eq(false))
            .filter(borrowed_books::Column::ReturnDate.lt(today))
            .order_by_asc(borrowed_books::Column::ReturnDate)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询逾期记录失败: {e}")))?;

        self.build_loan_details(loans).await
    }

    // 往年试卷

    pub async fn create_library_resource_impl(
        &self,
        req: CreateLibraryResourceRequest,
        uploaded_by: i64,
    ) -> Result<LibraryResource> {
        if self.get_file_by_token_impl(&req.file_token).await?.is_none() {
            return Err(SchoolError::not_found("File not found"));
        }

        let result = LibraryResourceActiveModel {
            title: Set(req.title.trim().to_string()),
            subject: Set(req.subject.trim().to_string()),
            year: Set(req.year),
            file_token: Set(req.file_token),
            uploaded_by: Set(Some(uploaded_by)),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolError::database_operation(format!("创建图书馆资料失败: {e}")))?;

        Ok(result.into_resource())
    }

    pub async fn get_library_resource_impl(&self, id: i64) -> Result<Option<LibraryResource>> {
        let result = LibraryResources::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询图书馆资料失败: {e}")))?;

        Ok(result.map(|m| m.into_resource()))
    }

    pub async fn list_library_resources_impl(
        &self,
        filter: LibraryResourceListParams,
    ) -> Result<Vec<LibraryResource>> {
        let mut select = LibraryResources::find();
        if let Some(ref subject) = filter.subject
            && !subject.trim().is_empty()
        {
            select = select.filter(library_resources::Column::Subject.eq(subject.trim()));
        }
        if let Some(year) = filter.year {
            select = select.filter(library_resources::Column::Year.eq(year));
        }

        let items = select
            .order_by_desc(library_resources::Column::Year)
            .order_by_asc(library_resources::Column::Title)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询图书馆资料失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_resource()).collect())
    }

    pub async fn delete_library_resource_impl(&self, id: i64) -> Result<bool> {
        let result = LibraryResources::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除图书馆资料失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::requests::CreateUserRequest;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn user(storage: &SeaOrmStorage, email: &str, role: UserRole) -> i64 {
        storage
            .create_user_impl(CreateUserRequest {
                email: email.to_string(),
                first_name: "Test".to_string(),
                last_name: email.to_string(),
                password: "hash".to_string(),
                role,
            })
            .await
            .unwrap()
            .id
    }

    async fn book(storage: &SeaOrmStorage, copies: i32) -> i64 {
        storage
            .create_book_impl(CreateBookRequest {
                title: "River Between".to_string(),
                author: "Ngugi wa Thiong'o".to_string(),
                isbn: None,
                category_id: None,
                price: 12.0,
                total_copies: copies,
                description: None,
            })
            .await
            .unwrap()
            .id
    }

    fn loan(student_id: i64, book_id: i64) -> NewLoan {
        NewLoan {
            student_id,
            book_id,
            issue_date: date(2024, 1, 1),
            return_date: date(2024, 1, 10),
        }
    }

    async fn copies(storage: &SeaOrmStorage, book_id: i64) -> (i32, i32) {
        let b = storage.get_book_by_id_impl(book_id).await.unwrap().unwrap();
        (b.available_copies, b.total_copies)
    }

    #[tokio::test]
    async fn test_borrow_then_return_restores_stock() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let student = user(&storage, "amina@school.test", UserRole::Student).await;
        let book_id = book(&storage, 2).await;

        let borrowed = storage.borrow_book_impl(loan(student, book_id)).await.unwrap();
        assert!(!borrowed.loan.returned);
        assert_eq!(borrowed.book_title, "River Between");
        assert_eq!(copies(&storage, book_id).await, (1, 2));

        let returned = storage
            .return_book_impl(borrowed.loan.id, date(2024, 1, 8))
            .await
            .unwrap();
        assert!(returned.loan.returned);
        assert_eq!(returned.loan.actual_return_date, Some(date(2024, 1, 8)));
        assert_eq!(copies(&storage, book_id).await, (2, 2));
    }

    #[tokio::test]
    async fn test_second_outstanding_borrow_rejected() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let student = user(&storage, "brian@school.test", UserRole::Student).await;
        let book_id = book(&storage, 5).await;

        storage.borrow_book_impl(loan(student, book_id)).await.unwrap();
        let err = storage
            .borrow_book_impl(loan(student, book_id))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Conflict(_)));
        // 被拒绝的请求不扣库存
        assert_eq!(copies(&storage, book_id).await, (4, 5));
    }

    #[tokio::test]
    async fn test_zero_stock_rejected_regardless_of_history() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let first = user(&storage, "chao@school.test", UserRole::Student).await;
        let second = user(&storage, "dina@school.test", UserRole::Student).await;
        let book_id = book(&storage, 1).await;

        let earlier = storage.borrow_book_impl(loan(second, book_id)).await.unwrap();
        storage
            .return_book_impl(earlier.loan.id, date(2024, 1, 5))
            .await
            .unwrap();

        storage.borrow_book_impl(loan(first, book_id)).await.unwrap();
        let err = storage
            .borrow_book_impl(loan(second, book_id))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Validation(_)));
        assert_eq!(copies(&storage, book_id).await, (0, 1));
    }

    #[tokio::test]
    async fn test_returning_twice_rejected() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let student = user(&storage, "esi@school.test", UserRole::Student).await;
        let book_id = book(&storage, 1).await;

        let borrowed = storage.borrow_book_impl(loan(student, book_id)).await.unwrap();
        storage
            .return_book_impl(borrowed.loan.id, date(2024, 1, 9))
            .await
            .unwrap();
        let err = storage
            .return_book_impl(borrowed.loan.id, date(2024, 1, 9))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::InvalidState(_)));
        assert_eq!(copies(&storage, book_id).await, (1, 1));

        let missing = storage.return_book_impl(9999, date(2024, 1, 9)).await;
        assert!(matches!(missing, Err(SchoolError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stock_stays_within_bounds() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let book_id = book(&storage, 2).await;
        let mut students = Vec::new();
        for i in 0..3 {
            students.push(user(&storage, &format!("s{i}@school.test"), UserRole::Student).await);
        }

        let mut open = Vec::new();
        for (step, student) in students.iter().cycle().take(7).enumerate() {
            match storage.borrow_book_impl(loan(*student, book_id)).await {
                Ok(details) => open.push(details.loan.id),
                Err(_) if step % 2 == 1 => {
                    if let Some(id) = open.pop() {
                        storage.return_book_impl(id, date(2024, 1, 3)).await.unwrap();
                    }
                }
                Err(_) => {}
            }
            let (available, total) = copies(&storage, book_id).await;
            assert!((0..=total).contains(&available));
            assert_eq!(available, total - open.len() as i32);
        }
    }

    #[tokio::test]
    async fn test_late_return_fine() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let student = user(&storage, "femi@school.test", UserRole::Student).await;
        let book_id = book(&storage, 1).await;

        let borrowed = storage.borrow_book_impl(loan(student, book_id)).await.unwrap();
        let returned = storage
            .return_book_impl(borrowed.loan.id, date(2024, 1, 15))
            .await
            .unwrap();

        let view = returned.into_view(date(2024, 3, 1), 10.0);
        assert!(view.overdue.is_overdue);
        assert_eq!(view.overdue.overdue_days, 5);
        assert_eq!(view.overdue.fine, 50.0);
    }

    #[tokio::test]
    async fn test_only_students_borrow() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = user(&storage, "grace@school.test", UserRole::Teacher).await;
        let book_id = book(&storage, 1).await;

        let err = storage
            .borrow_book_impl(loan(teacher, book_id))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::NotFound(_)));
        assert_eq!(copies(&storage, book_id).await, (1, 1));
    }

    #[tokio::test]
    async fn test_total_change_shifts_available() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let student = user(&storage, "hana@school.test", UserRole::Student).await;
        let book_id = book(&storage, 2).await;
        storage.borrow_book_impl(loan(student, book_id)).await.unwrap();

        let grown = storage
            .update_book_impl(
                book_id,
                UpdateBookRequest {
                    total_copies: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!((grown.available_copies, grown.total_copies), (3, 4));

        let err = storage
            .update_book_impl(
                book_id,
                UpdateBookRequest {
                    total_copies: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Validation(_)));
        assert_eq!(copies(&storage, book_id).await, (3, 4));
    }

    #[tokio::test]
    async fn test_overdue_listing() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let student = user(&storage, "ivan@school.test", UserRole::Student).await;
        let book_id = book(&storage, 3).await;
        storage.borrow_book_impl(loan(student, book_id)).await.unwrap();

        assert!(storage
            .list_overdue_loans_impl(date(2024, 1, 10))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            storage
                .list_overdue_loans_impl(date(2024, 1, 11))
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(storage.list_outstanding_loans_impl().await.unwrap().len(), 1);
    }
}
