use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::LibraryService;
use crate::errors::SchoolError;
use crate::models::{
    ApiResponse, ErrorCode,
    library::{
        requests::BorrowBookRequest,
        responses::{LoanDetails, LoanListResponse},
    },
    users::entities::UserRole,
};
use crate::services::{
    bad_request, config_from, current_user, error_response, error_response_coded, forbidden,
    not_found, today,
};

fn borrow_error(e: &SchoolError) -> HttpResponse {
    match e {
        SchoolError::NotFound(msg) if msg.starts_with("Student") => {
            error_response_coded(e, ErrorCode::StudentNotFound)
        }
        SchoolError::NotFound(_) => error_response_coded(e, ErrorCode::BookNotFound),
        SchoolError::Conflict(_) => error_response_coded(e, ErrorCode::BookAlreadyBorrowed),
        SchoolError::Validation(_) => error_response_coded(e, ErrorCode::BookUnavailable),
        _ => error_response(e),
    }
}

fn return_error(e: &SchoolError) -> HttpResponse {
    match e {
        SchoolError::NotFound(msg) if msg.starts_with("Book") => {
            error_response_coded(e, ErrorCode::BookNotFound)
        }
        SchoolError::NotFound(_) => error_response_coded(e, ErrorCode::BorrowRecordNotFound),
        SchoolError::InvalidState(_) => error_response_coded(e, ErrorCode::BookAlreadyReturned),
        _ => error_response(e),
    }
}

fn loan_list(loans: Vec<LoanDetails>, fine_per_day: f64) -> LoanListResponse {
    let today = today();
    LoanListResponse {
        items: loans
            .into_iter()
            .map(|loan| loan.into_view(today, fine_per_day))
            .collect(),
    }
}

pub async fn borrow_book(
    service: &LibraryService,
    body: BorrowBookRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = config_from(request)?;
    let today = today();

    let loan = match body.into_loan(today, config.library.default_loan_days) {
        Ok(loan) => loan,
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    };
    let storage = service.get_storage(request)?;

    match storage.borrow_book(loan).await {
        Ok(details) => {
            info!(
                "借出图书 {} 给学生 {}，应还 {}",
                details.loan.book_id, details.loan.student_id, details.loan.return_date
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                details.into_view(today, config.library.fine_per_day),
                "Book borrowed successfully",
            )))
        }
        Err(e) => {
            if matches!(e, SchoolError::StaleData(_)) {
                warn!("借书时库存被并发修改: 图书 {}", loan.book_id);
            }
            Ok(borrow_error(&e))
        }
    }
}

pub async fn return_book(
    service: &LibraryService,
    borrow_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = config_from(request)?;
    let today = today();
    let storage = service.get_storage(request)?;

    match storage.return_book(borrow_id, today).await {
        Ok(details) => {
            let view = details.into_view(today, config.library.fine_per_day);
            info!(
                "归还借阅 {}，逾期 {} 天",
                view.loan.id, view.overdue.overdue_days
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(view, "Book returned successfully")))
        }
        Err(e) => Ok(return_error(&e)),
    }
}

/// 单条借阅；学生只能看自己的
pub async fn get_borrowed(
    service: &LibraryService,
    borrow_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let config = config_from(request)?;
    let storage = service.get_storage(request)?;

    match storage.get_loan(borrow_id).await {
        Ok(Some(details)) => {
            if details.loan.student_id != me.id && !me.role.is_teaching() {
                return Ok(forbidden("You can only view your own borrow records"));
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                details.into_view(today(), config.library.fine_per_day),
                "Borrow record retrieved successfully",
            )))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::BorrowRecordNotFound,
            "Borrow record not found",
        )),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn my_borrowed(
    service: &LibraryService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    if me.role != UserRole::Student {
        return Ok(not_found(ErrorCode::StudentNotFound, "Student profile not found"));
    }
    let config = config_from(request)?;
    let storage = service.get_storage(request)?;

    match storage.list_loans_by_student(me.id).await {
        Ok(loans) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            loan_list(loans, config.library.fine_per_day),
            "Borrowed books retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn all_borrowed(
    service: &LibraryService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = config_from(request)?;
    let storage = service.get_storage(request)?;

    match storage.list_outstanding_loans().await {
        Ok(loans) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            loan_list(loans, config.library.fine_per_day),
            "Borrowed books retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn overdue_borrowed(
    service: &LibraryService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = config_from(request)?;
    let storage = service.get_storage(request)?;

    match storage.list_overdue_loans(today()).await {
        Ok(loans) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            loan_list(loans, config.library.fine_per_day),
            "Overdue books retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_borrow_error_status() {
        let cases = [
            (SchoolError::not_found("Student profile not found"), StatusCode::NOT_FOUND),
            (SchoolError::not_found("Book not found"), StatusCode::NOT_FOUND),
            (
                SchoolError::conflict("You have already borrowed this book"),
                StatusCode::CONFLICT,
            ),
            (
                SchoolError::validation("No copies of this book are available"),
                StatusCode::BAD_REQUEST,
            ),
            (SchoolError::stale_data("stock changed"), StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(borrow_error(&err).status(), status, "{err:?}");
        }
    }

    #[test]
    fn test_return_error_status() {
        assert_eq!(
            return_error(&SchoolError::invalid_state("This book has already been returned"))
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            return_error(&SchoolError::not_found("Borrow record not found")).status(),
            StatusCode::NOT_FOUND
        );
    }
}
