use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::library::requests::{
    BookListParams, BorrowBookRequest, CreateBookCategoryRequest, CreateBookRequest,
    CreateLibraryResourceRequest, LibraryResourceListParams, UpdateBookRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::LibraryService;
use crate::utils::SafeIDI64;

static LIBRARY_SERVICE: Lazy<LibraryService> = Lazy::new(LibraryService::new_lazy);

// 分类
pub async fn list_categories(req: HttpRequest) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.list_categories(&req).await
}

pub async fn create_category(
    req: HttpRequest,
    body: web::Json<CreateBookCategoryRequest>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE
        .create_category(body.into_inner(), &req)
        .await
}

// 图书
pub async fn list_books(
    req: HttpRequest,
    query: web::Query<BookListParams>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.list_books(query.into_inner(), &req).await
}

pub async fn create_book(
    req: HttpRequest,
    body: web::Json<CreateBookRequest>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.create_book(body.into_inner(), &req).await
}

pub async fn get_book(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.get_book(id.0, &req).await
}

pub async fn update_book(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateBookRequest>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE
        .update_book(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_book(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.delete_book(id.0, &req).await
}

// 借还
pub async fn borrow_book(
    req: HttpRequest,
    body: web::Json<BorrowBookRequest>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.borrow_book(body.into_inner(), &req).await
}

pub async fn return_book(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.return_book(id.0, &req).await
}

pub async fn my_borrowed(req: HttpRequest) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.my_borrowed(&req).await
}

pub async fn get_borrowed(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.get_borrowed(id.0, &req).await
}

pub async fn all_borrowed(req: HttpRequest) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.all_borrowed(&req).await
}

pub async fn overdue_borrowed(req: HttpRequest) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.overdue_borrowed(&req).await
}

// 往年试卷
pub async fn list_resources(
    req: HttpRequest,
    query: web::Query<LibraryResourceListParams>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE
        .list_resources(query.into_inner(), &req)
        .await
}

pub async fn create_resource(
    req: HttpRequest,
    body: web::Json<CreateLibraryResourceRequest>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE
        .create_resource(body.into_inner(), &req)
        .await
}

pub async fn get_resource(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.get_resource(id.0, &req).await
}

pub async fn delete_resource(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.delete_resource(id.0, &req).await
}

pub async fn download_resource(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.download_resource(id.0, &req).await
}

// 配置路由
pub fn configure_library_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/library")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/categories")
                    .route(web::get().to(list_categories))
                    .route(
                        web::post()
                            .to(create_category)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/books")
                    .route(web::get().to(list_books))
                    .route(
                        web::post()
                            .to(create_book)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/books/{id}")
                    .route(web::get().to(get_book))
                    .route(
                        web::put()
                            .to(update_book)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_book)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            // 借还由教职工在柜台办理
            .service(
                web::resource("/borrow")
                    .route(web::post().to(borrow_book))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/return/{id}")
                    .route(web::post().to(return_book))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .route("/my-borrowed", web::get().to(my_borrowed))
            .service(
                web::resource("/borrowed/all")
                    .route(web::get().to(all_borrowed))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/borrowed/overdue")
                    .route(web::get().to(overdue_borrowed))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .route("/borrowed/{id}", web::get().to(get_borrowed))
            .service(
                web::resource("/resources")
                    .route(web::get().to(list_resources))
                    .route(
                        web::post()
                            .to(create_resource)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/resources/{id}")
                    .route(web::get().to(get_resource))
                    .route(
                        web::delete()
                            .to(delete_resource)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .route("/resources/{id}/file", web::get().to(download_resource)),
    );
}
