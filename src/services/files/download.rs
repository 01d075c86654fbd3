use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::path::Path;
use tracing::error;

use super::FileService;
use crate::errors::SchoolError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{config_from, error_response, not_found};
use crate::storage::Storage;

/// 去掉文件名里会破坏响应头的字符
fn header_safe(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect()
}

/// 读取已登记的文件并以附件形式返回；公告附件和往年试卷也走这里
pub(crate) async fn send_stored_file(
    storage: &dyn Storage,
    request: &HttpRequest,
    file_token: &str,
) -> ActixResult<HttpResponse> {
    let db_file = match storage.get_file_by_token(file_token).await {
        Ok(Some(f)) => f,
        Ok(None) => return Ok(not_found(ErrorCode::FileNotFound, "File not found")),
        Err(e) => return Ok(error_response(&e)),
    };

    let config = config_from(request)?;
    let file_path = Path::new(&config.upload.dir).join(&db_file.stored_name);

    let buf = match std::fs::read(&file_path) {
        Ok(buf) => buf,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!("文件记录存在但磁盘文件缺失: {}", file_path.display());
            return Ok(not_found(ErrorCode::FileNotFound, "File not found"));
        }
        Err(e) => {
            error!("{}", SchoolError::file_operation(format!("读取文件失败: {e}")));
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "File read failed",
            )));
        }
    };

    let content_type = if db_file.file_type.is_empty() {
        "application/octet-stream".to_string()
    } else {
        db_file.file_type.clone()
    };

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                header_safe(&db_file.original_name)
            ),
        ))
        .body(buf))
}

pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    file_token: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    send_stored_file(storage.as_ref(), request, &file_token).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_safe_file_name() {
        assert_eq!(header_safe("past \"paper\".pdf"), "past paper.pdf");
        assert_eq!(header_safe("a\r\nb.txt"), "ab.txt");
    }
}
