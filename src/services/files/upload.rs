use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{error, info};
use uuid::Uuid;

use super::FileService;
use crate::errors::SchoolError;
use crate::models::{ApiResponse, ErrorCode, files::responses::FileUploadResponse};
use crate::services::{bad_request, config_from, current_user, error_response};
use crate::utils::validate_magic_bytes;

fn upload_failed(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError()
        .json(ApiResponse::error_empty(ErrorCode::FileUploadFailed, message))
}

/// 小写并带点号的扩展名，没有扩展名时为空串
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

fn is_allowed(allowed_types: &[String], extension: &str) -> bool {
    !extension.is_empty() && allowed_types.iter().any(|t| t.to_lowercase() == extension)
}

pub async fn handle_upload(
    service: &FileService,
    req: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let me = match current_user(req) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let config = config_from(req)?;
    let upload_dir = &config.upload.dir;
    let max_size = config.upload.max_size;

    if let Err(e) = fs::create_dir_all(upload_dir) {
        error!("{}", SchoolError::file_operation(format!("创建上传目录失败: {e}")));
        return Ok(upload_failed("Failed to prepare upload directory"));
    }

    let mut original_name = String::new();
    let mut file_size: i64 = 0;
    let mut file_uploaded = false;
    let mut file_type = String::new();
    let mut stored_name = String::new();

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name != "file" {
            continue;
        }
        if file_uploaded {
            if !stored_name.is_empty() {
                let _ = fs::remove_file(Path::new(upload_dir).join(&stored_name));
            }
            return Ok(bad_request(
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time",
            ));
        }
        file_uploaded = true;

        original_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let extension = extension_of(&original_name);
        if !is_allowed(&config.upload.allowed_types, &extension) {
            return Ok(bad_request(
                ErrorCode::FileTypeNotAllowed,
                "File type not allowed",
            ));
        }

        // 仅用于记录，校验以扩展名和文件头为准
        file_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        stored_name = format!("{}{}", Uuid::new_v4(), extension);
        let file_path = Path::new(upload_dir).join(&stored_name);
        let mut f = match fs::File::create(&file_path) {
            Ok(file) => file,
            Err(e) => {
                error!("{}", SchoolError::file_operation(format!("创建文件失败: {e}")));
                return Ok(upload_failed("Failed to store file"));
            }
        };

        let mut total_size: usize = 0;
        let mut first_chunk = true;
        while let Some(chunk) = field.next().await {
            let data = match chunk {
                Ok(data) => data,
                Err(e) => {
                    let _ = fs::remove_file(&file_path);
                    return Err(e.into());
                }
            };

            if first_chunk {
                first_chunk = false;
                if !validate_magic_bytes(&data, &extension) {
                    let _ = fs::remove_file(&file_path);
                    return Ok(bad_request(
                        ErrorCode::FileTypeNotAllowed,
                        "File content does not match its extension",
                    ));
                }
            }

            total_size += data.len();
            if total_size > max_size {
                let _ = fs::remove_file(&file_path);
                return Ok(bad_request(
                    ErrorCode::FileSizeExceeded,
                    "File size exceeds the limit",
                ));
            }
            if let Err(e) = f.write_all(&data) {
                let _ = fs::remove_file(&file_path);
                error!("{}", SchoolError::file_operation(format!("写入文件失败: {e}")));
                return Ok(upload_failed("Failed to store file"));
            }
        }

        // 空文件不会进入上面的循环
        if first_chunk {
            let _ = fs::remove_file(&file_path);
            return Ok(bad_request(ErrorCode::FileUploadFailed, "Uploaded file is empty"));
        }
        file_size = total_size as i64;
    }

    if !file_uploaded {
        return Ok(bad_request(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        ));
    }

    let storage = service.get_storage(req)?;
    let download_token = Uuid::new_v4().to_string();

    match storage
        .upload_file(
            &download_token,
            &original_name,
            &stored_name,
            file_size,
            &file_type,
            me.id,
        )
        .await
    {
        Ok(file) => {
            info!("用户 {} 上传文件 {} ({} 字节)", me.id, file.original_name, file.file_size);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                FileUploadResponse {
                    download_token: file.download_token,
                    file_name: file.original_name,
                    size: file.file_size,
                    content_type: file.file_type,
                    created_at: file.created_at,
                },
                "File uploaded successfully",
            )))
        }
        Err(e) => {
            let _ = fs::remove_file(Path::new(upload_dir).join(&stored_name));
            Ok(error_response(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_allow_list() {
        let allowed = vec![".pdf".to_string(), ".PNG".to_string()];
        assert!(is_allowed(&allowed, &extension_of("paper-2019.PDF")));
        assert!(is_allowed(&allowed, &extension_of("avatar.png")));
        assert!(!is_allowed(&allowed, &extension_of("script.sh")));
        assert!(!is_allowed(&allowed, &extension_of("README")));
    }
}
