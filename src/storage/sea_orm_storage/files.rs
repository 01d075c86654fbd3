//! 文件存储操作

use super::SeaOrmStorage;
use crate::entity::files::{ActiveModel, Column, Entity as Files};
use crate::errors::{Result, SchoolError};
use crate::models::files::entities::File;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 登记上传的文件
    pub async fn upload_file_impl(
        &self,
        download_token: &str,
        original_name: &str,
        stored_name: &str,
        file_size: i64,
        file_type: &str,
        user_id: i64,
    ) -> Result<File> {
        let model = ActiveModel {
            download_token: Set(download_token.to_string()),
            original_name: Set(original_name.to_string()),
            stored_name: Set(stored_name.to_string()),
            file_size: Set(file_size),
            file_type: Set(file_type.to_string()),
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now().timestamp()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("上传文件记录失败: {e}")))?;

        Ok(result.into_file())
    }

    /// 通过下载令牌获取文件
    pub async fn get_file_by_token_impl(&self, token: &str) -> Result<Option<File>> {
        let result = Files::find()
            .filter(Column::DownloadToken.eq(token))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询文件失败: {e}")))?;

        Ok(result.map(|m| m.into_file()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};

    #[tokio::test]
    async fn test_lookup_by_download_token() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let owner = storage
            .create_user_impl(CreateUserRequest {
                email: "uploader@school.test".to_string(),
                first_name: "Uploader".to_string(),
                last_name: "One".to_string(),
                password: "hash".to_string(),
                role: UserRole::Teacher,
            })
            .await
            .unwrap();

        let token = "5f2b7c1e-2a4d-4e59-9a53-0d1c3b8e7f10";
        storage
            .upload_file_impl(token, "paper.pdf", "stored.pdf", 2048, "application/pdf", owner.id)
            .await
            .unwrap();

        let file = storage.get_file_by_token_impl(token).await.unwrap().unwrap();
        assert_eq!(file.original_name, "paper.pdf");
        assert_eq!(file.file_size, 2048);
        assert_eq!(file.user_id, owner.id);

        assert!(
            storage
                .get_file_by_token_impl("missing")
                .await
                .unwrap()
                .is_none()
        );
    }
}
