use super::SeaOrmStorage;
use crate::entity::announcements::{ActiveModel, Column, Entity as Announcements, Model};
use crate::errors::{Result, SchoolError};
use crate::models::{
    PaginationInfo,
    announcements::{
        requests::{AnnouncementListQuery, CreateAnnouncementRequest, UpdateAnnouncementRequest},
        responses::{AnnouncementListResponse, AnnouncementView},
    },
    common::normalize_page,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    async fn ensure_attachment_exists(&self, token: Option<&str>) -> Result<()> {
        if let Some(token) = token
            && self.get_file_by_token_impl(token).await?.is_none()
        {
            return Err(SchoolError::not_found("Attached file not found"));
        }
        Ok(())
    }

    async fn build_announcement_views(&self, models: Vec<Model>) -> Result<Vec<AnnouncementView>> {
        let names = self
            .load_user_names(models.iter().map(|m| m.posted_by).collect())
            .await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let announcement = m.into_announcement();
                AnnouncementView {
                    posted_by_name: names
                        .get(&announcement.posted_by)
                        .cloned()
                        .unwrap_or_default(),
                    announcement,
                }
            })
            .collect())
    }

    pub async fn create_announcement_impl(
        &self,
        req: CreateAnnouncementRequest,
        posted_by: i64,
    ) -> Result<AnnouncementView> {
        self.ensure_attachment_exists(req.file_token.as_deref())
            .await?;

        let now = chrono::Utc::now().timestamp();
        let result = ActiveModel {
            title: Set(req.title.trim().to_string()),
            content: Set(req.content),
            category: Set(req.category.to_string()),
            posted_by: Set(posted_by),
            file_token: Set(req.file_token),
            posted_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolError::database_operation(format!("创建公告失败: {e}")))?;

        self.build_announcement_views(vec![result])
            .await?
            .pop()
            .ok_or_else(|| SchoolError::not_found("Announcement not found"))
    }

    pub async fn get_announcement_impl(&self, id: i64) -> Result<Option<AnnouncementView>> {
        let Some(model) = Announcements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询公告失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.build_announcement_views(vec![model]).await?.pop())
    }

    pub async fn list_announcements_with_pagination_impl(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<AnnouncementListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Announcements::find();
        if let Some(category) = query.category {
            select = select.filter(Column::Category.eq(category.to_string()));
        }
        if let Some(user_id) = query.user_id {
            select = select.filter(Column::PostedBy.eq(user_id));
        }

        let paginator = select
            .order_by_desc(Column::PostedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询公告总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询公告页数失败: {e}")))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询公告列表失败: {e}")))?;

        Ok(AnnouncementListResponse {
            items: self.build_announcement_views(models).await?,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_announcement_impl(
        &self,
        id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<AnnouncementView>> {
        let Some(model) = Announcements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询公告失败: {e}")))?
        else {
            return Ok(None);
        };

        self.ensure_attachment_exists(update.file_token.as_deref())
            .await?;

        let mut active: ActiveModel = model.into();
        if let Some(title) = update.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(content) = update.content {
            active.content = Set(content);
        }
        if let Some(category) = update.category {
            active.category = Set(category.to_string());
        }
        if let Some(token) = update.file_token {
            active.file_token = Set(Some(token));
        }
        active.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新公告失败: {e}")))?;

        Ok(self.build_announcement_views(vec![updated]).await?.pop())
    }

    pub async fn delete_announcement_impl(&self, id: i64) -> Result<bool> {
        let result = Announcements::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除公告失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::announcements::entities::AnnouncementCategory;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};

    async fn author(storage: &SeaOrmStorage) -> i64 {
        storage
            .create_user_impl(CreateUserRequest {
                email: "office@school.test".to_string(),
                first_name: "Mary".to_string(),
                last_name: "Otieno".to_string(),
                password: "hash".to_string(),
                role: UserRole::Staff,
            })
            .await
            .unwrap()
            .id
    }

    fn request(title: &str, category: AnnouncementCategory) -> CreateAnnouncementRequest {
        CreateAnnouncementRequest {
            title: title.to_string(),
            content: "Details follow.".to_string(),
            category,
            file_token: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_filter_announcements() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let staff = author(&storage).await;

        let created = storage
            .create_announcement_impl(request("Sports day", AnnouncementCategory::Event), staff)
            .await
            .unwrap();
        assert_eq!(created.posted_by_name, "Mary Otieno");
        storage
            .create_announcement_impl(request("Term dates", AnnouncementCategory::General), staff)
            .await
            .unwrap();

        let events = storage
            .list_announcements_with_pagination_impl(AnnouncementListQuery {
                category: Some(AnnouncementCategory::Event),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(events.items.len(), 1);
        assert_eq!(events.items[0].announcement.title, "Sports day");

        let all = storage
            .list_announcements_with_pagination_impl(AnnouncementListQuery::default())
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);
    }

    #[tokio::test]
    async fn test_missing_attachment_rejected() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let staff = author(&storage).await;

        let mut req = request("Fees", AnnouncementCategory::Update);
        req.file_token = Some("no-such-token".to_string());
        let err = storage
            .create_announcement_impl(req, staff)
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::NotFound(_)));
    }
}
