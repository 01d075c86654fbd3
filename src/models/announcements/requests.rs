use serde::Deserialize;
use ts_rs::TS;

use super::entities::AnnouncementCategory;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "announcement.ts")]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
    #[serde(default = "default_category")]
    pub category: AnnouncementCategory,
    pub file_token: Option<String>,
}

fn default_category() -> AnnouncementCategory {
    AnnouncementCategory::General
}

impl CreateAnnouncementRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("Announcement title is required");
        }
        if self.content.trim().is_empty() {
            return Err("Announcement content is required");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "announcement.ts")]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<AnnouncementCategory>,
    pub file_token: Option<String>,
}

// 公告列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "announcement.ts")]
pub struct AnnouncementListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub category: Option<AnnouncementCategory>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub user_id: Option<i64>,
}

// 公告列表查询参数（存储层）
#[derive(Debug, Clone, Default)]
pub struct AnnouncementListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub category: Option<AnnouncementCategory>,
    pub user_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_defaults_to_general() {
        let req: CreateAnnouncementRequest =
            serde_json::from_str(r#"{"title":"Sports day","content":"Friday"}"#).unwrap();
        assert_eq!(req.category, AnnouncementCategory::General);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let result = serde_json::from_str::<CreateAnnouncementRequest>(
            r#"{"title":"x","content":"y","category":"gossip"}"#,
        );
        assert!(result.is_err());
    }
}
