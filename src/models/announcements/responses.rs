use serde::Serialize;
use ts_rs::TS;

use super::entities::Announcement;
use crate::models::common::PaginationInfo;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "announcement.ts")]
pub struct AnnouncementView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub announcement: Announcement,
    pub posted_by_name: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "announcement.ts")]
pub struct AnnouncementListResponse {
    pub items: Vec<AnnouncementView>,
    pub pagination: PaginationInfo,
}
