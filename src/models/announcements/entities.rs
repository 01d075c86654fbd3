use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "announcement.ts")]
pub enum AnnouncementCategory {
    General,
    Promotion,
    Event,
    Update,
}

impl std::fmt::Display for AnnouncementCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnnouncementCategory::General => write!(f, "general"),
            AnnouncementCategory::Promotion => write!(f, "promotion"),
            AnnouncementCategory::Event => write!(f, "event"),
            AnnouncementCategory::Update => write!(f, "update"),
        }
    }
}

impl std::str::FromStr for AnnouncementCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(AnnouncementCategory::General),
            "promotion" => Ok(AnnouncementCategory::Promotion),
            "event" => Ok(AnnouncementCategory::Event),
            "update" => Ok(AnnouncementCategory::Update),
            _ => Err(format!("Invalid announcement category: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "announcement.ts")]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: AnnouncementCategory,
    pub posted_by: i64,
    pub file_token: Option<String>,
    pub posted_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
