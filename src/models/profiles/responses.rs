use serde::Serialize;
use ts_rs::TS;

use super::entities::Profile;
use crate::models::users::entities::UserSummary;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "profile.ts")]
pub struct ProfileResponse {
    pub user: UserSummary,
    /// 尚未填写资料时为空
    pub profile: Option<Profile>,
}
