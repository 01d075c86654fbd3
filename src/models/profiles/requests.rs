use serde::Deserialize;
use ts_rs::TS;

use super::entities::Gender;
use crate::models::users::entities::UserRole;

/// 创建或更新本人资料，不属于当前角色的字段会被忽略
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "profile.ts")]
pub struct UpsertProfileRequest {
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<Gender>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub relation_to_student: Option<String>,
    pub guardian_phone: Option<String>,
    pub avatar_token: Option<String>,
}

/// 写入资料表的字段集合（存储层）；None 表示不修改
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<Gender>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub relation_to_student: Option<String>,
    pub guardian_phone: Option<String>,
    pub avatar_token: Option<String>,
}

impl UpsertProfileRequest {
    /// 只保留该角色资料中存在的字段
    pub fn restrict_to(self, role: UserRole) -> Option<ProfileChanges> {
        let base = ProfileChanges {
            address: self.address,
            avatar_token: self.avatar_token,
            ..Default::default()
        };

        match role {
            UserRole::Student => Some(ProfileChanges {
                guardian_phone: self.guardian_phone,
                ..base
            }),
            UserRole::Teacher | UserRole::Staff | UserRole::HeadTeacher => Some(ProfileChanges {
                gender: self.gender,
                phone_number: self.phone_number,
                department: self.department,
                position: self.position,
                ..base
            }),
            UserRole::Parent => Some(ProfileChanges {
                gender: self.gender,
                phone_number: self.phone_number,
                relation_to_student: self.relation_to_student,
                ..base
            }),
            UserRole::Pending => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> UpsertProfileRequest {
        UpsertProfileRequest {
            address: Some("Plot 4".to_string()),
            phone_number: Some("0722".to_string()),
            gender: Some(Gender::Male),
            department: Some("Maths".to_string()),
            relation_to_student: Some("Father".to_string()),
            guardian_phone: Some("0733".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_student_keeps_only_student_fields() {
        let changes = request().restrict_to(UserRole::Student).unwrap();
        assert_eq!(changes.guardian_phone.as_deref(), Some("0733"));
        assert_eq!(changes.address.as_deref(), Some("Plot 4"));
        assert!(changes.department.is_none());
        assert!(changes.phone_number.is_none());
    }

    #[test]
    fn test_parent_keeps_relation() {
        let changes = request().restrict_to(UserRole::Parent).unwrap();
        assert_eq!(changes.relation_to_student.as_deref(), Some("Father"));
        assert!(changes.department.is_none());
        assert!(changes.guardian_phone.is_none());
    }

    #[test]
    fn test_pending_has_no_profile() {
        assert!(request().restrict_to(UserRole::Pending).is_none());
    }
}
