//! 用户资料
//!
//! 数据库里每个用户最多一行资料，字段是各角色资料的并集；
//! 对外则按用户角色分派成 [`Profile`] 的不同变体，只暴露该角色关心的字段。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserRole;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "profile.ts")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!("Invalid gender: {s}")),
        }
    }
}

/// 资料表的一行（角色无关）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileRecord {
    pub user_id: i64,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<Gender>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub relation_to_student: Option<String>,
    pub guardian_phone: Option<String>,
    pub classroom_id: Option<i64>,
    pub avatar_token: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "profile.ts")]
pub struct StudentProfile {
    pub user_id: i64,
    pub address: Option<String>,
    pub guardian_phone: Option<String>,
    pub classroom_id: Option<i64>,
    pub avatar_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "profile.ts")]
pub struct TeacherProfile {
    pub user_id: i64,
    pub address: Option<String>,
    pub gender: Option<Gender>,
    pub phone_number: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub avatar_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "profile.ts")]
pub struct ParentProfile {
    pub user_id: i64,
    pub address: Option<String>,
    pub gender: Option<Gender>,
    pub phone_number: Option<String>,
    pub relation_to_student: Option<String>,
    pub avatar_token: Option<String>,
}

/// 教务人员与校长共用
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "profile.ts")]
pub struct StaffProfile {
    pub user_id: i64,
    pub address: Option<String>,
    pub gender: Option<Gender>,
    pub phone_number: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub avatar_token: Option<String>,
}

/// 按角色分派的资料
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(tag = "role", rename_all = "snake_case")]
#[ts(export, export_to = "profile.ts")]
pub enum Profile {
    Student(StudentProfile),
    Teacher(TeacherProfile),
    Parent(ParentProfile),
    Staff(StaffProfile),
    #[serde(rename = "headteacher")]
    HeadTeacher(StaffProfile),
}

impl Profile {
    /// 根据用户角色把资料行转换成对应变体；pending 用户没有资料
    pub fn from_record(role: UserRole, record: ProfileRecord) -> Option<Self> {
        let staff = |r: ProfileRecord| StaffProfile {
            user_id: r.user_id,
            address: r.address,
            gender: r.gender,
            phone_number: r.phone_number,
            department: r.department,
            position: r.position,
            avatar_token: r.avatar_token,
        };

        match role {
            UserRole::Student => Some(Profile::Student(StudentProfile {
                user_id: record.user_id,
                address: record.address,
                guardian_phone: record.guardian_phone,
                classroom_id: record.classroom_id,
                avatar_token: record.avatar_token,
            })),
            UserRole::Teacher => Some(Profile::Teacher(TeacherProfile {
                user_id: record.user_id,
                address: record.address,
                gender: record.gender,
                phone_number: record.phone_number,
                department: record.department,
                position: record.position,
                avatar_token: record.avatar_token,
            })),
            UserRole::Parent => Some(Profile::Parent(ParentProfile {
                user_id: record.user_id,
                address: record.address,
                gender: record.gender,
                phone_number: record.phone_number,
                relation_to_student: record.relation_to_student,
                avatar_token: record.avatar_token,
            })),
            UserRole::Staff => Some(Profile::Staff(staff(record))),
            UserRole::HeadTeacher => Some(Profile::HeadTeacher(staff(record))),
            UserRole::Pending => None,
        }
    }

    pub fn user_id(&self) -> i64 {
        match self {
            Profile::Student(p) => p.user_id,
            Profile::Teacher(p) => p.user_id,
            Profile::Parent(p) => p.user_id,
            Profile::Staff(p) | Profile::HeadTeacher(p) => p.user_id,
        }
    }

    /// 按查看者裁剪字段：学生的住址和监护人电话只对本人和教务人员可见
    pub fn visible_to(self, viewer_id: i64, viewer_role: UserRole) -> Self {
        match self {
            Profile::Student(mut p) if p.user_id != viewer_id && !viewer_role.is_staff() => {
                p.address = None;
                p.guardian_phone = None;
                Profile::Student(p)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ProfileRecord {
        ProfileRecord {
            user_id: 7,
            address: Some("12 Hill Road".to_string()),
            phone_number: Some("0700000000".to_string()),
            gender: Some(Gender::Female),
            department: Some("Science".to_string()),
            position: Some("HOD".to_string()),
            relation_to_student: Some("Mother".to_string()),
            guardian_phone: Some("0711111111".to_string()),
            classroom_id: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn test_dispatch_by_role() {
        match Profile::from_record(UserRole::Student, record()) {
            Some(Profile::Student(p)) => {
                assert_eq!(p.classroom_id, Some(3));
                assert_eq!(p.guardian_phone.as_deref(), Some("0711111111"));
            }
            other => panic!("unexpected profile: {other:?}"),
        }

        match Profile::from_record(UserRole::Parent, record()) {
            Some(Profile::Parent(p)) => {
                assert_eq!(p.relation_to_student.as_deref(), Some("Mother"))
            }
            other => panic!("unexpected profile: {other:?}"),
        }

        assert!(matches!(
            Profile::from_record(UserRole::HeadTeacher, record()),
            Some(Profile::HeadTeacher(_))
        ));
        assert!(Profile::from_record(UserRole::Pending, record()).is_none());
    }

    #[test]
    fn test_serialized_tag_follows_role() {
        let profile = Profile::from_record(UserRole::HeadTeacher, record()).unwrap();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["role"], "headteacher");
        assert_eq!(json["department"], "Science");
        assert!(json.get("guardian_phone").is_none());
    }

    #[test]
    fn test_student_private_fields_hidden_from_other_teachers() {
        let profile = Profile::from_record(UserRole::Student, record()).unwrap();

        let Profile::Student(seen_by_teacher) = profile.clone().visible_to(99, UserRole::Teacher)
        else {
            panic!("variant changed");
        };
        assert!(seen_by_teacher.guardian_phone.is_none());
        assert!(seen_by_teacher.address.is_none());

        let Profile::Student(seen_by_self) = profile.clone().visible_to(7, UserRole::Student) else {
            panic!("variant changed");
        };
        assert!(seen_by_self.guardian_phone.is_some());

        let Profile::Student(seen_by_staff) = profile.visible_to(99, UserRole::Staff) else {
            panic!("variant changed");
        };
        assert!(seen_by_staff.address.is_some());
    }
}
