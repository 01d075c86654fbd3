use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "user.ts")]
pub enum UserRole {
    Student, // 学生
    Teacher, // 教师
    Parent,  // 家长
    Staff,   // 教务人员
    #[serde(rename = "headteacher")]
    HeadTeacher, // 校长
    Pending, // 自助注册、尚未分配角色
}

impl UserRole {
    pub const STUDENT: &'static str = "student";
    pub const TEACHER: &'static str = "teacher";
    pub const PARENT: &'static str = "parent";
    pub const STAFF: &'static str = "staff";
    pub const HEAD_TEACHER: &'static str = "headteacher";
    pub const PENDING: &'static str = "pending";

    /// 只有校长
    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::HeadTeacher]
    }
    /// 教务管理（教务人员、校长）
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Staff, &Self::HeadTeacher]
    }
    /// 教学相关（教师、教务人员、校长）
    pub fn teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher, &Self::Staff, &Self::HeadTeacher]
    }
    /// 可以被分配的角色
    pub fn assignable_roles() -> &'static [&'static UserRole] {
        &[
            &Self::Student,
            &Self::Teacher,
            &Self::Parent,
            &Self::Staff,
            &Self::HeadTeacher,
        ]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[
            &Self::Student,
            &Self::Teacher,
            &Self::Parent,
            &Self::Staff,
            &Self::HeadTeacher,
            &Self::Pending,
        ]
    }

    pub fn is_staff(&self) -> bool {
        Self::staff_roles().contains(&self)
    }

    pub fn is_teaching(&self) -> bool {
        Self::teacher_roles().contains(&self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => UserRole::STUDENT,
            UserRole::Teacher => UserRole::TEACHER,
            UserRole::Parent => UserRole::PARENT,
            UserRole::Staff => UserRole::STAFF,
            UserRole::HeadTeacher => UserRole::HEAD_TEACHER,
            UserRole::Pending => UserRole::PENDING,
        }
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: student, teacher, parent, staff, headteacher, pending"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::PARENT => Ok(UserRole::Parent),
            UserRole::STAFF => Ok(UserRole::Staff),
            UserRole::HEAD_TEACHER => Ok(UserRole::HeadTeacher),
            UserRole::PENDING => Ok(UserRole::Pending),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "user.ts")]
pub enum UserStatus {
    Active,    // 活跃
    Inactive,  // 非活跃
    Suspended, // 已封禁
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户状态: '{s}'. 支持的状态: active, inactive, suspended"
            ))
        })
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_blocked(&self) -> bool {
        self.status == UserStatus::Suspended
    }
}

/// 对外展示的用户摘要
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
            role: user.role,
            is_active: user.status == UserStatus::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_strings() {
        for role in UserRole::all_roles() {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), **role);
        }
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_groups() {
        assert!(UserRole::HeadTeacher.is_staff());
        assert!(UserRole::Staff.is_staff());
        assert!(!UserRole::Teacher.is_staff());
        assert!(UserRole::Teacher.is_teaching());
        assert!(!UserRole::Student.is_teaching());
        assert!(!UserRole::assignable_roles().contains(&&UserRole::Pending));
    }

    #[test]
    fn test_role_deserialize_rejects_unknown() {
        let role: UserRole = serde_json::from_str("\"headteacher\"").unwrap();
        assert_eq!(role, UserRole::HeadTeacher);
        assert!(serde_json::from_str::<UserRole>("\"principal\"").is_err());
    }
}
