use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, SchoolError};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    profiles::{entities::ProfileRecord, requests::ProfileChanges},
    users::{
        entities::{User, UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::{RoleCount, UserListResponse},
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

fn new_user_model(req: CreateUserRequest) -> ActiveModel {
    let now = chrono::Utc::now().timestamp();

    ActiveModel {
        email: Set(req.email),
        first_name: Set(req.first_name),
        last_name: Set(req.last_name),
        password_hash: Set(req.password),
        role: Set(req.role.to_string()),
        status: Set(UserStatus::Active.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

/// 在事务中插入用户
pub(super) async fn insert_user_in(
    txn: &DatabaseTransaction,
    req: CreateUserRequest,
) -> Result<User> {
    let result = new_user_model(req)
        .insert(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("创建用户失败: {e}")))?;

    Ok(result.into_user())
}

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let result = new_user_model(req)
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = like_contains(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Email.like(pattern.clone()))
                    .add(Column::FirstName.like(pattern.clone()))
                    .add(Column::LastName.like(pattern.clone())),
            );
        }

        // 角色筛选
        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        // 状态筛选
        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户页数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 按角色列出用户
    pub async fn list_users_by_role_impl(&self, role: UserRole) -> Result<Vec<User>> {
        let users = Users::find()
            .filter(Column::Role.eq(role.to_string()))
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::LastName)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 统计各角色人数
    pub async fn count_users_by_role_impl(&self) -> Result<Vec<RoleCount>> {
        let mut counts = Vec::with_capacity(UserRole::all_roles().len());

        for role in UserRole::all_roles() {
            let count = Users::find()
                .filter(Column::Role.eq(role.to_string()))
                .count(&self.db)
                .await
                .map_err(|e| {
                    SchoolError::database_operation(format!("统计角色 {role} 人数失败: {e}"))
                })?;
            counts.push(RoleCount {
                role: **role,
                count: count as i64,
            });
        }

        Ok(counts)
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }

        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }

        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }

        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }

        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新用户失败: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    /// 删除用户，资料、借阅等关联记录由外键级联删除
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }

    /// 注册学生。任一步失败整个事务回滚，不会留下没有资料的学生账号
    pub async fn register_student_impl(
        &self,
        req: CreateUserRequest,
        profile: ProfileChanges,
        classroom_id: Option<i64>,
    ) -> Result<(User, ProfileRecord, i64)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        let user = insert_user_in(&txn, req).await?;
        let mut record = super::profiles::upsert_profile_in(&txn, user.id, profile).await?;

        let mut subjects_assigned = 0;
        if let Some(classroom_id) = classroom_id {
            let (_, synced) =
                super::academic::enroll_student_in(&txn, user.id, classroom_id).await?;
            subjects_assigned = synced;
            record.classroom_id = Some(classroom_id);
        }

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((user, record, subjects_assigned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, first_name: &str, role: UserRole) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: "Otieno".to_string(),
            password: "hash".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        storage
            .create_user_impl(new_user("mary@school.test", "Mary", UserRole::Teacher))
            .await
            .unwrap();
        storage
            .create_user_impl(new_user("jo_an@school.test", "Joan", UserRole::Student))
            .await
            .unwrap();

        let found = storage
            .list_users_with_pagination_impl(UserListQuery {
                search: Some("jo_".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].first_name, "Joan");

        let all = storage
            .list_users_with_pagination_impl(UserListQuery {
                search: Some("%".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(all.items.is_empty());
    }

    #[tokio::test]
    async fn test_counts_cover_every_role() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        storage
            .create_user_impl(new_user("a@school.test", "A", UserRole::Student))
            .await
            .unwrap();
        storage
            .create_user_impl(new_user("b@school.test", "B", UserRole::Student))
            .await
            .unwrap();
        storage
            .create_user_impl(new_user("c@school.test", "C", UserRole::Pending))
            .await
            .unwrap();

        let counts = storage.count_users_by_role_impl().await.unwrap();
        assert_eq!(counts.len(), UserRole::all_roles().len());
        let of = |role: UserRole| counts.iter().find(|c| c.role == role).unwrap().count;
        assert_eq!(of(UserRole::Student), 2);
        assert_eq!(of(UserRole::Pending), 1);
        assert_eq!(of(UserRole::HeadTeacher), 0);
    }

    #[tokio::test]
    async fn test_role_and_status_update() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let user = storage
            .create_user_impl(new_user("p@school.test", "Peter", UserRole::Pending))
            .await
            .unwrap();

        let updated = storage
            .update_user_impl(
                user.id,
                UpdateUserRequest {
                    role: Some(UserRole::Teacher),
                    status: Some(UserStatus::Suspended),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, UserRole::Teacher);
        assert!(updated.is_blocked());

        assert!(
            storage
                .update_user_impl(9999, UpdateUserRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_delete_removes_profile() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let user = storage
            .create_user_impl(new_user("t@school.test", "Tom", UserRole::Teacher))
            .await
            .unwrap();
        storage
            .upsert_profile_impl(
                user.id,
                ProfileChanges {
                    department: Some("Science".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(storage.delete_user_impl(user.id).await.unwrap());
        assert!(storage.get_profile_impl(user.id).await.unwrap().is_none());
        assert!(!storage.delete_user_impl(user.id).await.unwrap());
    }
}
