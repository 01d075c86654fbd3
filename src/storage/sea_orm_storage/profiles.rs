use super::SeaOrmStorage;
use crate::entity::profiles::{ActiveModel, Column, Entity as Profiles};
use crate::errors::{Result, SchoolError};
use crate::models::profiles::{entities::ProfileRecord, requests::ProfileChanges};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

/// 把非空字段写入 ActiveModel
fn apply_changes(model: &mut ActiveModel, changes: ProfileChanges) {
    if let Some(address) = changes.address {
        model.address = Set(Some(address));
    }
    if let Some(phone_number) = changes.phone_number {
        model.phone_number = Set(Some(phone_number));
    }
    if let Some(gender) = changes.gender {
        model.gender = Set(Some(gender.to_string()));
    }
    if let Some(department) = changes.department {
        model.department = Set(Some(department));
    }
    if let Some(position) = changes.position {
        model.position = Set(Some(position));
    }
    if let Some(relation) = changes.relation_to_student {
        model.relation_to_student = Set(Some(relation));
    }
    if let Some(guardian_phone) = changes.guardian_phone {
        model.guardian_phone = Set(Some(guardian_phone));
    }
    if let Some(avatar_token) = changes.avatar_token {
        model.avatar_token = Set(Some(avatar_token));
    }
}

/// 创建或更新资料
pub(super) async fn upsert_profile_in(
    txn: &DatabaseTransaction,
    user_id: i64,
    changes: ProfileChanges,
) -> Result<ProfileRecord> {
    let now = chrono::Utc::now().timestamp();

    let existing = Profiles::find()
        .filter(Column::UserId.eq(user_id))
        .one(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("查询用户资料失败: {e}")))?;

    let saved = match existing {
        Some(current) => {
            let mut model: ActiveModel = current.into();
            apply_changes(&mut model, changes);
            model.updated_at = Set(now);
            model
                .update(txn)
                .await
                .map_err(|e| SchoolError::database_operation(format!("更新用户资料失败: {e}")))?
        }
        None => {
            let mut model = ActiveModel {
                user_id: Set(user_id),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            apply_changes(&mut model, changes);
            model
                .insert(txn)
                .await
                .map_err(|e| SchoolError::database_operation(format!("创建用户资料失败: {e}")))?
        }
    };

    Ok(saved.into_record())
}

/// 设置学生所在班级，资料不存在时一并创建
pub(super) async fn set_profile_classroom_in(
    txn: &DatabaseTransaction,
    user_id: i64,
    classroom_id: i64,
) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    let updated = Profiles::update_many()
        .col_expr(Column::ClassroomId, sea_orm::sea_query::Expr::value(classroom_id))
        .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
        .filter(Column::UserId.eq(user_id))
        .exec(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("更新学生班级失败: {e}")))?;

    if updated.rows_affected == 0 {
        ActiveModel {
            user_id: Set(user_id),
            classroom_id: Set(Some(classroom_id)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("创建用户资料失败: {e}")))?;
    }

    Ok(())
}

impl SeaOrmStorage {
    /// 获取用户资料
    pub async fn get_profile_impl(&self, user_id: i64) -> Result<Option<ProfileRecord>> {
        let result = Profiles::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户资料失败: {e}")))?;

        Ok(result.map(|m| m.into_record()))
    }

    /// 创建或更新用户资料
    pub async fn upsert_profile_impl(
        &self,
        user_id: i64,
        changes: ProfileChanges,
    ) -> Result<ProfileRecord> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        let record = upsert_profile_in(&txn, user_id, changes).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::entities::Gender;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};

    #[tokio::test]
    async fn test_upsert_keeps_untouched_fields() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let user = storage
            .create_user_impl(CreateUserRequest {
                email: "grace@school.test".to_string(),
                first_name: "Grace".to_string(),
                last_name: "Wanjiru".to_string(),
                password: "hash".to_string(),
                role: UserRole::Teacher,
            })
            .await
            .unwrap();

        assert!(storage.get_profile_impl(user.id).await.unwrap().is_none());

        let created = storage
            .upsert_profile_impl(
                user.id,
                ProfileChanges {
                    department: Some("Languages".to_string()),
                    gender: Some(Gender::Female),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(created.department.as_deref(), Some("Languages"));

        let updated = storage
            .upsert_profile_impl(
                user.id,
                ProfileChanges {
                    phone_number: Some("0700123456".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.department.as_deref(), Some("Languages"));
        assert_eq!(updated.gender, Some(Gender::Female));
        assert_eq!(updated.phone_number.as_deref(), Some("0700123456"));
    }
}
