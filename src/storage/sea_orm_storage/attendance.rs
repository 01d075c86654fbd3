use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{attendances, users};
use crate::errors::{Result, SchoolError};
use crate::models::{
    PaginationInfo,
    attendance::{
        requests::{AttendanceListQuery, CreateAttendanceRequest, UpdateAttendanceRequest},
        responses::{AttendanceListResponse, AttendanceView},
    },
    common::normalize_page,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    async fn build_attendance_views(
        &self,
        records: Vec<crate::entity::attendances::Model>,
    ) -> Result<Vec<AttendanceView>> {
        let ids = records.iter().map(|r| r.user_id).collect();
        let names = self.load_user_names(ids).await?;

        Ok(records
            .into_iter()
            .map(|m| {
                let attendance = m.into_attendance();
                AttendanceView {
                    user_name: names.get(&attendance.user_id).cloned().unwrap_or_default(),
                    attendance,
                }
            })
            .collect())
    }

    /// 登记考勤，每人每天一条
    pub async fn create_attendance_impl(
        &self,
        req: CreateAttendanceRequest,
        recorded_by: i64,
        today: chrono::NaiveDate,
    ) -> Result<AttendanceView> {
        if self.get_user_by_id_impl(req.user_id).await?.is_none() {
            return Err(SchoolError::not_found("User not found"));
        }

        let date = req.date.unwrap_or(today);

        let existing = Attendances::find()
            .filter(attendances::Column::UserId.eq(req.user_id))
            .filter(attendances::Column::Date.eq(date))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询考勤失败: {e}")))?;
        if existing.is_some() {
            return Err(SchoolError::validation(format!(
                "Attendance for this user on {date} already exists"
            )));
        }

        let model = AttendanceActiveModel {
            user_id: Set(req.user_id),
            classroom_id: Set(req.classroom_id),
            date: Set(date),
            status: Set(req.status.to_string()),
            remarks: Set(req.remarks),
            recorded_by: Set(Some(recorded_by)),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolError::database_operation(format!("创建考勤失败: {e}")))?;

        self.build_attendance_views(vec![model])
            .await?
            .pop()
            .ok_or_else(|| SchoolError::not_found("Attendance not found"))
    }

    pub async fn get_attendance_impl(&self, id: i64) -> Result<Option<AttendanceView>> {
        let Some(model) = Attendances::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询考勤失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.build_attendance_views(vec![model]).await?.pop())
    }

    pub async fn list_attendance_with_pagination_impl(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Attendances::find();
        if let Some(user_id) = query.user_id {
            select = select.filter(attendances::Column::UserId.eq(user_id));
        }
        if let Some(date) = query.date {
            select = select.filter(attendances::Column::Date.eq(date));
        }
        if let Some(classroom_id) = query.classroom_id {
            select = select.filter(attendances::Column::ClassroomId.eq(classroom_id));
        }
        if let Some(role) = query.user_type {
            // 按被考勤人的角色筛选
            let role_users = Users::find()
                .select_only()
                .column(users::Column::Id)
                .filter(users::Column::Role.eq(role.to_string()))
                .into_tuple::<i64>()
                .all(&self.db)
                .await
                .map_err(|e| SchoolError::database_operation(format!("查询用户失败: {e}")))?;
            select = select.filter(attendances::Column::UserId.is_in(role_users));
        }

        let paginator = select
            .order_by_desc(attendances::Column::Date)
            .order_by_desc(attendances::Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询考勤总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询考勤页数失败: {e}")))?;
        let records = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询考勤列表失败: {e}")))?;

        Ok(AttendanceListResponse {
            items: self.build_attendance_views(records).await?,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_attendance_impl(
        &self,
        id: i64,
        update: UpdateAttendanceRequest,
    ) -> Result<Option<AttendanceView>> {
        let Some(current) = Attendances::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询考勤失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: AttendanceActiveModel = current.into();
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(remarks) = update.remarks {
            model.remarks = Set(Some(remarks));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新考勤失败: {e}")))?;

        Ok(self.build_attendance_views(vec![updated]).await?.pop())
    }

    pub async fn delete_attendance_impl(&self, id: i64) -> Result<bool> {
        let result = Attendances::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除考勤失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::entities::AttendanceStatus;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use chrono::NaiveDate;

    async fn member(storage: &SeaOrmStorage, email: &str, role: UserRole) -> i64 {
        storage
            .create_user_impl(CreateUserRequest {
                email: email.to_string(),
                first_name: "Sam".to_string(),
                last_name: email.to_string(),
                password: "hash".to_string(),
                role,
            })
            .await
            .unwrap()
            .id
    }

    fn mark(user_id: i64, date: Option<NaiveDate>) -> CreateAttendanceRequest {
        CreateAttendanceRequest {
            user_id,
            classroom_id: None,
            date,
            status: AttendanceStatus::Present,
            remarks: None,
        }
    }

    #[tokio::test]
    async fn test_one_record_per_user_per_day() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let staff = member(&storage, "clerk@school.test", UserRole::Staff).await;
        let student = member(&storage, "tariq@school.test", UserRole::Student).await;
        let today = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();

        let view = storage
            .create_attendance_impl(mark(student, None), staff, today)
            .await
            .unwrap();
        assert_eq!(view.attendance.date, today);
        assert_eq!(view.attendance.recorded_by, Some(staff));

        let err = storage
            .create_attendance_impl(mark(student, Some(today)), staff, today)
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Validation(_)));

        storage
            .create_attendance_impl(mark(student, today.succ_opt()), staff, today)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_filter_by_user_type() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let staff = member(&storage, "clerk@school.test", UserRole::Staff).await;
        let student = member(&storage, "uma@school.test", UserRole::Student).await;
        let teacher = member(&storage, "victor@school.test", UserRole::Teacher).await;
        let today = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();

        for user in [student, teacher] {
            storage
                .create_attendance_impl(mark(user, None), staff, today)
                .await
                .unwrap();
        }

        let teachers = storage
            .list_attendance_with_pagination_impl(AttendanceListQuery {
                user_type: Some(UserRole::Teacher),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(teachers.items.len(), 1);
        assert_eq!(teachers.items[0].attendance.user_id, teacher);

        let missing = storage
            .create_attendance_impl(mark(9999, None), staff, today)
            .await;
        assert!(matches!(missing, Err(SchoolError::NotFound(_))));
    }
}
