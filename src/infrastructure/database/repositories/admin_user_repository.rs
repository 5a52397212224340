//! SeaORM implementation of AdminUserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use super::{db_err, insert_err};
use crate::domain::{AdminUser, AdminUserRepository, DomainResult, NewAdminUser};
use crate::infrastructure::database::entities::admin_user;

pub struct SeaOrmAdminUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmAdminUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(model: admin_user::Model) -> AdminUser {
    AdminUser {
        id: model.id,
        username: model.username,
        password_hash: model.password_hash,
        role: model.role,
        is_active: model.is_active,
        created_at: model.created_at,
        last_login_at: model.last_login_at,
    }
}

#[async_trait]
impl AdminUserRepository for SeaOrmAdminUserRepository {
    async fn insert(&self, admin: NewAdminUser) -> DomainResult<AdminUser> {
        let now = Utc::now();
        let active = admin_user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            username: Set(admin.username),
            password_hash: Set(admin.password_hash),
            role: Set(admin.role),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
        };

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| insert_err(e, "Username already exists"))?;
        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<AdminUser>> {
        let model = admin_user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<AdminUser>> {
        let model = admin_user::Entity::find()
            .filter(admin_user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn touch_last_login(&self, id: &str) -> DomainResult<()> {
        let now = Utc::now();
        let active = admin_user::ActiveModel {
            id: Set(id.to_string()),
            last_login_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        admin_user::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
