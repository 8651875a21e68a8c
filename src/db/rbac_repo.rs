// src/db/rbac_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, middleware::rbac::PermissionResolver};

#[derive(Clone)]
pub struct RbacRepository {
    pool: PgPool,
}

impl RbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Permissão concedida por algum cargo do usuário. Vínculo com
    /// `tenant_id` nulo vale para qualquer loja; sem tenant, só os globais contam.
    pub async fn user_has_permission(
        &self,
        user_id: Uuid,
        permission: &str,
        tenant_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM user_roles ur
                JOIN role_permissions rp ON rp.role_id = ur.role_id
                JOIN permissions p ON p.id = rp.permission_id
                WHERE ur.user_id = $1
                  AND p.name = $2
                  AND (ur.tenant_id IS NULL OR ur.tenant_id = $3)
            )
            "#,
        )
        .bind(user_id)
        .bind(permission)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Ignora `user_roles.tenant_id`: vínculo em qualquer tenant conta.
    pub async fn user_in_role(&self, user_id: Uuid, role: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM user_roles ur
                JOIN roles r ON r.id = ur.role_id
                WHERE ur.user_id = $1
                  AND r.name = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

#[async_trait]
impl PermissionResolver for RbacRepository {
    async fn has_permission(
        &self,
        user_id: Uuid,
        permission: &str,
        tenant_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        self.user_has_permission(user_id, permission, tenant_id).await
    }

    async fn is_in_role(&self, user_id: Uuid, role: &str) -> Result<bool, AppError> {
        self.user_in_role(user_id, role).await
    }
}
