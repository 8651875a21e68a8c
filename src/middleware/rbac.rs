// src/middleware/rbac.rs

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;
use uuid::Uuid;

use crate::{
    common::error::{AppError, AuthzError},
    config::AppState,
    models::{auth::Principal, rbac::AccessRequirement},
};

/// Colaborador que resolve permissões e cargos.
///
/// Ausência de concessão é `Ok(false)`, nunca erro.
#[async_trait]
pub trait PermissionResolver: Send + Sync {
    async fn has_permission(
        &self,
        user_id: Uuid,
        permission: &str,
        tenant_id: Option<Uuid>,
    ) -> Result<bool, AppError>;

    /// Cargo global do usuário: não recebe tenant, então quem é `Admin` em um
    /// tenant passa na checagem de cargo em todos.
    async fn is_in_role(&self, user_id: Uuid, role: &str) -> Result<bool, AppError>;
}

/// Decide se o principal atende ao requisito.
///
/// Permissões: todas, na ordem declarada, parando na primeira que falta.
/// Cargos: qualquer um, parando no primeiro que confere.
/// Requisito combinado avalia permissões antes de cargos.
pub async fn authorize(
    principal: Option<&Principal>,
    requirement: &AccessRequirement,
    resolver: Option<&dyn PermissionResolver>,
) -> Result<(), AuthzError> {
    if requirement.public {
        return Ok(());
    }

    let principal = principal.ok_or(AuthzError::Unauthenticated)?;
    let user_id = principal.user_id().ok_or(AuthzError::Unauthenticated)?;

    if requirement.permissions.is_empty() && requirement.roles.is_empty() {
        return Ok(());
    }

    let resolver = resolver.ok_or_else(|| {
        AuthzError::Internal("permission resolver is not registered".to_string())
    })?;

    for permission in requirement.permissions {
        let granted = resolver
            .has_permission(user_id, permission, principal.tenant_id())
            .await
            .map_err(|e| AuthzError::Internal(e.to_string()))?;

        if !granted {
            tracing::debug!(%user_id, permission, "acesso negado: permissão ausente");
            return Err(AuthzError::Forbidden(format!("missing permission: {}", permission)));
        }
    }

    if requirement.roles.is_empty() {
        return Ok(());
    }

    // Sem tenant: o isolamento por tenant vem das permissões, não dos cargos.
    for role in requirement.roles {
        let member = resolver
            .is_in_role(user_id, role)
            .await
            .map_err(|e| AuthzError::Internal(e.to_string()))?;

        if member {
            return Ok(());
        }
    }

    tracing::debug!(%user_id, roles = ?requirement.roles, "acesso negado: nenhum cargo");
    Err(AuthzError::Forbidden(format!(
        "missing role, required one of: [{}]",
        requirement.roles.join(", ")
    )))
}

/// O Trait que define o requisito de uma rota.
pub trait AccessPolicy: Send + Sync + 'static {
    const REQUIREMENT: AccessRequirement;
}

/// O Extractor (Guardião). Colocado na assinatura do handler, roda antes dele.
pub struct RequireAccess<P>(pub PhantomData<P>);

impl<P, S> FromRequestParts<S> for RequireAccess<P>
where
    P: AccessPolicy,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthzError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let principal = parts.extensions.get::<Principal>();

        authorize(
            principal,
            &P::REQUIREMENT,
            app_state.permission_resolver.as_deref(),
        )
        .await?;

        Ok(RequireAccess(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS REQUISITOS (TIPOS)
// ---

pub const PERM_INVENTORY_READ: &str = "inventory.read";
pub const PERM_INVENTORY_WRITE: &str = "inventory.write";

pub struct Authenticated;
impl AccessPolicy for Authenticated {
    const REQUIREMENT: AccessRequirement = AccessRequirement::authenticated();
}

pub struct InventoryRead;
impl AccessPolicy for InventoryRead {
    const REQUIREMENT: AccessRequirement = AccessRequirement::permissions(&[PERM_INVENTORY_READ]);
}

pub struct InventoryWrite;
impl AccessPolicy for InventoryWrite {
    const REQUIREMENT: AccessRequirement = AccessRequirement::permissions(&[PERM_INVENTORY_WRITE]);
}

// Ajuste manual de saldo: permissão de escrita E cargo de farmácia.
// Só a permissão é checada no tenant do principal; o cargo vale em qualquer tenant.
pub struct StockAdjust;
impl AccessPolicy for StockAdjust {
    const REQUIREMENT: AccessRequirement =
        AccessRequirement::permissions_and_roles(&[PERM_INVENTORY_WRITE], &["Admin", "Pharmacist"]);
}
