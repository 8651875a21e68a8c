// src/handlers/auth.rs

use axum::{response::IntoResponse, Extension, Json};

use crate::{
    common::error::AppError,
    middleware::rbac::{Authenticated, RequireAccess},
    models::auth::{MeResponse, Principal},
};

// GET /api/me
pub async fn get_me(
    _guard: RequireAccess<Authenticated>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, AppError> {
    // O guardião já garantiu um identificador válido
    let user_id = principal.user_id().ok_or(AppError::InvalidToken)?;

    Ok(Json(MeResponse {
        user_id,
        tenant_id: principal.tenant_id(),
        roles: principal.roles().to_vec(),
    }))
}
