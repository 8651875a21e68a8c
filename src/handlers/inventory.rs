// src/handlers/inventory.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{InventoryRead, InventoryWrite, RequireAccess, StockAdjust},
    models::{auth::Principal, inventory::NewProduct},
};

// ---
// Validação Customizada
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// Rotas de inventário são sempre da loja do token
fn tenant_of(principal: &Principal) -> Result<Uuid, AppError> {
    principal.tenant_id().ok_or(AppError::TenantRequired)
}

// ---
// Payload: CreateProduct
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, max = 200, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 8, max = 14, message = "Código de barras inválido."))]
    pub barcode: Option<String>,

    pub description: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    #[serde(default)]
    #[validate(range(min = 0, message = "O estoque inicial não pode ser negativo."))]
    pub initial_stock: i32,

    #[serde(default)]
    #[validate(range(min = 0, message = "O estoque mínimo não pode ser negativo."))]
    pub min_stock: i32,
}

impl From<CreateProductPayload> for NewProduct {
    fn from(payload: CreateProductPayload) -> Self {
        Self {
            name: payload.name,
            barcode: payload.barcode,
            description: payload.description,
            price: payload.price,
            initial_stock: payload.initial_stock,
            min_stock: payload.min_stock,
        }
    }
}

// POST /api/inventory/products
pub async fn create_product(
    State(app_state): State<AppState>,
    _guard: RequireAccess<InventoryWrite>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let tenant_id = tenant_of(&principal)?;

    let product = app_state
        .inventory_service
        .create_product(tenant_id, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

// GET /api/inventory/products
pub async fn list_products(
    State(app_state): State<AppState>,
    _guard: RequireAccess<InventoryRead>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = tenant_of(&principal)?;
    let products = app_state.inventory_service.list_products(tenant_id).await?;
    Ok(Json(products))
}

// GET /api/inventory/products/low-stock
pub async fn list_low_stock(
    State(app_state): State<AppState>,
    _guard: RequireAccess<InventoryRead>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = tenant_of(&principal)?;
    let products = app_state.inventory_service.list_low_stock(tenant_id).await?;
    Ok(Json(products))
}

// GET /api/inventory/products/{id}
pub async fn get_product(
    State(app_state): State<AppState>,
    _guard: RequireAccess<InventoryRead>,
    Extension(principal): Extension<Principal>,
    Path(product_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = tenant_of(&principal)?;
    let product = app_state
        .inventory_service
        .get_product(tenant_id, product_id)
        .await?;
    Ok(Json(product))
}

// DELETE /api/inventory/products/{id}
pub async fn deactivate_product(
    State(app_state): State<AppState>,
    _guard: RequireAccess<InventoryWrite>,
    Extension(principal): Extension<Principal>,
    Path(product_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = tenant_of(&principal)?;
    app_state
        .inventory_service
        .deactivate_product(tenant_id, product_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Payload: UpdateStock
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockPayload {
    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub new_stock: i32,

    #[validate(length(min = 1, max = 255, message = "Informe o motivo da alteração."))]
    pub reason: String,
}

// PUT /api/inventory/products/{id}/stock
pub async fn update_stock(
    State(app_state): State<AppState>,
    _guard: RequireAccess<StockAdjust>,
    Extension(principal): Extension<Principal>,
    Path(product_id): Path<i64>,
    Json(payload): Json<UpdateStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let tenant_id = tenant_of(&principal)?;

    let transaction = app_state
        .stock_service
        .update_stock(tenant_id, product_id, payload.new_stock, &payload.reason)
        .await?;

    Ok(Json(transaction))
}

// GET /api/inventory/products/{id}/transactions
pub async fn product_transactions(
    State(app_state): State<AppState>,
    _guard: RequireAccess<InventoryRead>,
    Extension(principal): Extension<Principal>,
    Path(product_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = tenant_of(&principal)?;
    let rows = app_state
        .inventory_service
        .transactions_for_product(tenant_id, product_id)
        .await?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct TransactionRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

// GET /api/inventory/transactions?from=...&to=...
pub async fn transactions_between(
    State(app_state): State<AppState>,
    _guard: RequireAccess<InventoryRead>,
    Extension(principal): Extension<Principal>,
    Query(range): Query<TransactionRange>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = tenant_of(&principal)?;
    let rows = app_state
        .inventory_service
        .transactions_between(tenant_id, range.from, range.to)
        .await?;
    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_values() {
        let payload = CreateProductPayload {
            name: "Soro fisiológico".into(),
            barcode: None,
            description: None,
            price: Decimal::new(-1, 0),
            initial_stock: -3,
            min_stock: 0,
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("initial_stock"));
    }

    #[test]
    fn stock_payload_needs_a_reason() {
        let payload: UpdateStockPayload =
            serde_json::from_str(r#"{"newStock": 5, "reason": ""}"#).unwrap();
        assert!(payload.validate().is_err());

        let payload: UpdateStockPayload =
            serde_json::from_str(r#"{"newStock": 5, "reason": "sale"}"#).unwrap();
        assert!(payload.validate().is_ok());
    }
}
