// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- Produto (catálogo da farmácia) ---
// `stock` só muda junto com um StockTransaction na mesma transação.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub tenant_id: Uuid,
    pub name: String,
    pub barcode: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub min_stock: i32, // Ponto de reposição
    pub is_active: bool, // Soft delete
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// No ponto de reposição conta como estoque baixo.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }
}

/// Dados para cadastrar um produto novo.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub barcode: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub initial_stock: i32,
    pub min_stock: i32,
}

// --- Histórico de estoque (auditoria, só inserção) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockTransaction {
    pub id: i64,
    pub tenant_id: Uuid,
    pub product_id: i64,
    pub quantity_change: i32, // novo - anterior
    pub previous_stock: i32,
    pub new_stock: i32,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl StockTransaction {
    /// Intervalo fechado: `from` e `to` entram.
    pub fn recorded_within(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        from <= self.created_at && self.created_at <= to
    }
}

/// Linha de auditoria ainda não persistida (o `id` vem do banco).
#[derive(Debug, Clone, PartialEq)]
pub struct NewStockTransaction {
    pub tenant_id: Uuid,
    pub product_id: i64,
    pub quantity_change: i32,
    pub previous_stock: i32,
    pub new_stock: i32,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl NewStockTransaction {
    /// Monta a linha a partir do saldo atual e do saldo desejado.
    pub fn for_change(
        product: &Product,
        new_stock: i32,
        reason: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            tenant_id: product.tenant_id,
            product_id: product.id,
            quantity_change: new_stock - product.stock,
            previous_stock: product.stock,
            new_stock,
            reason: reason.to_string(),
            created_at,
        }
    }
}
