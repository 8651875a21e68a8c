// src/db/inventory_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{NewProduct, NewStockTransaction, Product, StockTransaction},
    services::inventory_service::{StockLedger, StockLedgerTx},
};

const PRODUCT_COLUMNS: &str = "id, tenant_id, name, barcode, description, price, stock, min_stock, \
                               is_active, created_at, updated_at";

const TRANSACTION_COLUMNS: &str = "id, tenant_id, product_id, quantity_change, previous_stock, \
                                   new_stock, reason, created_at";

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Funções de "Leitura"
    // ---

    pub async fn find_active_product<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        product_id: i64,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE id = $1 AND tenant_id = $2 AND is_active = true"
        ))
        .bind(product_id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    /// Igual a `find_active_product`, mas trava a linha até o fim da transação.
    pub async fn lock_active_product<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        product_id: i64,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE id = $1 AND tenant_id = $2 AND is_active = true \
             FOR UPDATE"
        ))
        .bind(product_id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    // ---
    // Funções de "Escrita" (rodam dentro de uma transação via Executor)
    // ---

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        new_product: &NewProduct,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (tenant_id, name, barcode, description, price, stock, min_stock) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(tenant_id)
        .bind(&new_product.name)
        .bind(new_product.barcode.as_deref())
        .bind(new_product.description.as_deref())
        .bind(new_product.price)
        .bind(new_product.initial_stock)
        .bind(new_product.min_stock)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    pub async fn set_product_stock<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        product_id: i64,
        new_stock: i32,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE products SET stock = $1, updated_at = $2 \
             WHERE id = $3 AND tenant_id = $4 AND is_active = true",
        )
        .bind(new_stock)
        .bind(updated_at)
        .bind(product_id)
        .bind(tenant_id)
        .execute(executor)
        .await?;

        // Inativo ou de outro tenant
        if result.rows_affected() == 0 {
            return Err(AppError::ProductNotFound(product_id));
        }
        Ok(())
    }

    /// Registra uma movimentação no histórico (auditoria, só INSERT).
    pub async fn insert_stock_transaction<'e, E>(
        &self,
        executor: E,
        row: &NewStockTransaction,
    ) -> Result<StockTransaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let recorded = sqlx::query_as::<_, StockTransaction>(&format!(
            "INSERT INTO stock_transactions \
             (tenant_id, product_id, quantity_change, previous_stock, new_stock, reason, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {TRANSACTION_COLUMNS}"
        ))
        .bind(row.tenant_id)
        .bind(row.product_id)
        .bind(row.quantity_change)
        .bind(row.previous_stock)
        .bind(row.new_stock)
        .bind(&row.reason)
        .bind(row.created_at)
        .fetch_one(executor)
        .await?;
        Ok(recorded)
    }
}

// ---
// Livro-razão de estoque sobre Postgres
// ---

pub struct PgStockTx {
    repo: InventoryRepository,
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StockLedger for InventoryRepository {
    type Tx = PgStockTx;

    async fn find_active_product(
        &self,
        tenant_id: Uuid,
        product_id: i64,
    ) -> Result<Option<Product>, AppError> {
        InventoryRepository::find_active_product(self, &self.pool, tenant_id, product_id).await
    }

    async fn list_active_products(&self, tenant_id: Uuid) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE tenant_id = $1 AND is_active = true ORDER BY name ASC"
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    // Mesmo critério de `Product::is_low_stock`: o ponto de reposição entra.
    async fn list_low_stock_products(&self, tenant_id: Uuid) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE tenant_id = $1 AND is_active = true AND stock <= min_stock \
             ORDER BY stock ASC, name ASC"
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn deactivate_product(
        &self,
        tenant_id: Uuid,
        product_id: i64,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE products SET is_active = false, updated_at = $3 \
             WHERE id = $1 AND tenant_id = $2 AND is_active = true",
        )
        .bind(product_id)
        .bind(tenant_id)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn transactions_by_product(
        &self,
        tenant_id: Uuid,
        product_id: i64,
    ) -> Result<Vec<StockTransaction>, AppError> {
        let rows = sqlx::query_as::<_, StockTransaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM stock_transactions \
             WHERE tenant_id = $1 AND product_id = $2 ORDER BY created_at DESC, id DESC"
        ))
        .bind(tenant_id)
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // BETWEEN é fechado nas duas pontas, como `StockTransaction::recorded_within`.
    async fn transactions_between(
        &self,
        tenant_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<StockTransaction>, AppError> {
        let rows = sqlx::query_as::<_, StockTransaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM stock_transactions \
             WHERE tenant_id = $1 AND created_at BETWEEN $2 AND $3 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(tenant_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn begin(&self) -> Result<PgStockTx, AppError> {
        let tx = self.pool.begin().await?;
        Ok(PgStockTx { repo: self.clone(), tx })
    }
}

#[async_trait]
impl StockLedgerTx for PgStockTx {
    async fn lock_active_product(
        &mut self,
        tenant_id: Uuid,
        product_id: i64,
    ) -> Result<Option<Product>, AppError> {
        self.repo
            .lock_active_product(&mut *self.tx, tenant_id, product_id)
            .await
    }

    async fn insert_product(
        &mut self,
        tenant_id: Uuid,
        new_product: &NewProduct,
    ) -> Result<Product, AppError> {
        self.repo
            .create_product(&mut *self.tx, tenant_id, new_product)
            .await
    }

    async fn set_product_stock(
        &mut self,
        tenant_id: Uuid,
        product_id: i64,
        new_stock: i32,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.repo
            .set_product_stock(&mut *self.tx, tenant_id, product_id, new_stock, updated_at)
            .await
    }

    async fn record_transaction(
        &mut self,
        row: &NewStockTransaction,
    ) -> Result<StockTransaction, AppError> {
        self.repo.insert_stock_transaction(&mut *self.tx, row).await
    }

    async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
