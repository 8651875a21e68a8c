// src/services/inventory_service.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{NewProduct, NewStockTransaction, Product, StockTransaction},
};

const INITIAL_STOCK_REASON: &str = "initial stock";

// ---
// Armazenamento do livro-razão de estoque
// ---

/// Onde moram produtos e histórico de estoque.
#[async_trait]
pub trait StockLedger: Send + Sync {
    type Tx: StockLedgerTx;

    /// Só devolve produtos ativos do tenant.
    async fn find_active_product(
        &self,
        tenant_id: Uuid,
        product_id: i64,
    ) -> Result<Option<Product>, AppError>;

    /// Ativos, por nome.
    async fn list_active_products(&self, tenant_id: Uuid) -> Result<Vec<Product>, AppError>;

    /// Ativos que satisfazem `Product::is_low_stock`.
    async fn list_low_stock_products(&self, tenant_id: Uuid) -> Result<Vec<Product>, AppError>;

    /// Soft delete. `false` se não havia produto ativo.
    async fn deactivate_product(
        &self,
        tenant_id: Uuid,
        product_id: i64,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, AppError>;

    /// Mais recentes primeiro.
    async fn transactions_by_product(
        &self,
        tenant_id: Uuid,
        product_id: i64,
    ) -> Result<Vec<StockTransaction>, AppError>;

    /// Linhas que satisfazem `StockTransaction::recorded_within`, mais recentes primeiro.
    async fn transactions_between(
        &self,
        tenant_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<StockTransaction>, AppError>;

    /// Abre a unidade de trabalho. Descartar sem `commit` desfaz tudo.
    async fn begin(&self) -> Result<Self::Tx, AppError>;
}

/// Unidade de trabalho atômica: nada fica visível antes do `commit`.
#[async_trait]
pub trait StockLedgerTx: Send {
    /// Lê o produto ativo e segura a linha até o fim da transação.
    async fn lock_active_product(
        &mut self,
        tenant_id: Uuid,
        product_id: i64,
    ) -> Result<Option<Product>, AppError>;

    async fn insert_product(
        &mut self,
        tenant_id: Uuid,
        new_product: &NewProduct,
    ) -> Result<Product, AppError>;

    async fn set_product_stock(
        &mut self,
        tenant_id: Uuid,
        product_id: i64,
        new_stock: i32,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    async fn record_transaction(
        &mut self,
        row: &NewStockTransaction,
    ) -> Result<StockTransaction, AppError>;

    async fn commit(self) -> Result<(), AppError>;
}

/// Atualização de saldo com auditoria.
///
/// O saldo anterior é lido com a linha travada dentro da própria transação,
/// então atualizações simultâneas do mesmo produto são serializadas pelo banco.
#[derive(Clone)]
pub struct StockService<L> {
    ledger: L,
}

impl<L: StockLedger> StockService<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Troca o saldo do produto por `new_stock` e grava exatamente uma linha
    /// de histórico, as duas coisas juntas ou nenhuma.
    pub async fn update_stock(
        &self,
        tenant_id: Uuid,
        product_id: i64,
        new_stock: i32,
        reason: &str,
    ) -> Result<StockTransaction, AppError> {
        if new_stock < 0 {
            return Err(AppError::InvalidStock(new_stock));
        }

        match self.apply(tenant_id, product_id, new_stock, reason).await {
            Ok(recorded) => {
                tracing::info!(
                    product_id,
                    previous = recorded.previous_stock,
                    new = recorded.new_stock,
                    reason,
                    "Estoque atualizado"
                );
                Ok(recorded)
            }
            Err(AppError::ProductNotFound(id)) => Err(AppError::ProductNotFound(id)),
            Err(e) => {
                tracing::warn!(product_id, error = %e, "Transação de estoque desfeita");
                Err(AppError::StockUpdateFailed(e.to_string()))
            }
        }
    }

    async fn apply(
        &self,
        tenant_id: Uuid,
        product_id: i64,
        new_stock: i32,
        reason: &str,
    ) -> Result<StockTransaction, AppError> {
        // Se algo falhar antes do commit, o `tx` é descartado e sofre rollback.
        let mut tx = self.ledger.begin().await?;

        let product = tx
            .lock_active_product(tenant_id, product_id)
            .await?
            .ok_or(AppError::ProductNotFound(product_id))?;

        let row = NewStockTransaction::for_change(&product, new_stock, reason, Utc::now());

        tx.set_product_stock(row.tenant_id, row.product_id, row.new_stock, row.created_at)
            .await?;
        let recorded = tx.record_transaction(&row).await?;

        tx.commit().await?;
        Ok(recorded)
    }
}

// ---
// Catálogo de produtos
// ---

#[derive(Clone)]
pub struct InventoryService<L> {
    ledger: L,
}

impl<L: StockLedger> InventoryService<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Cadastra o produto. O estoque inicial, se houver, entra no histórico
    /// na mesma transação.
    pub async fn create_product(
        &self,
        tenant_id: Uuid,
        new_product: NewProduct,
    ) -> Result<Product, AppError> {
        if new_product.initial_stock < 0 {
            return Err(AppError::InvalidStock(new_product.initial_stock));
        }

        let mut tx = self.ledger.begin().await?;

        let product = tx.insert_product(tenant_id, &new_product).await?;

        if product.stock > 0 {
            let row = NewStockTransaction {
                tenant_id,
                product_id: product.id,
                quantity_change: product.stock,
                previous_stock: 0,
                new_stock: product.stock,
                reason: INITIAL_STOCK_REASON.to_string(),
                created_at: product.created_at,
            };
            tx.record_transaction(&row).await?;
        }

        tx.commit().await?;

        tracing::info!(product_id = product.id, %tenant_id, "Produto cadastrado");
        Ok(product)
    }

    pub async fn get_product(&self, tenant_id: Uuid, product_id: i64) -> Result<Product, AppError> {
        self.ledger
            .find_active_product(tenant_id, product_id)
            .await?
            .ok_or(AppError::ProductNotFound(product_id))
    }

    pub async fn list_products(&self, tenant_id: Uuid) -> Result<Vec<Product>, AppError> {
        self.ledger.list_active_products(tenant_id).await
    }

    pub async fn list_low_stock(&self, tenant_id: Uuid) -> Result<Vec<Product>, AppError> {
        self.ledger.list_low_stock_products(tenant_id).await
    }

    /// Soft delete. Desativar de novo é `ProductNotFound`.
    pub async fn deactivate_product(&self, tenant_id: Uuid, product_id: i64) -> Result<(), AppError> {
        let changed = self
            .ledger
            .deactivate_product(tenant_id, product_id, Utc::now())
            .await?;

        if !changed {
            return Err(AppError::ProductNotFound(product_id));
        }
        tracing::info!(product_id, %tenant_id, "Produto desativado");
        Ok(())
    }

    pub async fn transactions_for_product(
        &self,
        tenant_id: Uuid,
        product_id: i64,
    ) -> Result<Vec<StockTransaction>, AppError> {
        self.ledger.transactions_by_product(tenant_id, product_id).await
    }

    pub async fn transactions_between(
        &self,
        tenant_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<StockTransaction>, AppError> {
        ensure_range(from, to)?;
        self.ledger.transactions_between(tenant_id, from, to).await
    }
}

fn ensure_range(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<(), AppError> {
    if from > to {
        return Err(AppError::InvalidDateRange);
    }
    Ok(())
}
