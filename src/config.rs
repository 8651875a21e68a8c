// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};

use crate::{
    db::{InventoryRepository, RbacRepository},
    middleware::rbac::PermissionResolver,
    services::{
        auth::AuthService,
        inventory_service::{InventoryService, StockService},
        session_cleanup::DEFAULT_CLEANUP_PERIOD,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub session_cleanup_interval: Duration,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(v) => v.parse().context("DB_MAX_CONNECTIONS inválido")?,
            Err(_) => 5,
        };

        let session_cleanup_interval = match env::var("SESSION_CLEANUP_INTERVAL_SECS") {
            Ok(v) => Duration::from_secs(v.parse().context("SESSION_CLEANUP_INTERVAL_SECS inválido")?),
            Err(_) => DEFAULT_CLEANUP_PERIOD,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            db_max_connections,
            session_cleanup_interval,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    // `None` = colaborador não registrado; o guardião responde com erro interno
    pub permission_resolver: Option<Arc<dyn PermissionResolver>>,
    pub inventory_service: InventoryService<InventoryRepository>,
    pub stock_service: StockService<InventoryRepository>,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, settings.jwt_secret.clone()))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, jwt_secret: String) -> Self {
        let inventory_repo = InventoryRepository::new(db_pool.clone());
        let rbac_repo = RbacRepository::new(db_pool.clone());

        Self {
            auth_service: AuthService::new(jwt_secret),
            permission_resolver: Some(Arc::new(rbac_repo)),
            inventory_service: InventoryService::new(inventory_repo.clone()),
            stock_service: StockService::new(inventory_repo),
            db_pool,
        }
    }
}
