//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use pharmacy_backend::{
    config::{AppState, Settings},
    create_router,
    db::SessionRepository,
    services::session_cleanup::spawn_session_cleanup,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Sem configuração válida a aplicação não deve iniciar.
    let settings = Settings::from_env()?;
    let app_state = AppState::new(&settings).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    spawn_session_cleanup(
        SessionRepository::new(app_state.db_pool.clone()),
        settings.session_cleanup_interval,
    );

    let app = create_router(app_state);

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
