// src/services/session_cleanup.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::common::error::AppError;

pub const DEFAULT_CLEANUP_PERIOD: Duration = Duration::from_secs(15 * 60);

#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Remove as sessões com `expires_at < now` e retorna quantas saíram.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}

/// Tarefa de fundo que limpa sessões expiradas a cada `period`.
/// O primeiro ciclo roda imediatamente; erro num ciclo não para o loop.
pub fn spawn_session_cleanup<S: SessionStore>(store: S, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match store.purge_expired(Utc::now()).await {
                Ok(0) => tracing::debug!("Nenhuma sessão expirada"),
                Ok(purged) => tracing::info!(purged, "Sessões expiradas removidas"),
                Err(e) => tracing::error!("Falha na limpeza de sessões: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[derive(Clone, Default)]
    struct FlakyStore {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SessionStore for FlakyStore {
        async fn purge_expired(&self, _now: DateTime<Utc>) -> Result<u64, AppError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                return Err(AppError::InternalServerError(anyhow::anyhow!("db offline")));
            }
            Ok(3)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_running_after_a_failed_tick() {
        let store = FlakyStore::default();
        let handle = spawn_session_cleanup(store.clone(), DEFAULT_CLEANUP_PERIOD);

        tokio::time::sleep(DEFAULT_CLEANUP_PERIOD * 2 + Duration::from_secs(1)).await;

        assert!(store.calls.load(Ordering::SeqCst) >= 3);
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn waits_a_full_period_between_ticks() {
        let store = FlakyStore::default();
        let handle = spawn_session_cleanup(store.clone(), DEFAULT_CLEANUP_PERIOD);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);

        handle.abort();
    }
}
