// src/middleware/auth.rs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::config::AppState;

// Resolve o principal a partir do `Authorization: Bearer`. Não rejeita nada:
// sem token (ou com token inválido) a requisição segue sem principal e quem
// decide é o guardião da rota.
pub async fn resolve_principal(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request.headers().typed_get::<Authorization<Bearer>>();

    if let Some(auth) = bearer {
        match app_state.auth_service.validate_token(auth.token()) {
            Ok(principal) => {
                // Insere o principal nos "extensions" da requisição
                request.extensions_mut().insert(principal);
            }
            Err(e) => tracing::debug!("Requisição sem principal: {}", e),
        }
    }

    next.run(request).await
}
