use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Erro geral da aplicação (services, repositórios e handlers).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Produto {0} não encontrado")]
    ProductNotFound(i64),

    #[error("Saldo de estoque inválido: {0}")]
    InvalidStock(i32),

    #[error("Intervalo de datas inválido")]
    InvalidDateRange,

    #[error("Token sem tenant")]
    TenantRequired,

    #[error("Token inválido")]
    InvalidToken,

    // Falha dentro da transação de estoque (nada foi gravado)
    #[error("Falha ao atualizar estoque: {0}")]
    StockUpdateFailed(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::ProductNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("Produto {} não encontrado.", id))
            }
            AppError::InvalidStock(value) => (
                StatusCode::BAD_REQUEST,
                format!("O estoque não pode ser negativo ({}).", value),
            ),
            AppError::InvalidDateRange => (
                StatusCode::BAD_REQUEST,
                "A data inicial deve ser anterior à data final.".to_string(),
            ),
            AppError::TenantRequired => (
                StatusCode::BAD_REQUEST,
                "O token não identifica a loja (tenant_id).".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::StockUpdateFailed(ref reason) => {
                tracing::warn!("Atualização de estoque desfeita: {}", reason);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Não foi possível atualizar o estoque. Tente novamente.".to_string(),
                )
            }

            // DatabaseError e InternalServerError viram 500; o detalhe só vai para o log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

// Resultado negativo do filtro de autorização. Os três casos precisam
// continuar distinguíveis (401 / 403 / 500).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error("authorization unavailable: {0}")]
    Internal(String),
}

impl IntoResponse for AuthzError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthzError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated".to_string()),
            AuthzError::Forbidden(reason) => (StatusCode::FORBIDDEN, reason),
            AuthzError::Internal(detail) => {
                tracing::error!("Falha no filtro de autorização: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
