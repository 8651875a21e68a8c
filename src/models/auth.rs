// src/models/auth.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Estrutura de dados ("claims") dentro do JWT emitido pelo serviço de identidade
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    // Claim principal de identificação (NameIdentifier)
    #[serde(rename = "nameid", default, skip_serializing_if = "Option::is_none")]
    pub name_id: Option<String>,
    // Subject, usado quando o nameid não vem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<Uuid>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: usize, // Expiration time
}

/// Quem está chamando. Resolvido uma vez por requisição a partir do token.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub claims: Claims,
}

impl Principal {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    /// Identificador estável do usuário: `nameid`, senão `sub`.
    /// Um claim presente mas que não é UUID conta como ausente.
    pub fn user_id(&self) -> Option<Uuid> {
        self.claims
            .name_id
            .as_deref()
            .and_then(|v| Uuid::parse_str(v).ok())
            .or_else(|| {
                self.claims
                    .sub
                    .as_deref()
                    .and_then(|v| Uuid::parse_str(v).ok())
            })
    }

    pub fn tenant_id(&self) -> Option<Uuid> {
        self.claims.tenant_id
    }

    pub fn roles(&self) -> &[String] {
        &self.claims.roles
    }
}

// Resposta do GET /api/me
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub roles: Vec<String>,
}
