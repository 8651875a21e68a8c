// src/models/rbac.rs

/// Requisito de acesso declarado estaticamente por rota.
///
/// `permissions`: todas são obrigatórias (E).
/// `roles`: basta uma (OU).
/// Lista vazia não exige nada daquele lado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRequirement {
    pub public: bool,
    pub permissions: &'static [&'static str],
    pub roles: &'static [&'static str],
}

impl AccessRequirement {
    pub const fn public() -> Self {
        Self { public: true, permissions: &[], roles: &[] }
    }

    /// Só exige usuário autenticado.
    pub const fn authenticated() -> Self {
        Self { public: false, permissions: &[], roles: &[] }
    }

    pub const fn permissions(permissions: &'static [&'static str]) -> Self {
        Self { public: false, permissions, roles: &[] }
    }

    pub const fn roles(roles: &'static [&'static str]) -> Self {
        Self { public: false, permissions: &[], roles }
    }

    pub const fn permissions_and_roles(
        permissions: &'static [&'static str],
        roles: &'static [&'static str],
    ) -> Self {
        Self { public: false, permissions, roles }
    }
}
