// src/models/integration.rs

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Nome do sistema do gateway de pagamentos em `configuracoes_integracao`.
pub const ASAAS: &str = "asaas";

// Linha de `configuracoes_integracao`. Nunca é serializada para fora: carrega o segredo.
#[derive(Debug, Clone, FromRow)]
pub struct IntegrationConfig {
    pub id: Uuid,
    pub sistema: String,
    pub api_key: Option<String>,
    pub ativo: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl IntegrationConfig {
    /// A chave só vale se a linha estiver ativa e a chave não for vazia.
    pub fn usable_key(&self) -> Option<&str> {
        if !self.ativo {
            return None;
        }
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}
