// src/models/system_log.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Registro de auditoria (append-only).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SystemLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    #[schema(example = "operador@grupothermas.com.br")]
    pub user_email: Option<String>,
    #[schema(example = "asaas_cliente_criado")]
    pub acao: String,
    #[schema(example = "venda")]
    pub entidade: String,
    pub entidade_id: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub dados_anteriores: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub dados_novos: Option<Value>,
    #[schema(example = "177.10.20.30")]
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct NewSystemLog {
    // Preenchidos pelo servidor a partir do token e da requisição
    #[serde(skip)]
    pub user_id: Option<Uuid>,
    #[serde(skip)]
    pub user_email: Option<String>,

    #[validate(length(min = 1, message = "A ação é obrigatória."))]
    #[schema(example = "venda_editada")]
    pub acao: String,
    #[validate(length(min = 1, message = "A entidade é obrigatória."))]
    #[schema(example = "venda")]
    pub entidade: String,
    pub entidade_id: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub dados_anteriores: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub dados_novos: Option<Value>,

    #[serde(skip)]
    pub ip_address: Option<String>,
    #[serde(skip)]
    pub user_agent: Option<String>,
}

impl NewSystemLog {
    pub fn new(acao: &str, entidade: &str, entidade_id: impl ToString) -> Self {
        Self {
            acao: acao.to_string(),
            entidade: entidade.to_string(),
            entidade_id: Some(entidade_id.to_string()),
            ..Default::default()
        }
    }

    pub fn with_snapshots(mut self, antes: Option<Value>, depois: Option<Value>) -> Self {
        self.dados_anteriores = antes;
        self.dados_novos = depois;
        self
    }
}

/// Filtros e paginação da consulta de logs (`GET /api/logs`).
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogFilter {
    pub user_id: Option<Uuid>,
    pub acao: Option<String>,
    pub entidade: Option<String>,
    pub entidade_id: Option<String>,
    pub desde: Option<DateTime<Utc>>,
    pub ate: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl LogFilter {
    /// Página efetiva (1-based).
    pub fn page(&self) -> i64 {
        self.page.filter(|p| *p >= 1).unwrap_or(1)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
            .map(|s| s.clamp(1, MAX_PAGE_SIZE))
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.page_size()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LogPage {
    pub data: Vec<SystemLog>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_bounds() {
        let filter = LogFilter::default();
        assert_eq!((filter.page(), filter.page_size(), filter.offset()), (1, 20, 0));

        let filter = LogFilter { page: Some(3), page_size: Some(500), ..Default::default() };
        assert_eq!((filter.page(), filter.page_size(), filter.offset()), (3, 100, 200));

        let filter = LogFilter { page: Some(0), page_size: Some(0), ..Default::default() };
        assert_eq!((filter.page(), filter.page_size()), (1, 1));
    }
}
