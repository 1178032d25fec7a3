// src/db/integration_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::ConfigProvider,
    models::integration::IntegrationConfig,
};

// Leitura de `configuracoes_integracao`. Somente leitura.
#[derive(Clone)]
pub struct IntegrationRepository {
    pool: PgPool,
}

impl IntegrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_active(&self, system_name: &str) -> Result<Option<IntegrationConfig>, AppError> {
        let config = sqlx::query_as::<_, IntegrationConfig>(
            r#"
            SELECT id, sistema, api_key, ativo, created_at, updated_at
            FROM configuracoes_integracao
            WHERE sistema = $1 AND ativo = true
            ORDER BY updated_at DESC NULLS LAST
            LIMIT 1
            "#,
        )
        .bind(system_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(config)
    }
}

#[async_trait]
impl ConfigProvider for IntegrationRepository {
    async fn get_active_key(&self, system_name: &str) -> Result<String, AppError> {
        self.find_active(system_name)
            .await?
            .as_ref()
            .and_then(IntegrationConfig::usable_key)
            .map(str::to_string)
            .ok_or_else(|| AppError::ConfigurationError(format!(
                "nenhuma chave ativa para o sistema '{}'",
                system_name
            )))
    }
}
