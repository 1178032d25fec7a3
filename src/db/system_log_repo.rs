// src/db/system_log_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    db::SystemLogStore,
    models::system_log::{LogFilter, LogPage, NewSystemLog, SystemLog},
};

#[derive(Clone)]
pub struct SystemLogRepository {
    pool: PgPool,
}

impl SystemLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Aplica os filtros opcionais como `AND ...` ao builder.
fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &'a LogFilter) {
    builder.push(" WHERE 1 = 1");

    if let Some(user_id) = filter.user_id {
        builder.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(acao) = filter.acao.as_deref() {
        builder.push(" AND acao = ").push_bind(acao);
    }
    if let Some(entidade) = filter.entidade.as_deref() {
        builder.push(" AND entidade = ").push_bind(entidade);
    }
    if let Some(entidade_id) = filter.entidade_id.as_deref() {
        builder.push(" AND entidade_id = ").push_bind(entidade_id);
    }
    if let Some(desde) = filter.desde {
        builder.push(" AND created_at >= ").push_bind(desde);
    }
    if let Some(ate) = filter.ate {
        builder.push(" AND created_at <= ").push_bind(ate);
    }
}

#[async_trait]
impl SystemLogStore for SystemLogRepository {
    async fn insert(&self, entry: &NewSystemLog) -> Result<SystemLog, AppError> {
        let log = sqlx::query_as::<_, SystemLog>(
            r#"
            INSERT INTO system_logs (
                user_id, user_email, acao, entidade, entidade_id,
                dados_anteriores, dados_novos, ip_address, user_agent
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.user_email)
        .bind(&entry.acao)
        .bind(&entry.entidade)
        .bind(&entry.entidade_id)
        .bind(&entry.dados_anteriores)
        .bind(&entry.dados_novos)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .fetch_one(&self.pool)
        .await?;

        Ok(log)
    }

    async fn query(&self, filter: &LogFilter) -> Result<LogPage, AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM system_logs");
        push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM system_logs");
        push_filters(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(filter.page_size())
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let data = select
            .build_query_as::<SystemLog>()
            .fetch_all(&self.pool)
            .await?;

        Ok(LogPage {
            data,
            page: filter.page(),
            page_size: filter.page_size(),
            total,
        })
    }

    async fn count_since(&self, since: DateTime<Utc>) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM system_logs WHERE created_at >= $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
