// src/services/audit_service.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    common::error::AppError,
    db::SystemLogStore,
    middleware::{auth::AuthenticatedUser, client_info::ClientInfo},
    models::system_log::{LogFilter, LogPage, NewSystemLog, SystemLog},
};

#[derive(Clone)]
pub struct AuditService {
    store: Arc<dyn SystemLogStore>,
}

impl AuditService {
    pub fn new(store: Arc<dyn SystemLogStore>) -> Self {
        Self { store }
    }

    /// Inserção explícita (`POST /api/logs`): valida e completa autor e metadados de rede.
    pub async fn insert(
        &self,
        user: &AuthenticatedUser,
        client: &ClientInfo,
        entry: NewSystemLog,
    ) -> Result<SystemLog, AppError> {
        entry.validate()?;
        self.store.insert(&stamp(entry, user, client)).await
    }

    /// Registro feito pelos próprios handlers depois de uma mutação.
    /// Uma falha aqui não desfaz nem falha a operação principal.
    pub async fn record(&self, user: &AuthenticatedUser, client: &ClientInfo, entry: NewSystemLog) {
        let acao = entry.acao.clone();
        if let Err(e) = self.store.insert(&stamp(entry, user, client)).await {
            tracing::warn!("Falha ao registrar log de auditoria '{}': {}", acao, e);
        }
    }

    pub async fn query(&self, filter: &LogFilter) -> Result<LogPage, AppError> {
        self.store.query(filter).await
    }
}

fn stamp(mut entry: NewSystemLog, user: &AuthenticatedUser, client: &ClientInfo) -> NewSystemLog {
    entry.user_id = Some(user.0.sub);
    entry.user_email = user.0.email.clone();
    entry.ip_address = client.ip.clone();
    entry.user_agent = client.user_agent.clone();
    entry
}
