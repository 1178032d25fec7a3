// src/db.rs
//
// Contratos estreitos de acesso a dados. Os serviços dependem destes traits;
// as implementações Postgres ficam nos `*_repo.rs`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        sale::{NewSale, Sale, StatusTotal},
        system_log::{LogFilter, LogPage, NewSystemLog, SystemLog},
    },
};

pub mod integration_repo;
pub use integration_repo::IntegrationRepository;
pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod system_log_repo;
pub use system_log_repo::SystemLogRepository;

/// Fornece a chave ativa de um sistema integrado (ex: "asaas").
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// `AppError::ConfigurationError` quando não há linha ativa com chave preenchida.
    async fn get_active_key(&self, system_name: &str) -> Result<String, AppError>;
}

#[async_trait]
pub trait SalesStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sale>, AppError>;
    async fn list(&self, status: Option<&str>) -> Result<Vec<Sale>, AppError>;
    async fn create(&self, sale: &NewSale) -> Result<Sale, AppError>;
    /// `true` se a linha existia.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    async fn list_ids(&self) -> Result<Vec<Uuid>, AppError>;
    async fn list_ids_by_customer(&self, cliente_id: &str) -> Result<Vec<Uuid>, AppError>;

    /// Grava (ou limpa, com `None`) o id do cliente no gateway e carimba `updated_at`.
    async fn set_remote_customer(&self, id: Uuid, customer_id: Option<&str>) -> Result<(), AppError>;
    async fn set_remote_charge(&self, id: Uuid, charge_id: Option<&str>) -> Result<(), AppError>;

    // Reconciliação via webhook: o bool diz se alguma venda foi alterada.
    async fn mark_paid(&self, id: Uuid, charge_id: &str, paid_on: NaiveDate) -> Result<bool, AppError>;
    async fn mark_signed(&self, id: Uuid) -> Result<Option<Uuid>, AppError>;
    async fn mark_signed_by_document(&self, document_id: &str) -> Result<Option<Uuid>, AppError>;
    async fn attach_contract(
        &self,
        id: Uuid,
        contract_url: &str,
        document_id: Option<&str>,
        signature_status: &str,
    ) -> Result<bool, AppError>;

    async fn status_totals(&self) -> Result<Vec<StatusTotal>, AppError>;
}

#[async_trait]
pub trait SystemLogStore: Send + Sync {
    async fn insert(&self, entry: &NewSystemLog) -> Result<SystemLog, AppError>;
    async fn query(&self, filter: &LogFilter) -> Result<LogPage, AppError>;
    async fn count_since(&self, since: DateTime<Utc>) -> Result<i64, AppError>;
}
