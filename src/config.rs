// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{ConfigProvider, IntegrationRepository, SalesRepository, SalesStore, SystemLogRepository, SystemLogStore},
    gateway::{asaas::DEFAULT_BASE_URL, AsaasClient, PaymentGateway},
    handlers::documents,
    services::{AuditService, ChargeService, CustomerService, DashboardService, SaleService, WebhookService},
};

// Configurações lidas do ambiente (.env em desenvolvimento)
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub asaas_base_url: String,
    pub asaas_webhook_token: Option<String>,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub run_migrations: bool,
    pub charges_default_limit: u32,
    // Hosts de onde o proxy de PDF aceita buscar; vazio desliga o proxy
    pub pdf_proxy_allowed_hosts: Vec<String>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_audience: optional("JWT_AUDIENCE"),
            asaas_base_url: optional("ASAAS_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            asaas_webhook_token: optional("ASAAS_WEBHOOK_TOKEN"),
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 5)?,
            run_migrations: parsed("RUN_MIGRATIONS", true)?,
            charges_default_limit: parsed("CHARGES_DEFAULT_LIMIT", 100)?,
            pdf_proxy_allowed_hosts: list("PDF_PROXY_ALLOWED_HOSTS"),
        })
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    optional(name).with_context(|| format!("{} deve ser definida", name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// Lista separada por vírgulas, normalizada para minúsculas
fn list(name: &str) -> Vec<String> {
    optional(name)
        .map(|raw| {
            raw.split(',')
                .map(|item| item.trim().to_lowercase())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn parsed<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional(name) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} inválida ('{}'): {}", name, raw, e)),
        None => Ok(default),
    }
}

/// Colaboradores externos do sistema: banco, configuração de integração e gateway.
pub struct Collaborators {
    pub sales: Arc<dyn SalesStore>,
    pub config: Arc<dyn ConfigProvider>,
    pub logs: Arc<dyn SystemLogStore>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub http: reqwest::Client,
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub http: reqwest::Client,
    pub sale_service: SaleService,
    pub customer_service: CustomerService,
    pub charge_service: ChargeService,
    pub webhook_service: WebhookService,
    pub audit_service: AuditService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    /// Monta o estado real: pool Postgres, repositórios e cliente do Asaas.
    pub async fn new(settings: Settings) -> anyhow::Result<(Self, PgPool)> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Falha ao criar o cliente HTTP")?;

        if settings.pdf_proxy_allowed_hosts.is_empty() {
            tracing::warn!("PDF_PROXY_ALLOWED_HOSTS vazio: o proxy de PDF vai recusar todas as URLs.");
        }
        let pdf_http = documents::pdf_client(settings.pdf_proxy_allowed_hosts.clone())
            .context("Falha ao criar o cliente HTTP do proxy de PDF")?;

        // --- Monta o gráfico de dependências ---
        let collaborators = Collaborators {
            sales: Arc::new(SalesRepository::new(db_pool.clone())),
            config: Arc::new(IntegrationRepository::new(db_pool.clone())),
            logs: Arc::new(SystemLogRepository::new(db_pool.clone())),
            gateway: Arc::new(AsaasClient::with_client(http, settings.asaas_base_url.clone())),
            http: pdf_http,
        };

        Ok((Self::assemble(settings, collaborators), db_pool))
    }

    /// Liga os serviços a colaboradores quaisquer (Postgres em produção, memória nos testes).
    pub fn assemble(settings: Settings, parts: Collaborators) -> Self {
        let customer_service = CustomerService::new(parts.sales.clone(), parts.config.clone(), parts.gateway.clone());
        let charge_service = ChargeService::new(
            parts.sales.clone(),
            parts.config.clone(),
            parts.gateway.clone(),
            settings.charges_default_limit,
        );

        Self {
            sale_service: SaleService::new(parts.sales.clone(), customer_service.clone()),
            webhook_service: WebhookService::new(parts.sales.clone()),
            audit_service: AuditService::new(parts.logs.clone()),
            dashboard_service: DashboardService::new(parts.sales, parts.logs),
            customer_service,
            charge_service,
            http: parts.http,
            settings: Arc::new(settings),
        }
    }
}
