// tests/common/mod.rs
//
// Colaboradores em memória para os testes de integração: vendas, chave do
// Asaas, logs e um gateway que grava as chamadas recebidas.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use thermas_backend::{
    common::error::AppError,
    config::{AppState, Collaborators, Settings},
    db::{ConfigProvider, SalesStore, SystemLogStore},
    gateway::PaymentGateway,
    middleware::auth::Claims,
    models::{
        asaas::{CustomerRequest, PaymentRequest, PaymentUpdateRequest, RemoteCustomer, RemotePayment},
        sale::{signature, status, NewSale, Sale, StatusTotal},
        system_log::{LogFilter, LogPage, NewSystemLog, SystemLog},
    },
    routes::build_router,
};

pub const JWT_SECRET: &str = "test-secret";
pub const API_KEY: &str = "aact_test_key";
pub const WEBHOOK_TOKEN: &str = "whsec-test";

// --- VENDAS ---

#[derive(Default)]
pub struct InMemorySales {
    rows: Mutex<HashMap<Uuid, Sale>>,
    // Quando ligado, toda escrita falha como se o banco tivesse caído
    fail_writes: AtomicBool,
}

impl InMemorySales {
    pub fn seed(&self, sale: Sale) -> Uuid {
        let id = sale.id;
        self.rows.lock().unwrap().insert(id, sale);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<Sale> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(sqlx::Error::Protocol("conexão perdida".to_string())));
        }
        Ok(())
    }

    fn update<F>(&self, id: Uuid, change: F) -> Result<bool, AppError>
    where
        F: FnOnce(&mut Sale),
    {
        self.check_writable()?;
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id) {
            Some(sale) => {
                change(sale);
                sale.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl SalesStore for InMemorySales {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sale>, AppError> {
        Ok(self.get(id))
    }

    async fn list(&self, status_filter: Option<&str>) -> Result<Vec<Sale>, AppError> {
        let mut sales: Vec<Sale> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|s| status_filter.is_none_or(|st| s.status == st))
            .cloned()
            .collect();
        sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sales)
    }

    async fn create(&self, new_sale: &NewSale) -> Result<Sale, AppError> {
        self.check_writable()?;
        let mut sale = sale_named(&new_sale.nome_cliente);
        sale.cliente_id = new_sale.cliente_id.clone();
        sale.cpf_cnpj = new_sale.cpf_cnpj.clone();
        sale.email = new_sale.email.clone();
        sale.telefone = new_sale.telefone.clone();
        sale.tipo_contrato = new_sale.tipo_contrato.clone();
        sale.forma_pagamento = new_sale.forma_pagamento.clone();
        sale.quantidade_parcelas = new_sale.quantidade_parcelas;
        sale.valor_total = new_sale.valor_total;
        sale.data_vencimento = new_sale.data_vencimento;
        self.seed(sale.clone());
        Ok(sale)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        self.check_writable()?;
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }

    async fn list_ids(&self) -> Result<Vec<Uuid>, AppError> {
        Ok(self.rows.lock().unwrap().keys().copied().collect())
    }

    async fn list_ids_by_customer(&self, cliente_id: &str) -> Result<Vec<Uuid>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.cliente_id.as_deref() == Some(cliente_id))
            .map(|s| s.id)
            .collect())
    }

    async fn set_remote_customer(&self, id: Uuid, customer_id: Option<&str>) -> Result<(), AppError> {
        self.update(id, |s| s.asaas_customer_id = customer_id.map(str::to_string))?;
        Ok(())
    }

    async fn set_remote_charge(&self, id: Uuid, charge_id: Option<&str>) -> Result<(), AppError> {
        self.update(id, |s| s.asaas_payment_id = charge_id.map(str::to_string))?;
        Ok(())
    }

    async fn mark_paid(&self, id: Uuid, charge_id: &str, paid_on: NaiveDate) -> Result<bool, AppError> {
        self.update(id, |s| {
            s.status = status::PAGO.to_string();
            s.asaas_payment_id = Some(charge_id.to_string());
            s.data_pagamento = Some(paid_on);
        })
    }

    async fn mark_signed(&self, id: Uuid) -> Result<Option<Uuid>, AppError> {
        let found = self.update(id, |s| s.status_assinatura = Some(signature::SIGNED.to_string()))?;
        Ok(found.then_some(id))
    }

    async fn mark_signed_by_document(&self, document_id: &str) -> Result<Option<Uuid>, AppError> {
        let id = self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|s| s.autentique_document_id.as_deref() == Some(document_id))
            .map(|s| s.id);
        match id {
            Some(id) => self.mark_signed(id).await,
            None => Ok(None),
        }
    }

    async fn attach_contract(
        &self,
        id: Uuid,
        contract_url: &str,
        document_id: Option<&str>,
        signature_status: &str,
    ) -> Result<bool, AppError> {
        self.update(id, |s| {
            s.contrato_url = Some(contract_url.to_string());
            if let Some(doc) = document_id {
                s.autentique_document_id = Some(doc.to_string());
            }
            s.status_assinatura = Some(signature_status.to_string());
        })
    }

    async fn status_totals(&self) -> Result<Vec<StatusTotal>, AppError> {
        let mut totals: HashMap<String, (i64, Decimal)> = HashMap::new();
        for sale in self.rows.lock().unwrap().values() {
            let entry = totals.entry(sale.status.clone()).or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += sale.valor_total;
        }
        let mut totals: Vec<StatusTotal> = totals
            .into_iter()
            .map(|(status, (quantidade, valor))| StatusTotal { status, quantidade, valor })
            .collect();
        totals.sort_by(|a, b| a.status.cmp(&b.status));
        Ok(totals)
    }
}

// --- CONFIGURAÇÃO ---

pub struct StaticConfig(pub Option<String>);

#[async_trait]
impl ConfigProvider for StaticConfig {
    async fn get_active_key(&self, system_name: &str) -> Result<String, AppError> {
        self.0
            .clone()
            .ok_or_else(|| AppError::ConfigurationError(format!("nenhuma chave ativa para o sistema '{}'", system_name)))
    }
}

// --- LOGS ---

#[derive(Default)]
pub struct InMemoryLogs {
    rows: Mutex<Vec<SystemLog>>,
}

impl InMemoryLogs {
    pub fn all(&self) -> Vec<SystemLog> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl SystemLogStore for InMemoryLogs {
    async fn insert(&self, entry: &NewSystemLog) -> Result<SystemLog, AppError> {
        let log = SystemLog {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            user_email: entry.user_email.clone(),
            acao: entry.acao.clone(),
            entidade: entry.entidade.clone(),
            entidade_id: entry.entidade_id.clone(),
            dados_anteriores: entry.dados_anteriores.clone(),
            dados_novos: entry.dados_novos.clone(),
            ip_address: entry.ip_address.clone(),
            user_agent: entry.user_agent.clone(),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(log.clone());
        Ok(log)
    }

    async fn query(&self, filter: &LogFilter) -> Result<LogPage, AppError> {
        let mut matching: Vec<SystemLog> = self
            .all()
            .into_iter()
            .filter(|l| filter.acao.as_deref().is_none_or(|a| l.acao == a))
            .filter(|l| filter.entidade.as_deref().is_none_or(|e| l.entidade == e))
            .filter(|l| filter.entidade_id.is_none() || l.entidade_id == filter.entidade_id)
            .filter(|l| filter.user_id.is_none() || l.user_id == filter.user_id)
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let data = matching
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.page_size() as usize)
            .collect();

        Ok(LogPage { data, page: filter.page(), page_size: filter.page_size(), total })
    }

    async fn count_since(&self, since: DateTime<Utc>) -> Result<i64, AppError> {
        Ok(self.all().iter().filter(|l| l.created_at >= since).count() as i64)
    }
}

// --- GATEWAY ---

/// Como o gateway falso deve responder.
#[derive(Clone, Default)]
pub enum GatewayMode {
    #[default]
    Accept,
    Reject { status: u16, body: Value },
    Unreachable,
}

#[derive(Default)]
pub struct FakeGateway {
    mode: Mutex<GatewayMode>,
    calls: Mutex<Vec<String>>,
    pub customers: Mutex<Vec<CustomerRequest>>,
    pub payments: Mutex<Vec<PaymentRequest>>,
    pub listing: Mutex<Vec<RemotePayment>>,
    pub keys_seen: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn set_mode(&self, mode: GatewayMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_listing(&self, charges: Vec<RemotePayment>) {
        *self.listing.lock().unwrap() = charges;
    }

    fn answer(&self, api_key: &str, call: String) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(call);
        self.keys_seen.lock().unwrap().push(api_key.to_string());
        match self.mode.lock().unwrap().clone() {
            GatewayMode::Accept => Ok(()),
            GatewayMode::Reject { status, body } => Err(AppError::UpstreamError { status, body }),
            GatewayMode::Unreachable => Err(AppError::InternalServerError(anyhow::anyhow!("conexão recusada"))),
        }
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_customer(&self, api_key: &str, customer: &CustomerRequest) -> Result<RemoteCustomer, AppError> {
        self.answer(api_key, "create_customer".to_string())?;
        self.customers.lock().unwrap().push(customer.clone());
        Ok(RemoteCustomer {
            id: "cus_000000000001".to_string(),
            name: Some(customer.name.clone()),
            cpf_cnpj: Some(customer.cpf_cnpj.clone()),
            deleted: Some(false),
        })
    }

    async fn update_customer(
        &self,
        api_key: &str,
        customer_id: &str,
        customer: &CustomerRequest,
    ) -> Result<RemoteCustomer, AppError> {
        self.answer(api_key, format!("update_customer:{customer_id}"))?;
        self.customers.lock().unwrap().push(customer.clone());
        Ok(RemoteCustomer {
            id: customer_id.to_string(),
            name: Some(customer.name.clone()),
            cpf_cnpj: Some(customer.cpf_cnpj.clone()),
            deleted: Some(false),
        })
    }

    async fn delete_customer(&self, api_key: &str, customer_id: &str) -> Result<(), AppError> {
        self.answer(api_key, format!("delete_customer:{customer_id}"))
    }

    async fn create_payment(&self, api_key: &str, payment: &PaymentRequest) -> Result<RemotePayment, AppError> {
        self.answer(api_key, "create_payment".to_string())?;
        self.payments.lock().unwrap().push(payment.clone());
        Ok(remote_payment("pay_000000000001", Some(&payment.external_reference), None))
    }

    async fn update_payment(
        &self,
        api_key: &str,
        payment_id: &str,
        changes: &PaymentUpdateRequest,
    ) -> Result<RemotePayment, AppError> {
        self.answer(api_key, format!("update_payment:{payment_id}"))?;
        let mut payment = remote_payment(payment_id, None, None);
        payment.value = changes.value;
        payment.description = changes.description.clone();
        Ok(payment)
    }

    async fn delete_payment(&self, api_key: &str, payment_id: &str) -> Result<(), AppError> {
        self.answer(api_key, format!("delete_payment:{payment_id}"))
    }

    async fn list_payments(&self, api_key: &str, limit: u32) -> Result<Vec<RemotePayment>, AppError> {
        self.answer(api_key, format!("list_payments:{limit}"))?;
        Ok(self.listing.lock().unwrap().clone())
    }
}

// --- MONTAGEM ---

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub sales: Arc<InMemorySales>,
    pub logs: Arc<InMemoryLogs>,
    pub gateway: Arc<FakeGateway>,
}

pub fn settings() -> Settings {
    Settings {
        database_url: "postgres://unused".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_audience: None,
        asaas_base_url: "http://asaas.invalid/v3".to_string(),
        asaas_webhook_token: None,
        bind_addr: "127.0.0.1:0".to_string(),
        db_max_connections: 1,
        run_migrations: false,
        charges_default_limit: 100,
        pdf_proxy_allowed_hosts: vec!["docs.exemplo.com".to_string()],
    }
}

pub fn test_app() -> TestApp {
    test_app_with(settings(), Some(API_KEY.to_string()))
}

pub fn test_app_with(settings: Settings, api_key: Option<String>) -> TestApp {
    let sales = Arc::new(InMemorySales::default());
    let logs = Arc::new(InMemoryLogs::default());
    let gateway = Arc::new(FakeGateway::default());

    let state = AppState::assemble(
        settings,
        Collaborators {
            sales: sales.clone(),
            config: Arc::new(StaticConfig(api_key)),
            logs: logs.clone(),
            gateway: gateway.clone(),
            http: reqwest::Client::new(),
        },
    );

    TestApp { router: build_router(state.clone()), state, sales, logs, gateway }
}

// --- FIXTURES ---

pub fn sale_named(nome: &str) -> Sale {
    let now = Utc::now();
    Sale {
        id: Uuid::new_v4(),
        cliente_id: None,
        nome_cliente: nome.to_string(),
        cpf_cnpj: Some("123.456.789-09".to_string()),
        email: Some("cliente@email.com".to_string()),
        telefone: Some("(11) 98765-4321".to_string()),
        cep: Some("01310-100".to_string()),
        endereco: Some("Av. Paulista".to_string()),
        numero: Some("1000".to_string()),
        complemento: None,
        bairro: Some("Bela Vista".to_string()),
        cidade: Some("São Paulo".to_string()),
        estado: Some("SP".to_string()),
        tipo_contrato: Some("Título Familiar".to_string()),
        forma_pagamento: Some("PIX".to_string()),
        quantidade_parcelas: Some(1),
        valor_total: Decimal::new(10000, 2),
        data_vencimento: None,
        status: status::PENDENTE.to_string(),
        asaas_customer_id: None,
        asaas_payment_id: None,
        contrato_url: None,
        status_assinatura: None,
        autentique_document_id: None,
        data_pagamento: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn remote_payment(id: &str, external_reference: Option<&str>, date_created: Option<NaiveDate>) -> RemotePayment {
    serde_json::from_value(json!({
        "id": id,
        "customer": "cus_000000000001",
        "value": 100.0,
        "billingType": "PIX",
        "status": "PENDING",
        "dueDate": "2025-03-10",
        "dateCreated": date_created.map(|d| d.format("%Y-%m-%d").to_string()),
        "externalReference": external_reference,
    }))
    .unwrap()
}

pub fn bearer() -> String {
    let claims = Claims {
        sub: Uuid::new_v4(),
        exp: (Utc::now().timestamp() + 3600) as usize,
        email: Some("operador@grupothermas.com.br".to_string()),
        role: Some("admin".to_string()),
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(JWT_SECRET.as_bytes())).unwrap();
    format!("Bearer {token}")
}

// --- REQUISIÇÕES ---

pub async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>, auth: bool) -> (u16, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if auth {
        builder = builder.header(header::AUTHORIZATION, bearer());
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    read(response).await
}

pub async fn send_raw(router: &Router, uri: &str, raw: &str, headers: &[(&str, &str)]) -> (u16, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder.body(Body::from(raw.to_string())).unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    read(response).await
}

async fn read(response: Response<Body>) -> (u16, Value) {
    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}
