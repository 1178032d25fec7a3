// src/services/charge_service.rs

use std::{collections::HashSet, sync::Arc};

use chrono::{Duration, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::{
        dates::{flexible_date, flexible_date_opt, to_iso},
        error::AppError,
    },
    db::{ConfigProvider, SalesStore},
    gateway::PaymentGateway,
    models::{
        asaas::{BillingType, PaymentRequest, PaymentUpdateRequest, RemotePayment},
        integration::ASAAS,
        sale::Sale,
        webhooks::parse_reference,
    },
};

/// Janela da listagem padrão (sem filtro de venda/cliente).
pub const RECENT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChargeRequest {
    pub venda_id: Uuid,
    #[schema(example = "100.00")]
    pub valor: Decimal,
    // DD/MM/YYYY ou ISO
    #[serde(deserialize_with = "flexible_date")]
    #[schema(value_type = String, example = "10/03/2025")]
    pub data_vencimento: NaiveDate,
    pub forma_pagamento: BillingType,
    #[schema(example = 3)]
    pub quantidade_parcelas: Option<u32>,
    pub descricao: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ChargeUpdate {
    #[schema(example = "120.00")]
    pub valor: Option<Decimal>,
    #[serde(default, deserialize_with = "flexible_date_opt")]
    #[schema(value_type = Option<String>, example = "2025-04-10")]
    pub data_vencimento: Option<NaiveDate>,
    pub descricao: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChargeFilter {
    pub venda_id: Option<Uuid>,
    pub cliente_id: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Clone)]
pub struct ChargeService {
    sales: Arc<dyn SalesStore>,
    config: Arc<dyn ConfigProvider>,
    gateway: Arc<dyn PaymentGateway>,
    default_limit: u32,
}

impl ChargeService {
    pub fn new(
        sales: Arc<dyn SalesStore>,
        config: Arc<dyn ConfigProvider>,
        gateway: Arc<dyn PaymentGateway>,
        default_limit: u32,
    ) -> Self {
        Self { sales, config, gateway, default_limit }
    }

    /// Cria a cobrança (à vista ou parcelada) para uma venda que já tem cliente no gateway.
    pub async fn provision(&self, request: &ChargeRequest) -> Result<(Sale, RemotePayment), AppError> {
        let sale = self.load_sale(request.venda_id).await?;

        // Sem cliente remoto não existe cobrança: o gateway nem é consultado.
        let customer_id = sale.asaas_customer_id.clone().ok_or_else(|| {
            AppError::PreconditionError(
                "A venda não possui cliente no Asaas. Cadastre o cliente antes de gerar a cobrança.".to_string(),
            )
        })?;

        if request.valor <= Decimal::ZERO {
            return Err(AppError::MissingField("valor".to_string()));
        }

        let payment = build_payment_request(&customer_id, request);
        let api_key = self.config.get_active_key(ASAAS).await?;
        let remote = self.gateway.create_payment(&api_key, &payment).await?;

        let sale = self.persist_charge_id(sale.id, Some(&remote.id)).await?;
        Ok((sale, remote))
    }

    /// Altera valor, vencimento e/ou descrição da cobrança vinculada à venda.
    pub async fn update(&self, sale_id: Uuid, update: &ChargeUpdate) -> Result<RemotePayment, AppError> {
        let sale = self.load_sale(sale_id).await?;
        let payment_id = require_charge(&sale)?;

        let changes = PaymentUpdateRequest {
            value: update.valor,
            due_date: update.data_vencimento.map(to_iso),
            description: update.descricao.clone(),
        };
        if changes.is_empty() {
            return Err(AppError::MissingField("valor, data_vencimento ou descricao".to_string()));
        }

        let api_key = self.config.get_active_key(ASAAS).await?;
        self.gateway.update_payment(&api_key, &payment_id, &changes).await
    }

    /// Exclui a cobrança no gateway e, se deu certo, desvincula da venda.
    pub async fn delete(&self, sale_id: Uuid) -> Result<Sale, AppError> {
        let sale = self.load_sale(sale_id).await?;
        let payment_id = require_charge(&sale)?;

        let api_key = self.config.get_active_key(ASAAS).await?;
        self.gateway.delete_payment(&api_key, &payment_id).await?;

        self.persist_charge_id(sale_id, None).await
    }

    /// Lista as cobranças do gateway que pertencem a vendas conhecidas.
    pub async fn list(&self, filter: &ChargeFilter) -> Result<Vec<RemotePayment>, AppError> {
        let api_key = self.config.get_active_key(ASAAS).await?;
        let limit = filter.limit.filter(|l| *l > 0).unwrap_or(self.default_limit);

        let charges = self.gateway.list_payments(&api_key, limit).await?;
        let known: HashSet<Uuid> = self.sales.list_ids().await?.into_iter().collect();

        let customer_sales = match filter.cliente_id.as_deref() {
            Some(cliente_id) => Some(
                self.sales
                    .list_ids_by_customer(cliente_id)
                    .await?
                    .into_iter()
                    .collect::<HashSet<Uuid>>(),
            ),
            None => None,
        };

        let today = chrono::Utc::now().date_naive();
        Ok(filter_charges(charges, &known, filter.venda_id, customer_sales.as_ref(), today))
    }

    async fn load_sale(&self, sale_id: Uuid) -> Result<Sale, AppError> {
        self.sales
            .find_by_id(sale_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venda {}", sale_id)))
    }

    async fn persist_charge_id(&self, sale_id: Uuid, charge_id: Option<&str>) -> Result<Sale, AppError> {
        let persisted = async {
            self.sales.set_remote_charge(sale_id, charge_id).await?;
            self.load_sale(sale_id).await
        }
        .await;

        persisted.map_err(|e| {
            tracing::error!("Cobrança {:?} processada no Asaas, mas a venda {} não foi atualizada: {}", charge_id, sale_id, e);
            e.into_persistence()
        })
    }
}

fn require_charge(sale: &Sale) -> Result<String, AppError> {
    sale.asaas_payment_id
        .clone()
        .ok_or_else(|| AppError::PreconditionError("A venda não possui cobrança no Asaas.".to_string()))
}

/// Valor de cada parcela: divisão simples, arredondada em 2 casas.
/// A soma das parcelas pode diferir do total em alguns centavos (100.00 / 3 = 33.33).
pub fn installment_value(total: Decimal, installments: u32) -> Decimal {
    (total / Decimal::from(installments.max(1)))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn build_payment_request(customer_id: &str, request: &ChargeRequest) -> PaymentRequest {
    let installments = request.quantidade_parcelas.unwrap_or(1);

    let (value, installment_count, installment_value) = if installments > 1 {
        (None, Some(installments), Some(installment_value(request.valor, installments)))
    } else {
        (Some(request.valor), None, None)
    };

    PaymentRequest {
        customer: customer_id.to_string(),
        billing_type: request.forma_pagamento,
        value,
        installment_count,
        installment_value,
        due_date: to_iso(request.data_vencimento),
        description: request.descricao.clone().filter(|d| !d.trim().is_empty()),
        external_reference: request.venda_id.to_string(),
    }
}

/// Pipeline de filtros da listagem, nesta ordem:
/// referência válida -> venda -> cliente -> recência (só sem filtro explícito).
pub fn filter_charges(
    charges: Vec<RemotePayment>,
    known_sales: &HashSet<Uuid>,
    sale_filter: Option<Uuid>,
    customer_sales: Option<&HashSet<Uuid>>,
    today: NaiveDate,
) -> Vec<RemotePayment> {
    let explicit_filter = sale_filter.is_some() || customer_sales.is_some();
    let cutoff = today - Duration::days(RECENT_WINDOW_DAYS);

    charges
        .into_iter()
        .filter_map(|charge| {
            let sale_id = parse_reference(charge.external_reference.as_deref())?;
            known_sales.contains(&sale_id).then_some((sale_id, charge))
        })
        .filter(|(sale_id, _)| sale_filter.is_none_or(|wanted| *sale_id == wanted))
        .filter(|(sale_id, _)| customer_sales.is_none_or(|ids| ids.contains(sale_id)))
        .filter(|(_, charge)| {
            explicit_filter || charge.date_created.is_some_and(|created| created >= cutoff)
        })
        .map(|(_, charge)| charge)
        .collect()
}
