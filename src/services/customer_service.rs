// src/services/customer_service.rs

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        format::{digits_or_none, only_digits},
    },
    db::{ConfigProvider, SalesStore},
    gateway::PaymentGateway,
    models::{asaas::CustomerRequest, integration::ASAAS, sale::Sale},
};

/// Dados do cliente enviados pela tela de venda.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CustomerDetails {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Maria da Silva")]
    pub nome: String,

    #[validate(length(min = 1, message = "O CPF/CNPJ é obrigatório."))]
    #[schema(example = "123.456.789-09")]
    pub cpf_cnpj: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "maria@email.com")]
    pub email: Option<String>,
    #[schema(example = "(11) 98765-4321")]
    pub telefone: Option<String>,

    #[schema(example = "01310-100")]
    pub cep: Option<String>,
    pub endereco: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
}

/// Resultado da exclusão do cliente no gateway.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerDeletion {
    pub venda_id: Uuid,
    pub asaas_customer_id: String,
    // Presente quando o gateway recusou a exclusão (ex: cliente já removido lá)
    #[schema(value_type = Option<Object>)]
    pub upstream_error: Option<Value>,
}

#[derive(Clone)]
pub struct CustomerService {
    sales: Arc<dyn SalesStore>,
    config: Arc<dyn ConfigProvider>,
    gateway: Arc<dyn PaymentGateway>,
}

impl CustomerService {
    pub fn new(
        sales: Arc<dyn SalesStore>,
        config: Arc<dyn ConfigProvider>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self { sales, config, gateway }
    }

    /// Cria (ou, se a venda já tiver cliente no gateway, atualiza) o cliente remoto
    /// e grava o id devolvido na venda.
    pub async fn provision(&self, sale_id: Uuid, details: &CustomerDetails) -> Result<Sale, AppError> {
        details.validate()?;
        let sale = self.load_sale(sale_id).await?;
        let request = build_customer_request(&sale, details)?;
        let api_key = self.config.get_active_key(ASAAS).await?;

        let remote = match sale.asaas_customer_id.as_deref() {
            Some(existing) => {
                tracing::info!("Venda {} já tem cliente {}; atualizando no gateway.", sale_id, existing);
                self.gateway.update_customer(&api_key, existing, &request).await?
            }
            None => self.gateway.create_customer(&api_key, &request).await?,
        };

        self.persist_customer_id(sale_id, &remote.id).await
    }

    /// Reenvia o cadastro completo para o cliente já existente no gateway.
    pub async fn update(&self, sale_id: Uuid, details: &CustomerDetails) -> Result<Sale, AppError> {
        details.validate()?;
        let sale = self.load_sale(sale_id).await?;
        let customer_id = sale.asaas_customer_id.clone().ok_or_else(|| {
            AppError::PreconditionError("A venda ainda não possui cliente no Asaas.".to_string())
        })?;

        let request = build_customer_request(&sale, details)?;
        let api_key = self.config.get_active_key(ASAAS).await?;
        let remote = self.gateway.update_customer(&api_key, &customer_id, &request).await?;

        self.persist_customer_id(sale_id, &remote.id).await
    }

    /// Exclui o cliente no gateway e limpa o id local, mesmo que o gateway recuse
    /// (ex: cliente já excluído lá). Sem resposta do gateway, nada é alterado.
    /// Cobranças vinculadas ao cliente não são tocadas.
    pub async fn delete(&self, sale_id: Uuid) -> Result<CustomerDeletion, AppError> {
        let sale = self.load_sale(sale_id).await?;
        let customer_id = sale.asaas_customer_id.clone().ok_or_else(|| {
            AppError::PreconditionError("A venda não possui cliente no Asaas.".to_string())
        })?;

        let upstream_error = self.delete_remote(&customer_id).await?;

        self.sales
            .set_remote_customer(sale_id, None)
            .await
            .map_err(AppError::into_persistence)?;

        Ok(CustomerDeletion { venda_id: sale_id, asaas_customer_id: customer_id, upstream_error })
    }

    /// Exclusão remota tolerante: uma recusa do gateway volta como `Some(corpo)`.
    pub async fn delete_remote(&self, customer_id: &str) -> Result<Option<Value>, AppError> {
        let api_key = self.config.get_active_key(ASAAS).await?;

        match self.gateway.delete_customer(&api_key, customer_id).await {
            Ok(()) => Ok(None),
            Err(AppError::UpstreamError { status, body }) => {
                tracing::warn!(
                    "Asaas recusou a exclusão do cliente {} ({}); o vínculo local será removido mesmo assim.",
                    customer_id,
                    status
                );
                Ok(Some(body))
            }
            Err(e) => Err(e),
        }
    }

    async fn load_sale(&self, sale_id: Uuid) -> Result<Sale, AppError> {
        self.sales
            .find_by_id(sale_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venda {}", sale_id)))
    }

    async fn persist_customer_id(&self, sale_id: Uuid, customer_id: &str) -> Result<Sale, AppError> {
        let persisted = async {
            self.sales.set_remote_customer(sale_id, Some(customer_id)).await?;
            self.load_sale(sale_id).await
        }
        .await;

        persisted.map_err(|e| {
            tracing::error!(
                "Cliente {} criado no Asaas, mas a venda {} não foi atualizada: {}",
                customer_id,
                sale_id,
                e
            );
            e.into_persistence()
        })
    }
}

/// Monta o cadastro do Asaas: só dígitos em telefone/CPF/CEP, tipo de contrato como empresa/grupo.
pub fn build_customer_request(sale: &Sale, details: &CustomerDetails) -> Result<CustomerRequest, AppError> {
    let name = details.nome.trim();
    if name.is_empty() {
        return Err(AppError::MissingField("nome".to_string()));
    }

    let cpf_cnpj = only_digits(&details.cpf_cnpj);
    if cpf_cnpj.is_empty() {
        return Err(AppError::MissingField("cpf_cnpj".to_string()));
    }

    let contract_type = sale
        .tipo_contrato
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    Ok(CustomerRequest {
        name: name.to_string(),
        cpf_cnpj,
        email: details.email.clone().filter(|e| !e.trim().is_empty()),
        mobile_phone: digits_or_none(details.telefone.as_deref()),
        postal_code: digits_or_none(details.cep.as_deref()),
        address: details.endereco.clone(),
        address_number: details.numero.clone(),
        complement: details.complemento.clone(),
        province: details.bairro.clone(),
        external_reference: sale.id.to_string(),
        company: contract_type.clone(),
        group_name: contract_type,
        notification_disabled: false,
    })
}
