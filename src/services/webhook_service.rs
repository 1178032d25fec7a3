// src/services/webhook_service.rs

use std::sync::Arc;

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::SalesStore,
    models::{
        sale::signature,
        webhooks::{
            parse_reference, AsaasWebhook, AutentiqueEvent, AutentiqueWebhook, DocumentCallback, WebhookOutcome,
            WebhookPayment,
        },
    },
};

/// Reconciliação dos webhooks. Sem estado compartilhado: cada evento é independente.
#[derive(Clone)]
pub struct WebhookService {
    sales: Arc<dyn SalesStore>,
}

impl WebhookService {
    pub fn new(sales: Arc<dyn SalesStore>) -> Self {
        Self { sales }
    }

    /// PAYMENT_RECEIVED / PAYMENT_CONFIRMED marcam a venda como paga hoje.
    pub async fn handle_asaas(&self, hook: AsaasWebhook) -> Result<WebhookOutcome, AppError> {
        match hook {
            AsaasWebhook::PaymentReceived { payment } | AsaasWebhook::PaymentConfirmed { payment } => {
                self.settle_payment(payment).await
            }
            AsaasWebhook::Other => Ok(WebhookOutcome::ignored("evento não tratado")),
        }
    }

    async fn settle_payment(&self, payment: WebhookPayment) -> Result<WebhookOutcome, AppError> {
        let Some(sale_id) = parse_reference(payment.external_reference.as_deref()) else {
            tracing::info!("Pagamento {} sem referência externa válida; ignorado.", payment.id);
            return Ok(WebhookOutcome::ignored("pagamento sem referência externa"));
        };

        let today = Utc::now().date_naive();
        if self.sales.mark_paid(sale_id, &payment.id, today).await? {
            tracing::info!("✅ Venda {} paga (cobrança {}).", sale_id, payment.id);
            Ok(WebhookOutcome::Updated { venda_id: sale_id })
        } else {
            tracing::warn!("Pagamento {} referencia venda inexistente {}.", payment.id, sale_id);
            Ok(WebhookOutcome::ignored("venda não encontrada"))
        }
    }

    /// `signature.accepted`: casa pela referência externa; sem ela, pelo id do documento.
    pub async fn handle_autentique(&self, hook: AutentiqueWebhook) -> Result<WebhookOutcome, AppError> {
        let AutentiqueEvent::SignatureAccepted { data } = hook.event else {
            return Ok(WebhookOutcome::ignored("evento não tratado"));
        };

        let matched = match parse_reference(data.external_reference.as_deref()) {
            Some(sale_id) => self.sales.mark_signed(sale_id).await?,
            None => self.sales.mark_signed_by_document(&data.document).await?,
        };

        match matched {
            Some(sale_id) => {
                tracing::info!("✍️ Contrato da venda {} assinado (documento {}).", sale_id, data.document);
                Ok(WebhookOutcome::Updated { venda_id: sale_id })
            }
            None => {
                tracing::warn!("Assinatura do documento {} não corresponde a nenhuma venda.", data.document);
                Ok(WebhookOutcome::ignored("venda não encontrada"))
            }
        }
    }

    /// Contrato gerado pelo montador de documentos: grava URL, id do documento e status.
    pub async fn handle_document(&self, callback: DocumentCallback) -> Result<WebhookOutcome, AppError> {
        if callback.contrato_url.trim().is_empty() {
            tracing::warn!("Contrato da venda {} chegou sem URL; ignorado.", callback.venda_id);
            return Ok(WebhookOutcome::ignored("contrato sem URL"));
        }

        let status = callback
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(signature::GENERATED);

        let updated = self
            .sales
            .attach_contract(callback.venda_id, &callback.contrato_url, callback.documento_id.as_deref(), status)
            .await?;

        if !updated {
            tracing::warn!("Contrato recebido para venda inexistente {}.", callback.venda_id);
            return Ok(WebhookOutcome::ignored("venda não encontrada"));
        }

        tracing::info!("📄 Contrato da venda {} disponível ({}).", callback.venda_id, status);
        Ok(WebhookOutcome::Updated { venda_id: callback.venda_id })
    }
}
