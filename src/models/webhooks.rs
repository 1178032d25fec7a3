// src/models/webhooks.rs
//
// Corpos dos webhooks recebidos. Cada remetente define seu formato; aqui eles
// viram variantes explícitas. Eventos desconhecidos caem em `Other` (ignorados);
// formatos quebrados de eventos conhecidos são rejeitados.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// --- ASAAS (pagamentos) ---

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event")]
pub enum AsaasWebhook {
    #[serde(rename = "PAYMENT_RECEIVED")]
    PaymentReceived { payment: WebhookPayment },
    #[serde(rename = "PAYMENT_CONFIRMED")]
    PaymentConfirmed { payment: WebhookPayment },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayment {
    pub id: String,
    #[serde(default)]
    pub external_reference: Option<String>,
}

// --- AUTENTIQUE (assinatura eletrônica) ---

#[derive(Debug, Clone, Deserialize)]
pub struct AutentiqueWebhook {
    pub event: AutentiqueEvent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum AutentiqueEvent {
    #[serde(rename = "signature.accepted")]
    SignatureAccepted { data: SignatureData },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignatureData {
    // Id do documento no provedor de assinatura
    pub document: String,
    #[serde(default, alias = "externalReference")]
    pub external_reference: Option<String>,
}

// --- GERADOR DE DOCUMENTOS (contrato pronto) ---

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DocumentCallback {
    pub venda_id: Uuid,
    #[schema(example = "https://docs.exemplo.com/contratos/123.pdf")]
    pub contrato_url: String,
    #[serde(default)]
    pub documento_id: Option<String>,
    // Padrão: "generated"
    #[serde(default)]
    pub status: Option<String>,
}

/// O que o processamento de um webhook fez (devolvido ao remetente com 200).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum WebhookOutcome {
    Updated { venda_id: Uuid },
    Ignored { reason: String },
}

impl WebhookOutcome {
    pub fn ignored(reason: impl Into<String>) -> Self {
        WebhookOutcome::Ignored { reason: reason.into() }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WebhookAck {
    pub received: bool,
    pub outcome: WebhookOutcome,
}

/// Referência externa -> id da venda. Referências que não são UUID não casam com nada.
pub fn parse_reference(reference: Option<&str>) -> Option<Uuid> {
    reference
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .and_then(|r| Uuid::parse_str(r).ok())
}
