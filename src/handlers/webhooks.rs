// src/handlers/webhooks.rs
//
// Rotas públicas chamadas pelos parceiros. O corpo é lido cru e decodificado aqui:
// JSON ilegível responde 500 com o erro; evento desconhecido responde 200.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;

use crate::{
    common::error::AppError,
    config::AppState,
    models::webhooks::{AsaasWebhook, AutentiqueWebhook, DocumentCallback, WebhookAck, WebhookOutcome},
};

const ASAAS_TOKEN_HEADER: &str = "asaas-access-token";

fn decode<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::MalformedPayload(e.to_string()))
}

fn ack(outcome: WebhookOutcome) -> impl IntoResponse {
    (StatusCode::OK, Json(WebhookAck { received: true, outcome }))
}

// POST /api/webhooks/asaas
#[utoipa::path(
    post,
    path = "/api/webhooks/asaas",
    tag = "Webhooks",
    request_body(content = Object, description = "Evento do Asaas (PAYMENT_RECEIVED, PAYMENT_CONFIRMED, ...)"),
    responses(
        (status = 200, description = "Recebido (processado ou ignorado)", body = WebhookAck),
        (status = 401, description = "Token do webhook inválido"),
        (status = 500, description = "Payload ilegível ou falha no banco")
    )
)]
pub async fn asaas(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    if let Some(expected) = app_state.settings.asaas_webhook_token.as_deref() {
        let received = headers.get(ASAAS_TOKEN_HEADER).and_then(|v| v.to_str().ok());
        if received != Some(expected) {
            tracing::warn!("Webhook do Asaas com token inválido.");
            return Err(AppError::WebhookUnauthorized);
        }
    }

    let hook: AsaasWebhook = decode(&body)?;
    let outcome = app_state.webhook_service.handle_asaas(hook).await?;
    Ok(ack(outcome))
}

// POST /api/webhooks/autentique
#[utoipa::path(
    post,
    path = "/api/webhooks/autentique",
    tag = "Webhooks",
    request_body(content = Object, description = "Evento do Autentique (signature.accepted, ...)"),
    responses(
        (status = 200, description = "Recebido (processado ou ignorado)", body = WebhookAck),
        (status = 500, description = "Payload ilegível ou falha no banco")
    )
)]
pub async fn autentique(
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let hook: AutentiqueWebhook = decode(&body)?;
    let outcome = app_state.webhook_service.handle_autentique(hook).await?;
    Ok(ack(outcome))
}

// POST /api/webhooks/documento
#[utoipa::path(
    post,
    path = "/api/webhooks/documento",
    tag = "Webhooks",
    request_body = DocumentCallback,
    responses(
        (status = 200, description = "Recebido (gravado na venda ou ignorado)", body = WebhookAck),
        (status = 500, description = "Payload ilegível ou falha no banco")
    )
)]
pub async fn document(
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let callback: DocumentCallback = decode(&body)?;
    let outcome = app_state.webhook_service.handle_document(callback).await?;
    Ok(ack(outcome))
}
