// src/handlers/charges.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{error::AppError, extract::AppJson},
    config::AppState,
    middleware::{auth::AuthenticatedUser, client_info::ClientInfo},
    models::{asaas::RemotePayment, sale::Sale, system_log::NewSystemLog},
    services::charge_service::{ChargeFilter, ChargeRequest, ChargeUpdate},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ChargeCreated {
    pub venda: Sale,
    pub cobranca: RemotePayment,
}

// POST /api/asaas/cobrancas
#[utoipa::path(
    post,
    path = "/api/asaas/cobrancas",
    tag = "Asaas",
    request_body = ChargeRequest,
    responses(
        (status = 201, description = "Cobrança criada no Asaas e vinculada à venda", body = ChargeCreated),
        (status = 400, description = "Dados inválidos ou venda sem cliente no Asaas"),
        (status = 404, description = "Venda não encontrada"),
        (status = 500, description = "Chave ausente, recusa do gateway ou falha ao gravar")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_charge(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    client: ClientInfo,
    AppJson(payload): AppJson<ChargeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (venda, cobranca) = app_state.charge_service.provision(&payload).await?;

    app_state
        .audit_service
        .record(
            &user,
            &client,
            NewSystemLog::new("asaas_cobranca_criada", "venda", venda.id).with_snapshots(
                None,
                Some(json!({
                    "asaas_payment_id": cobranca.id,
                    "valor": payload.valor,
                    "parcelas": payload.quantidade_parcelas.unwrap_or(1),
                })),
            ),
        )
        .await;

    Ok((StatusCode::CREATED, Json(ChargeCreated { venda, cobranca })))
}

// GET /api/asaas/cobrancas
#[utoipa::path(
    get,
    path = "/api/asaas/cobrancas",
    tag = "Asaas",
    params(ChargeFilter),
    responses(
        (status = 200, description = "Cobranças do Asaas ligadas a vendas conhecidas", body = Vec<RemotePayment>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_charges(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(filter): Query<ChargeFilter>,
) -> Result<impl IntoResponse, AppError> {
    let charges = app_state.charge_service.list(&filter).await?;
    Ok((StatusCode::OK, Json(charges)))
}

// PUT /api/asaas/cobrancas/{venda_id}
#[utoipa::path(
    put,
    path = "/api/asaas/cobrancas/{venda_id}",
    tag = "Asaas",
    request_body = ChargeUpdate,
    params(("venda_id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Cobrança alterada", body = RemotePayment),
        (status = 400, description = "Nada para alterar ou venda sem cobrança"),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_charge(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    client: ClientInfo,
    Path(venda_id): Path<Uuid>,
    AppJson(payload): AppJson<ChargeUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let cobranca = app_state.charge_service.update(venda_id, &payload).await?;

    app_state
        .audit_service
        .record(
            &user,
            &client,
            NewSystemLog::new("asaas_cobranca_editada", "venda", venda_id)
                .with_snapshots(None, serde_json::to_value(&cobranca).ok()),
        )
        .await;

    Ok((StatusCode::OK, Json(cobranca)))
}

// DELETE /api/asaas/cobrancas/{venda_id}
#[utoipa::path(
    delete,
    path = "/api/asaas/cobrancas/{venda_id}",
    tag = "Asaas",
    params(("venda_id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Cobrança excluída e desvinculada", body = Sale),
        (status = 400, description = "Venda sem cobrança no Asaas"),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_charge(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    client: ClientInfo,
    Path(venda_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let venda = app_state.charge_service.delete(venda_id).await?;

    app_state
        .audit_service
        .record(&user, &client, NewSystemLog::new("asaas_cobranca_excluida", "venda", venda_id))
        .await;

    Ok((StatusCode::OK, Json(venda)))
}
