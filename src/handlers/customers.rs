// src/handlers/customers.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{error::AppError, extract::AppJson},
    config::AppState,
    middleware::{auth::AuthenticatedUser, client_info::ClientInfo},
    models::{sale::Sale, system_log::NewSystemLog},
    services::customer_service::{CustomerDeletion, CustomerDetails},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCustomerPayload {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub venda_id: Uuid,

    // Os dados do cliente vêm no mesmo nível do `venda_id`
    #[serde(flatten)]
    pub cliente: CustomerDetails,
}

// POST /api/asaas/clientes
#[utoipa::path(
    post,
    path = "/api/asaas/clientes",
    tag = "Asaas",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Cliente criado no Asaas e vinculado à venda", body = Sale),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Venda não encontrada"),
        (status = 500, description = "Chave ausente, recusa do gateway ou falha ao gravar")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    client: ClientInfo,
    AppJson(payload): AppJson<CreateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state
        .customer_service
        .provision(payload.venda_id, &payload.cliente)
        .await?;

    app_state
        .audit_service
        .record(
            &user,
            &client,
            NewSystemLog::new("asaas_cliente_criado", "venda", sale.id)
                .with_snapshots(None, Some(json!({ "asaas_customer_id": sale.asaas_customer_id }))),
        )
        .await;

    Ok((StatusCode::CREATED, Json(sale)))
}

// PUT /api/asaas/clientes/{venda_id}
#[utoipa::path(
    put,
    path = "/api/asaas/clientes/{venda_id}",
    tag = "Asaas",
    request_body = CustomerDetails,
    params(("venda_id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Cadastro reenviado ao Asaas", body = Sale),
        (status = 400, description = "Dados inválidos ou venda sem cliente no Asaas"),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    client: ClientInfo,
    Path(venda_id): Path<Uuid>,
    AppJson(payload): AppJson<CustomerDetails>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.customer_service.update(venda_id, &payload).await?;

    app_state
        .audit_service
        .record(&user, &client, NewSystemLog::new("asaas_cliente_editado", "venda", venda_id))
        .await;

    Ok((StatusCode::OK, Json(sale)))
}

// DELETE /api/asaas/clientes/{venda_id}
#[utoipa::path(
    delete,
    path = "/api/asaas/clientes/{venda_id}",
    tag = "Asaas",
    params(("venda_id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Vínculo removido (com o erro do gateway, se houve)", body = CustomerDeletion),
        (status = 400, description = "Venda sem cliente no Asaas"),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    client: ClientInfo,
    Path(venda_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let deletion = app_state.customer_service.delete(venda_id).await?;

    app_state
        .audit_service
        .record(
            &user,
            &client,
            NewSystemLog::new("asaas_cliente_excluido", "venda", venda_id).with_snapshots(
                Some(json!({ "asaas_customer_id": deletion.asaas_customer_id })),
                Some(json!({ "asaas_customer_id": null })),
            ),
        )
        .await;

    Ok((StatusCode::OK, Json(deletion)))
}
