// src/handlers/sales.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::{error::AppError, extract::AppJson},
    config::AppState,
    middleware::{auth::AuthenticatedUser, client_info::ClientInfo},
    models::{
        sale::{NewSale, Sale},
        system_log::NewSystemLog,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SaleListQuery {
    /// pendente, ativo, pago, cancelado...
    pub status: Option<String>,
}

// POST /api/vendas
#[utoipa::path(
    post,
    path = "/api/vendas",
    tag = "Vendas",
    request_body = NewSale,
    responses(
        (status = 201, description = "Venda registrada", body = Sale),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    client: ClientInfo,
    AppJson(payload): AppJson<NewSale>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sale_service.create(&payload).await?;

    app_state
        .audit_service
        .record(
            &user,
            &client,
            NewSystemLog::new("venda_criada", "venda", sale.id)
                .with_snapshots(None, serde_json::to_value(&sale).ok()),
        )
        .await;

    Ok((StatusCode::CREATED, Json(sale)))
}

// GET /api/vendas
#[utoipa::path(
    get,
    path = "/api/vendas",
    tag = "Vendas",
    params(SaleListQuery),
    responses((status = 200, description = "Vendas, mais recentes primeiro", body = Vec<Sale>)),
    security(("api_jwt" = []))
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<SaleListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sale_service.list(query.status.as_deref()).await?;
    Ok((StatusCode::OK, Json(sales)))
}

// GET /api/vendas/{id}
#[utoipa::path(
    get,
    path = "/api/vendas/{id}",
    tag = "Vendas",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda", body = Sale),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sale_service.get(id).await?;
    Ok((StatusCode::OK, Json(sale)))
}

// DELETE /api/vendas/{id}
#[utoipa::path(
    delete,
    path = "/api/vendas/{id}",
    tag = "Vendas",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda excluída (cliente no Asaas excluído junto)", body = Sale),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_sale(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    client: ClientInfo,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let removed = app_state.sale_service.delete(id).await?;

    app_state
        .audit_service
        .record(
            &user,
            &client,
            NewSystemLog::new("venda_excluida", "venda", id)
                .with_snapshots(serde_json::to_value(&removed).ok(), None),
        )
        .await;

    Ok((StatusCode::OK, Json(removed)))
}
