// src/handlers/logs.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{error::AppError, extract::AppJson},
    config::AppState,
    middleware::{auth::AuthenticatedUser, client_info::ClientInfo},
    models::system_log::{LogFilter, LogPage, NewSystemLog, SystemLog},
};

// GET /api/logs
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "Auditoria",
    params(LogFilter),
    responses((status = 200, description = "Página de logs, mais recentes primeiro", body = LogPage)),
    security(("api_jwt" = []))
)]
pub async fn list_logs(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(filter): Query<LogFilter>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.audit_service.query(&filter).await?;
    Ok((StatusCode::OK, Json(page)))
}

// POST /api/logs
#[utoipa::path(
    post,
    path = "/api/logs",
    tag = "Auditoria",
    request_body = NewSystemLog,
    responses(
        (status = 201, description = "Log registrado", body = SystemLog),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_log(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    client: ClientInfo,
    AppJson(payload): AppJson<NewSystemLog>,
) -> Result<impl IntoResponse, AppError> {
    let log = app_state.audit_service.insert(&user, &client, payload).await?;
    Ok((StatusCode::CREATED, Json(log)))
}
