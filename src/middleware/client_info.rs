// src/middleware/client_info.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

// Metadados de rede gravados nos logs de auditoria
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_str = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        // "cliente, proxy1, proxy2" -> "cliente"
        let ip = header_str("x-forwarded-for")
            .and_then(|list| list.split(',').next().map(|first| first.trim().to_string()))
            .filter(|first| !first.is_empty())
            .or_else(|| header_str("x-real-ip"));

        Ok(ClientInfo {
            ip,
            user_agent: header_str(header::USER_AGENT.as_str()),
        })
    }
}
