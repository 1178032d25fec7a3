// src/handlers/documents.rs

use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use reqwest::{redirect, Client, Url};
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::{common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PdfProxyQuery {
    /// URL do PDF (http/https, host liberado em PDF_PROXY_ALLOWED_HOSTS)
    pub url: String,
}

/// Aceita o host exato ou um subdomínio dele (`docs.exemplo.com` libera `a.docs.exemplo.com`).
pub fn host_allowed(url: &Url, allowed: &[String]) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    allowed
        .iter()
        .any(|entry| host == *entry || host.ends_with(&format!(".{}", entry)))
}

/// Cliente do proxy: só segue redirecionamentos que continuam em hosts liberados.
pub fn pdf_client(allowed: Vec<String>) -> reqwest::Result<Client> {
    let policy = redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= 5 || !host_allowed(attempt.url(), &allowed) {
            attempt.stop()
        } else {
            attempt.follow()
        }
    });

    Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .redirect(policy)
        .build()
}

// GET /api/pdf-proxy?url=...
// Repassa o PDF pelo nosso domínio (o navegador bloqueia a origem do contrato).
#[utoipa::path(
    get,
    path = "/api/pdf-proxy",
    tag = "Documentos",
    params(PdfProxyQuery),
    responses(
        (status = 200, description = "PDF repassado", content_type = "application/pdf"),
        (status = 400, description = "URL inválida ou de host não liberado"),
        (status = 500, description = "Origem indisponível ou recusou")
    ),
    security(("api_jwt" = []))
)]
pub async fn proxy_pdf(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<PdfProxyQuery>,
) -> Result<Response, AppError> {
    let url = Url::parse(query.url.trim()).map_err(|_| AppError::MissingField("url".to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::MissingField("url".to_string()));
    }
    if !host_allowed(&url, &app_state.settings.pdf_proxy_allowed_hosts) {
        tracing::warn!("Proxy de PDF recusou host não liberado: {:?}", url.host_str());
        return Err(AppError::PreconditionError("Origem do PDF não permitida".to_string()));
    }

    let upstream = app_state.http.get(url.clone()).send().await?;
    let status = upstream.status();
    if !status.is_success() {
        let body = upstream.text().await.unwrap_or_default();
        return Err(AppError::UpstreamError { status: status.as_u16(), body: Value::String(body) });
    }

    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|ct| ct.starts_with("application/pdf"))
        .unwrap_or("application/pdf")
        .to_string();

    let filename = url
        .path_segments()
        .and_then(|mut segments| segments.next_back().map(str::to_string))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "contrato.pdf".to_string());

    let headers = [
        (header::CONTENT_TYPE, content_type),
        (header::CONTENT_DISPOSITION, format!("inline; filename=\"{}\"", filename)),
    ];

    Ok((headers, Body::from_stream(upstream.bytes_stream())).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["docs.exemplo.com".to_string()]
    }

    #[test]
    fn accepts_listed_host_and_its_subdomains() {
        assert!(host_allowed(&Url::parse("https://docs.exemplo.com/c/1.pdf").unwrap(), &allowed()));
        assert!(host_allowed(&Url::parse("https://cdn.DOCS.exemplo.com/c/1.pdf").unwrap(), &allowed()));
    }

    #[test]
    fn rejects_other_hosts() {
        for url in [
            "http://169.254.169.254/latest/meta-data",
            "http://localhost:5432/",
            "https://maldocs.exemplo.com/c.pdf",
            "https://docs.exemplo.com.evil.io/c.pdf",
        ] {
            assert!(!host_allowed(&Url::parse(url).unwrap(), &allowed()), "{url}");
        }
    }

    #[test]
    fn empty_list_allows_nothing() {
        assert!(!host_allowed(&Url::parse("https://docs.exemplo.com/c.pdf").unwrap(), &[]));
    }
}
