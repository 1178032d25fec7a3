use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Campo obrigatório ausente: {0}")]
    MissingField(String),

    #[error("Data inválida: {0}")]
    InvalidDate(String),

    // Corpo JSON que não casa com o formato esperado (inclui datas ilegíveis)
    #[error("Corpo da requisição inválido: {0}")]
    InvalidBody(String),

    // Ex: cobrança pedida para venda sem cliente no gateway
    #[error("{0}")]
    PreconditionError(String),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Token de webhook inválido")]
    WebhookUnauthorized,

    #[error("{0} não encontrado(a)")]
    NotFound(String),

    // Chave do gateway ausente ou inativa
    #[error("Configuração de integração ausente: {0}")]
    ConfigurationError(String),

    // O gateway respondeu, mas com status fora de 2xx. O corpo é mantido como veio.
    #[error("Gateway respondeu com status {status}")]
    UpstreamError { status: u16, body: Value },

    // O gateway nem chegou a responder (DNS, timeout, TLS...)
    #[error("Falha de comunicação com o gateway: {0}")]
    GatewayError(#[from] reqwest::Error),

    // O gateway respondeu 2xx, mas o corpo não pôde ser lido
    #[error("Resposta ilegível do gateway: {0}")]
    UnreadableGatewayResponse(String),

    // O gateway aceitou, mas a escrita local falhou depois
    #[error("Gateway processou a operação, mas a gravação local falhou: {0}")]
    PersistenceError(String),

    #[error("Payload inválido: {0}")]
    MalformedPayload(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Reclassifica uma falha de banco ocorrida depois de uma chamada bem-sucedida ao gateway.
    pub fn into_persistence(self) -> Self {
        match self {
            AppError::DatabaseError(e) => AppError::PersistenceError(e.to_string()),
            other => other,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::MissingField(_)
            | AppError::InvalidDate(_)
            | AppError::InvalidBody(_)
            | AppError::PreconditionError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidToken | AppError::WebhookUnauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                })
            }
            AppError::UpstreamError { status: upstream, body } => {
                tracing::error!("Gateway recusou a requisição ({}): {}", upstream, body);
                json!({
                    "error": format!("O gateway de pagamentos recusou a requisição (status {}).", upstream),
                    "details": body,
                })
            }
            AppError::PersistenceError(ref msg) => {
                tracing::error!("Inconsistência gateway/banco: {}", msg);
                json!({
                    "error": "A operação foi concluída no gateway, mas não foi gravada no banco.",
                    "details": msg,
                })
            }
            AppError::UnreadableGatewayResponse(ref msg) => json!({
                "error": "O gateway confirmou a operação, mas a resposta não pôde ser lida. Confira no Asaas antes de repetir.",
                "details": msg,
            }),
            AppError::MalformedPayload(ref msg) => {
                tracing::error!("Webhook com payload ilegível: {}", msg);
                json!({ "error": "Payload inválido.", "details": msg })
            }
            // Erros internos: loga o detalhe e devolve mensagem genérica.
            AppError::DatabaseError(ref e) => {
                tracing::error!("Erro de banco de dados: {}", e);
                json!({ "error": "Ocorreu um erro inesperado." })
            }
            AppError::InternalServerError(ref e) => {
                tracing::error!("Erro Interno do Servidor: {:#}", e);
                json!({ "error": "Ocorreu um erro inesperado." })
            }
            ref e => {
                if status.is_server_error() {
                    tracing::error!("{}", e);
                }
                json!({ "error": e.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}
