//! Cliente HTTP da API v3 do Asaas.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::{
    common::error::AppError,
    gateway::PaymentGateway,
    models::asaas::{
        CustomerRequest, PaymentList, PaymentRequest, PaymentUpdateRequest, RemoteCustomer, RemotePayment,
    },
};

pub const DEFAULT_BASE_URL: &str = "https://api.asaas.com/v3";

const ACCESS_TOKEN_HEADER: &str = "access_token";

#[derive(Clone)]
pub struct AsaasClient {
    http: Client,
    base_url: String,
}

impl AsaasClient {
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn request(&self, method: Method, path: &str, api_key: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("Asaas {} {}", method, url);
        self.http
            .request(method, url)
            .header(ACCESS_TOKEN_HEADER, api_key)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, label: &str) -> Result<T, AppError> {
        let response = request.send().await?;
        let response = check_status(response, label).await?;
        let raw = response.bytes().await?;
        decode(&raw, label)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, api_key: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let label = format!("{} {}", method, path);
        let request = self.request(method, path, api_key).json(body);
        self.send(request, &label).await
    }
}

// Status fora de 2xx vira `UpstreamError`, preservando o corpo original.
async fn check_status(response: Response, label: &str) -> Result<Response, AppError> {
    let status = response.status();
    info!("Asaas {} -> {}", label, status.as_u16());

    if status.is_success() {
        return Ok(response);
    }

    let raw = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<Value>(&raw).unwrap_or(Value::String(raw));

    Err(AppError::UpstreamError { status: status.as_u16(), body })
}

// 2xx com corpo que não casa com o esperado: a operação pode ter sido feita no Asaas.
fn decode<T: DeserializeOwned>(raw: &[u8], label: &str) -> Result<T, AppError> {
    serde_json::from_slice::<T>(raw).map_err(|e| {
        error!(
            "Asaas {} respondeu 2xx com corpo ilegível ({}): {}",
            label,
            e,
            String::from_utf8_lossy(raw)
        );
        AppError::UnreadableGatewayResponse(format!("{}: {}", label, e))
    })
}

#[async_trait]
impl PaymentGateway for AsaasClient {
    async fn create_customer(&self, api_key: &str, customer: &CustomerRequest) -> Result<RemoteCustomer, AppError> {
        self.send_json(Method::POST, "/customers", api_key, customer).await
    }

    async fn update_customer(
        &self,
        api_key: &str,
        customer_id: &str,
        customer: &CustomerRequest,
    ) -> Result<RemoteCustomer, AppError> {
        let path = format!("/customers/{}", customer_id);
        self.send_json(Method::POST, &path, api_key, customer).await
    }

    async fn delete_customer(&self, api_key: &str, customer_id: &str) -> Result<(), AppError> {
        let path = format!("/customers/{}", customer_id);
        let response = self.request(Method::DELETE, &path, api_key).send().await?;
        check_status(response, &format!("DELETE {}", path)).await?;
        Ok(())
    }

    async fn create_payment(&self, api_key: &str, payment: &PaymentRequest) -> Result<RemotePayment, AppError> {
        self.send_json(Method::POST, "/payments", api_key, payment).await
    }

    async fn update_payment(
        &self,
        api_key: &str,
        payment_id: &str,
        changes: &PaymentUpdateRequest,
    ) -> Result<RemotePayment, AppError> {
        let path = format!("/payments/{}", payment_id);
        self.send_json(Method::POST, &path, api_key, changes).await
    }

    async fn delete_payment(&self, api_key: &str, payment_id: &str) -> Result<(), AppError> {
        let path = format!("/payments/{}", payment_id);
        let response = self.request(Method::DELETE, &path, api_key).send().await?;
        check_status(response, &format!("DELETE {}", path)).await?;
        Ok(())
    }

    async fn list_payments(&self, api_key: &str, limit: u32) -> Result<Vec<RemotePayment>, AppError> {
        let request = self
            .request(Method::GET, "/payments", api_key)
            .query(&[("limit", limit)]);
        let list: PaymentList = self.send(request, "GET /payments").await?;

        if list.has_more {
            debug!(
                "Listagem do Asaas truncada em {} de {:?} cobranças",
                list.data.len(),
                list.total_count
            );
        }

        Ok(list.data)
    }
}
