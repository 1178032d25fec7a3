// src/gateway.rs
//
// Gateway de pagamentos (Asaas). O resto do sistema fala com este trait;
// a chave de acesso vem do `ConfigProvider` a cada chamada.

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    models::asaas::{CustomerRequest, PaymentRequest, PaymentUpdateRequest, RemoteCustomer, RemotePayment},
};

pub mod asaas;
pub use asaas::AsaasClient;

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_customer(&self, api_key: &str, customer: &CustomerRequest) -> Result<RemoteCustomer, AppError>;

    /// O Asaas edita clientes com `POST /customers/{id}` (não `PUT`).
    async fn update_customer(
        &self,
        api_key: &str,
        customer_id: &str,
        customer: &CustomerRequest,
    ) -> Result<RemoteCustomer, AppError>;

    async fn delete_customer(&self, api_key: &str, customer_id: &str) -> Result<(), AppError>;

    async fn create_payment(&self, api_key: &str, payment: &PaymentRequest) -> Result<RemotePayment, AppError>;

    async fn update_payment(
        &self,
        api_key: &str,
        payment_id: &str,
        changes: &PaymentUpdateRequest,
    ) -> Result<RemotePayment, AppError>;

    async fn delete_payment(&self, api_key: &str, payment_id: &str) -> Result<(), AppError>;

    async fn list_payments(&self, api_key: &str, limit: u32) -> Result<Vec<RemotePayment>, AppError>;
}
