// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Vendas ---
        handlers::sales::create_sale,
        handlers::sales::list_sales,
        handlers::sales::get_sale,
        handlers::sales::delete_sale,

        // --- Asaas: clientes ---
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,

        // --- Asaas: cobranças ---
        handlers::charges::create_charge,
        handlers::charges::list_charges,
        handlers::charges::update_charge,
        handlers::charges::delete_charge,

        // --- Webhooks ---
        handlers::webhooks::asaas,
        handlers::webhooks::autentique,
        handlers::webhooks::document,

        // --- Auditoria ---
        handlers::logs::list_logs,
        handlers::logs::create_log,

        // --- Documentos ---
        handlers::documents::proxy_pdf,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Vendas ---
            models::sale::Sale,
            models::sale::NewSale,
            models::sale::StatusTotal,

            // --- Asaas ---
            models::asaas::BillingType,
            models::asaas::RemoteCustomer,
            models::asaas::RemotePayment,
            services::customer_service::CustomerDetails,
            services::customer_service::CustomerDeletion,
            services::charge_service::ChargeRequest,
            services::charge_service::ChargeUpdate,

            // --- Payloads ---
            handlers::customers::CreateCustomerPayload,
            handlers::charges::ChargeCreated,

            // --- Webhooks ---
            models::webhooks::DocumentCallback,
            models::webhooks::WebhookAck,
            models::webhooks::WebhookOutcome,

            // --- Auditoria ---
            models::system_log::SystemLog,
            models::system_log::NewSystemLog,
            models::system_log::LogPage,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
        )
    ),
    tags(
        (name = "Vendas", description = "Contratos dos clientes"),
        (name = "Asaas", description = "Clientes e cobranças no gateway de pagamentos"),
        (name = "Webhooks", description = "Notificações de pagamento, assinatura e contrato"),
        (name = "Auditoria", description = "Logs do sistema"),
        (name = "Documentos", description = "Repasse de PDFs de contrato"),
        (name = "Dashboard", description = "Indicadores gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route_group() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/vendas",
            "/api/asaas/clientes",
            "/api/asaas/cobrancas/{venda_id}",
            "/api/webhooks/asaas",
            "/api/logs",
            "/api/pdf-proxy",
            "/api/dashboard/resumo",
        ] {
            assert!(doc.paths.paths.contains_key(path), "rota ausente na documentação: {path}");
        }
    }
}
