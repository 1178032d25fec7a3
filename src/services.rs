pub mod audit_service;
pub mod charge_service;
pub mod customer_service;
pub mod dashboard_service;
pub mod sale_service;
pub mod webhook_service;

pub use audit_service::AuditService;
pub use charge_service::ChargeService;
pub use customer_service::CustomerService;
pub use dashboard_service::DashboardService;
pub use sale_service::SaleService;
pub use webhook_service::WebhookService;
