pub mod asaas;
pub mod dashboard;
pub mod integration;
pub mod sale;
pub mod system_log;
pub mod webhooks;
