pub mod charges;
pub mod customers;
pub mod dashboard;
pub mod documents;
pub mod logs;
pub mod sales;
pub mod webhooks;
