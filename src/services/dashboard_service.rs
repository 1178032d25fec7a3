// src/services/dashboard_service.rs

use std::sync::Arc;

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::{SalesStore, SystemLogStore},
    models::dashboard::DashboardSummary,
};

#[derive(Clone)]
pub struct DashboardService {
    sales: Arc<dyn SalesStore>,
    logs: Arc<dyn SystemLogStore>,
}

impl DashboardService {
    pub fn new(sales: Arc<dyn SalesStore>, logs: Arc<dyn SystemLogStore>) -> Self {
        Self { sales, logs }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, AppError> {
        let midnight = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);

        // As duas leituras não dependem uma da outra
        let (totals, events_today) =
            tokio::try_join!(self.sales.status_totals(), self.logs.count_since(midnight))?;

        Ok(DashboardSummary::from_parts(totals, events_today))
    }
}
