// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::sale::StatusTotal;

// Resumo do painel (cards do topo)
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub total_vendas: i64,
    #[schema(example = "15400.00")]
    pub valor_total: Decimal,
    // Valor das vendas já pagas
    #[schema(example = "9800.00")]
    pub valor_recebido: Decimal,
    pub por_status: Vec<StatusTotal>,
    // Eventos de auditoria registrados desde 00:00 UTC
    pub eventos_hoje: i64,
}

impl DashboardSummary {
    pub fn from_parts(por_status: Vec<StatusTotal>, eventos_hoje: i64) -> Self {
        let total_vendas = por_status.iter().map(|s| s.quantidade).sum();
        let valor_total = por_status.iter().map(|s| s.valor).sum();
        let valor_recebido = por_status
            .iter()
            .filter(|s| s.status == crate::models::sale::status::PAGO)
            .map(|s| s.valor)
            .sum();

        Self { total_vendas, valor_total, valor_recebido, por_status, eventos_hoje }
    }
}
