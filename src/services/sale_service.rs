// src/services/sale_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::SalesStore,
    models::sale::{NewSale, Sale},
    services::customer_service::CustomerService,
};

#[derive(Clone)]
pub struct SaleService {
    sales: Arc<dyn SalesStore>,
    customers: CustomerService,
}

impl SaleService {
    pub fn new(sales: Arc<dyn SalesStore>, customers: CustomerService) -> Self {
        Self { sales, customers }
    }

    pub async fn create(&self, new_sale: &NewSale) -> Result<Sale, AppError> {
        new_sale.validate()?;
        if new_sale.valor_total <= rust_decimal::Decimal::ZERO {
            return Err(AppError::MissingField("valor_total".to_string()));
        }
        self.sales.create(new_sale).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Sale, AppError> {
        self.sales
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venda {}", id)))
    }

    pub async fn list(&self, status: Option<&str>) -> Result<Vec<Sale>, AppError> {
        self.sales.list(status).await
    }

    /// Exclusão definitiva. Se houver cliente no gateway, ele é excluído antes
    /// (recusas do gateway são toleradas, como na exclusão de cliente).
    pub async fn delete(&self, id: Uuid) -> Result<Sale, AppError> {
        let sale = self.get(id).await?;

        if let Some(customer_id) = sale.asaas_customer_id.as_deref() {
            self.customers.delete_remote(customer_id).await?;
        }

        if !self.sales.delete(id).await? {
            return Err(AppError::NotFound(format!("Venda {}", id)));
        }

        tracing::info!("🗑️ Venda {} excluída.", id);
        Ok(sale)
    }
}
