// src/db/sales_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SalesStore,
    models::sale::{signature, status, NewSale, Sale, StatusTotal},
};

const SALE_COLUMNS: &str = r#"
    id, cliente_id, nome_cliente, cpf_cnpj, email, telefone,
    cep, endereco, numero, complemento, bairro, cidade, estado,
    tipo_contrato, forma_pagamento, quantidade_parcelas, valor_total, data_vencimento,
    status, asaas_customer_id, asaas_payment_id,
    contrato_url, status_assinatura, autentique_document_id,
    data_pagamento, created_at, updated_at
"#;

// O repositório de vendas, responsável por todas as interações com a tabela 'vendas'
#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SalesStore for SalesRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sale>, AppError> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM vendas WHERE id = $1");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(sale)
    }

    async fn list(&self, status_filter: Option<&str>) -> Result<Vec<Sale>, AppError> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM vendas
             WHERE ($1::text IS NULL OR status = $1)
             ORDER BY created_at DESC"
        );
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(status_filter)
            .fetch_all(&self.pool)
            .await?;
        Ok(sales)
    }

    async fn create(&self, sale: &NewSale) -> Result<Sale, AppError> {
        let sql = format!(
            r#"
            INSERT INTO vendas (
                cliente_id, nome_cliente, cpf_cnpj, email, telefone,
                cep, endereco, numero, complemento, bairro, cidade, estado,
                tipo_contrato, forma_pagamento, quantidade_parcelas, valor_total,
                data_vencimento, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {SALE_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Sale>(&sql)
            .bind(&sale.cliente_id)
            .bind(&sale.nome_cliente)
            .bind(&sale.cpf_cnpj)
            .bind(&sale.email)
            .bind(&sale.telefone)
            .bind(&sale.cep)
            .bind(&sale.endereco)
            .bind(&sale.numero)
            .bind(&sale.complemento)
            .bind(&sale.bairro)
            .bind(&sale.cidade)
            .bind(&sale.estado)
            .bind(&sale.tipo_contrato)
            .bind(&sale.forma_pagamento)
            .bind(sale.quantidade_parcelas)
            .bind(sale.valor_total)
            .bind(sale.data_vencimento)
            .bind(status::PENDENTE)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM vendas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_ids(&self) -> Result<Vec<Uuid>, AppError> {
        let ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM vendas")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn list_ids_by_customer(&self, cliente_id: &str) -> Result<Vec<Uuid>, AppError> {
        let ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM vendas WHERE cliente_id = $1")
            .bind(cliente_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn set_remote_customer(&self, id: Uuid, customer_id: Option<&str>) -> Result<(), AppError> {
        sqlx::query("UPDATE vendas SET asaas_customer_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(customer_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_remote_charge(&self, id: Uuid, charge_id: Option<&str>) -> Result<(), AppError> {
        sqlx::query("UPDATE vendas SET asaas_payment_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(charge_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn mark_paid(&self, id: Uuid, charge_id: &str, paid_on: NaiveDate) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE vendas
            SET status = $2, asaas_payment_id = $3, data_pagamento = $4, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status::PAGO)
        .bind(charge_id)
        .bind(paid_on)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_signed(&self, id: Uuid) -> Result<Option<Uuid>, AppError> {
        let updated = sqlx::query_scalar::<_, Uuid>(
            "UPDATE vendas SET status_assinatura = $2, updated_at = NOW() WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(signature::SIGNED)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn mark_signed_by_document(&self, document_id: &str) -> Result<Option<Uuid>, AppError> {
        // Mais de uma venda com o mesmo documento não deveria existir; atualiza todas e devolve uma.
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE vendas SET status_assinatura = $2, updated_at = NOW()
            WHERE autentique_document_id = $1
            RETURNING id
            "#,
        )
        .bind(document_id)
        .bind(signature::SIGNED)
        .fetch_all(&self.pool)
        .await?;
        Ok(updated.into_iter().next())
    }

    async fn attach_contract(
        &self,
        id: Uuid,
        contract_url: &str,
        document_id: Option<&str>,
        signature_status: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE vendas
            SET contrato_url = $2,
                autentique_document_id = COALESCE($3, autentique_document_id),
                status_assinatura = $4,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(contract_url)
        .bind(document_id)
        .bind(signature_status)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn status_totals(&self) -> Result<Vec<StatusTotal>, AppError> {
        let totals = sqlx::query_as::<_, StatusTotal>(
            r#"
            SELECT status,
                   COUNT(*) AS quantidade,
                   COALESCE(SUM(valor_total), 0) AS valor
            FROM vendas
            GROUP BY status
            ORDER BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(totals)
    }
}
