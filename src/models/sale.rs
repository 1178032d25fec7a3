// src/models/sale.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::dates::flexible_date_opt;

/// Valores de `vendas.status` que o backend grava. A coluna aceita outros
/// (`ativo`, `cancelado`, ...) vindos do painel e os devolve como estão.
pub mod status {
    pub const PENDENTE: &str = "pendente";
    pub const PAGO: &str = "pago";
}

/// Valores da coluna `vendas.status_assinatura`.
pub mod signature {
    pub const GENERATED: &str = "generated";
    pub const SIGNED: &str = "signed";
}

// --- VENDA (contrato de um cliente) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Sale {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    // Chave local do cliente (agrupa vendas na listagem de cobranças)
    #[schema(example = "cli-0042")]
    pub cliente_id: Option<String>,

    #[schema(example = "Maria da Silva")]
    pub nome_cliente: String,
    #[schema(example = "123.456.789-09")]
    pub cpf_cnpj: Option<String>,
    #[schema(example = "maria@email.com")]
    pub email: Option<String>,
    #[schema(example = "(11) 98765-4321")]
    pub telefone: Option<String>,

    // Endereço
    pub cep: Option<String>,
    pub endereco: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,

    #[schema(example = "Título Familiar")]
    pub tipo_contrato: Option<String>,
    #[schema(example = "PIX")]
    pub forma_pagamento: Option<String>,
    #[schema(example = 3)]
    pub quantidade_parcelas: Option<i32>,
    #[schema(example = "100.00")]
    pub valor_total: Decimal,
    #[schema(value_type = Option<String>, format = Date, example = "2025-03-10")]
    pub data_vencimento: Option<NaiveDate>,

    #[schema(example = "pendente")]
    pub status: String,

    // Vínculos com o gateway (referências, não posse)
    #[schema(example = "cus_000005219613")]
    pub asaas_customer_id: Option<String>,
    #[schema(example = "pay_080225913252")]
    pub asaas_payment_id: Option<String>,

    // Contrato e assinatura
    pub contrato_url: Option<String>,
    #[schema(example = "signed")]
    pub status_assinatura: Option<String>,
    pub autentique_document_id: Option<String>,

    #[schema(value_type = Option<String>, format = Date, example = "2025-03-08")]
    pub data_pagamento: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewSale {
    pub cliente_id: Option<String>,

    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    #[schema(example = "Maria da Silva")]
    pub nome_cliente: String,
    pub cpf_cnpj: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub telefone: Option<String>,

    pub cep: Option<String>,
    pub endereco: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,

    pub tipo_contrato: Option<String>,
    pub forma_pagamento: Option<String>,
    #[validate(range(min = 1, max = 24, message = "Quantidade de parcelas deve estar entre 1 e 24."))]
    pub quantidade_parcelas: Option<i32>,
    #[schema(example = "100.00")]
    pub valor_total: Decimal,

    #[serde(default, deserialize_with = "flexible_date_opt")]
    #[schema(value_type = Option<String>, example = "10/03/2025")]
    pub data_vencimento: Option<NaiveDate>,
}

/// Totais do painel, agrupados por status da venda.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StatusTotal {
    #[schema(example = "pago")]
    pub status: String,
    #[schema(example = 12)]
    pub quantidade: i64,
    #[schema(example = "5400.00")]
    pub valor: Decimal,
}
