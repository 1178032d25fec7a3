// src/models/asaas.rs
//
// Payloads trocados com a API v3 do Asaas (camelCase do lado de lá).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- CLIENTES ---

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub name: String,
    pub cpf_cnpj: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    // Bairro
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    pub external_reference: String,
    // Preenchidos com o tipo de contrato da venda
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    pub notification_disabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCustomer {
    #[schema(example = "cus_000005219613")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cpf_cnpj: Option<String>,
    #[serde(default)]
    pub deleted: Option<bool>,
}

// --- COBRANÇAS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingType {
    #[serde(alias = "pix")]
    Pix,
    #[serde(alias = "cartao", alias = "cartao_credito", alias = "credit_card")]
    CreditCard,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub customer: String,
    pub billing_type: BillingType,
    // À vista: `value`. Parcelado: `installmentCount` + `installmentValue`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment_value: Option<Decimal>,
    pub due_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub external_reference: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PaymentUpdateRequest {
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.due_date.is_none() && self.description.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemotePayment {
    #[schema(example = "pay_080225913252")]
    pub id: String,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub value: Option<Decimal>,
    #[serde(default)]
    pub net_value: Option<Decimal>,
    #[serde(default)]
    #[schema(example = "PIX")]
    pub billing_type: Option<String>,
    #[serde(default)]
    #[schema(example = "PENDING")]
    pub status: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub date_created: Option<NaiveDate>,
    #[serde(default)]
    pub external_reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub invoice_url: Option<String>,
    // Id do parcelamento, quando a cobrança é uma parcela
    #[serde(default)]
    pub installment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentList {
    pub data: Vec<RemotePayment>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub total_count: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn billing_type_accepts_ui_aliases() {
        let pix: BillingType = serde_json::from_value(json!("pix")).unwrap();
        let card: BillingType = serde_json::from_value(json!("cartao")).unwrap();
        let canonical: BillingType = serde_json::from_value(json!("CREDIT_CARD")).unwrap();
        assert_eq!(pix, BillingType::Pix);
        assert_eq!(card, BillingType::CreditCard);
        assert_eq!(canonical, BillingType::CreditCard);
        assert_eq!(serde_json::to_value(BillingType::CreditCard).unwrap(), json!("CREDIT_CARD"));
    }

    #[test]
    fn installment_request_omits_single_value() {
        let req = PaymentRequest {
            customer: "cus_1".into(),
            billing_type: BillingType::Pix,
            value: None,
            installment_count: Some(3),
            installment_value: Some(Decimal::new(3333, 2)),
            due_date: "2025-03-10".into(),
            description: None,
            external_reference: "abc".into(),
        };
        let body = serde_json::to_value(&req).unwrap();
        assert!(body.get("value").is_none());
        assert_eq!(body["installmentCount"], json!(3));
        assert_eq!(body["installmentValue"], json!(33.33));
        assert_eq!(body["billingType"], json!("PIX"));
        assert_eq!(body["externalReference"], json!("abc"));
    }

    #[test]
    fn decodes_gateway_listing() {
        let raw = json!({
            "object": "list",
            "hasMore": false,
            "totalCount": 1,
            "limit": 10,
            "offset": 0,
            "data": [{
                "object": "payment",
                "id": "pay_1",
                "dateCreated": "2025-02-01",
                "customer": "cus_1",
                "value": 100.0,
                "netValue": 98.01,
                "billingType": "PIX",
                "status": "RECEIVED",
                "dueDate": "2025-02-10",
                "paymentDate": null,
                "externalReference": "550e8400-e29b-41d4-a716-446655440000"
            }]
        });
        let list: PaymentList = serde_json::from_value(raw).unwrap();
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].date_created, NaiveDate::from_ymd_opt(2025, 2, 1));
        assert!(list.data[0].payment_date.is_none());
    }
}
