// src/common/dates.rs

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::common::error::AppError;

/// Converte uma data vinda de fora (UI, gateway, webhook) para `NaiveDate`.
///
/// Aceita `DD/MM/YYYY`, `YYYY-MM-DD` e data-hora ISO (`YYYY-MM-DDTHH:MM:SS...`),
/// da qual só a parte da data é usada.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, AppError> {
    let value = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%d/%m/%Y") {
        return Ok(date);
    }

    // "2025-03-10" ou "2025-03-10T12:00:00.000Z"
    let date_part = value.split(['T', ' ']).next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(raw.to_string()))
}

/// Normaliza para ISO (`YYYY-MM-DD`). Idempotente.
pub fn normalize_date(raw: &str) -> Result<String, AppError> {
    Ok(to_iso(parse_due_date(raw)?))
}

pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Deserializador para campos `NaiveDate` que aceitam os formatos de `parse_due_date`.
pub fn flexible_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_due_date(&raw).map_err(serde::de::Error::custom)
}

pub fn flexible_date_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_due_date(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_brazilian_format_to_iso() {
        assert_eq!(normalize_date("05/03/2025").unwrap(), "2025-03-05");
        assert_eq!(normalize_date("31/12/2024").unwrap(), "2024-12-31");
    }

    #[test]
    fn normalization_is_idempotent() {
        for input in ["05/03/2025", "2025-03-05", "2025-03-05T10:30:00.000Z", " 01/01/2026 "] {
            let once = normalize_date(input).unwrap();
            let twice = normalize_date(&once).unwrap();
            assert_eq!(once, twice, "entrada: {input}");
        }
    }

    #[test]
    fn brazilian_format_is_lossless() {
        let date = parse_due_date("29/02/2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(date.format("%d/%m/%Y").to_string(), "29/02/2024");
    }

    #[test]
    fn rejects_impossible_or_unknown_dates() {
        assert!(matches!(parse_due_date("31/02/2025"), Err(AppError::InvalidDate(_))));
        assert!(matches!(parse_due_date("2025/03/05"), Err(AppError::InvalidDate(_))));
        assert!(matches!(parse_due_date(""), Err(AppError::InvalidDate(_))));
    }

    #[test]
    fn deserializes_optional_empty_string_as_none() {
        #[derive(Deserialize)]
        struct Payload {
            #[serde(default, deserialize_with = "flexible_date_opt")]
            data: Option<NaiveDate>,
        }

        let p: Payload = serde_json::from_str(r#"{"data": ""}"#).unwrap();
        assert!(p.data.is_none());
        let p: Payload = serde_json::from_str(r#"{"data": "10/04/2025"}"#).unwrap();
        assert_eq!(p.data, NaiveDate::from_ymd_opt(2025, 4, 10));
        let p: Payload = serde_json::from_str(r#"{}"#).unwrap();
        assert!(p.data.is_none());
    }
}
