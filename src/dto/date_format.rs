//! Fechas en formato `dd/MM/yyyy`
//!
//! Se usa con `#[serde(default, with = "date_format")]` sobre campos
//! `Option<NaiveDate>`: un campo ausente queda en `None` y la validación del
//! servicio decide qué hacer con él.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serializer};

lazy_static! {
    static ref DATE_REGEX: Regex = Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap();
}

pub const FORMAT: &str = "%d/%m/%Y";

pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value {
        Some(text) => parse(&text).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// chrono acepta `2/2/1972` y ` 2/02/1972`; aquí día y mes van siempre con dos dígitos
pub fn parse(text: &str) -> Result<NaiveDate, String> {
    if !DATE_REGEX.is_match(text) {
        return Err(format!("fecha '{}' fuera del formato dd/MM/yyyy", text));
    }
    NaiveDate::parse_from_str(text, FORMAT)
        .map_err(|e| format!("fecha '{}' inválida: {}", text, e))
}
