//! Utilidades de validación
//!
//! Este módulo contiene las expresiones regulares del dominio (CPF, CEP,
//! e-mail y teléfono brasileño), los predicados puros sobre ellas y las
//! funciones `custom` que usan los derives de `validator`.

use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationError, ValidationErrors};

lazy_static! {
    // Sin dígito verificador
    static ref CPF_REGEX: Regex = Regex::new(r"^\d{3}\.?\d{3}\.?\d{3}-?\d{2}$").unwrap();
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[_A-Za-z0-9\-+]+(\.[_A-Za-z0-9\-]+)*@[A-Za-z0-9\-]+(\.[A-Za-z0-9]+)*(\.[A-Za-z]{2,})$"
    )
    .unwrap();
    static ref ZIP_CODE_REGEX: Regex = Regex::new(r"^\d{2}\.?\d{3}-?\d{3}$").unwrap();
    static ref PHONE_REGEX: Regex =
        Regex::new(r"^\(?[1-9]{2}\)? ?(?:[2-8]|9[1-9])\d{3}-?\d{4}$").unwrap();
}

pub fn is_cpf_valid(value: &str) -> bool {
    CPF_REGEX.is_match(value)
}

pub fn is_email_valid(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

pub fn is_zip_valid(value: &str) -> bool {
    ZIP_CODE_REGEX.is_match(value)
}

pub fn is_phone_valid(value: &str) -> bool {
    PHONE_REGEX.is_match(value)
}

/// Deja solo los dígitos: `123.456.789-10` y `12345678910` son el mismo CPF
pub fn normalize_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.message = Some("Campo obligatorio vacío".into());
        return Err(error);
    }
    Ok(())
}

pub fn validate_cpf(value: &str) -> Result<(), ValidationError> {
    pattern_check(value, is_cpf_valid, "cpf", "CPF inválido")
}

pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    pattern_check(value, is_email_valid, "email", "E-mail inválido")
}

pub fn validate_zip_code(value: &str) -> Result<(), ValidationError> {
    pattern_check(value, is_zip_valid, "zip_code", "CEP inválido")
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    pattern_check(value, is_phone_valid, "phone", "Teléfono inválido")
}

fn pattern_check(
    value: &str,
    predicate: fn(&str) -> bool,
    code: &'static str,
    message: &'static str,
) -> Result<(), ValidationError> {
    if !predicate(value) {
        let mut error = ValidationError::new(code);
        error.message = Some(message.into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Resume los errores de `validator` en un mensaje corto para la respuesta HTTP
pub fn describe_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect();
    // HashMap de validator no tiene orden estable
    messages.sort();
    messages.join("; ")
}
