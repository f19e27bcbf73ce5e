//! Services module
//!
//! Lógica de negocio sobre el agregado Usuario (dirección y teléfonos).
//! Cada operación valida primero sin tocar el almacén y después trabaja
//! dentro de una única transacción: de solo lectura para consultas y de
//! lectura-escritura para mutaciones, que se confirma al final o se descarta
//! ante cualquier error.

pub mod address_service;
pub mod phone_service;
pub mod user_service;

pub use address_service::AddressService;
pub use phone_service::PhoneService;
pub use user_service::UserService;

use crate::repositories::StoreError;
use crate::utils::errors::AppError;

/// Traduce `StoreError::NotFound` al mensaje del recurso; el resto sigue su curso
pub(crate) fn not_found(message: &'static str) -> impl Fn(StoreError) -> AppError {
    move |err| match err {
        StoreError::NotFound => AppError::NotFound(message.to_string()),
        other => AppError::from(other),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use crate::dto::{AddressDTO, PhoneNumberDTO, UserDTO};
    use crate::repositories::{MemoryStore, Store};

    pub fn store() -> Arc<dyn Store> {
        Arc::new(MemoryStore::new())
    }

    pub fn lula() -> UserDTO {
        UserDTO {
            name: Some("Luiz Inacio".to_string()),
            sur_name: Some("da Silva".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1972, 2, 22),
            cpf: Some("123.456.789-10".to_string()),
            email: Some("lula@prov.com".to_string()),
            ..Default::default()
        }
    }

    pub fn dilma() -> UserDTO {
        UserDTO {
            name: Some("Dilma".to_string()),
            sur_name: Some("Rousseff".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1947, 12, 14),
            cpf: Some("789.456.123-10".to_string()),
            email: Some("dilma@prov.com".to_string()),
            ..Default::default()
        }
    }

    pub fn glasshouse() -> AddressDTO {
        AddressDTO {
            public_place: Some("Avenida".to_string()),
            street_address: Some("Glasshouse, 69".to_string()),
            complement: Some("1001".to_string()),
            city: Some("Rio".to_string()),
            state: Some("RJ".to_string()),
            zip_code: Some("69.069-069".to_string()),
            ..Default::default()
        }
    }

    pub fn phone(phone_type: &str, number: &str) -> PhoneNumberDTO {
        PhoneNumberDTO {
            phone_id: Some(0),
            phone_type: Some(phone_type.to_string()),
            number: Some(number.to_string()),
            user_dto: None,
        }
    }
}
